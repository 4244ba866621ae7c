//! In-memory banking backend generating realistic demo data.

use crate::core::gateway::{BankingGateway, GatewayError};
use crate::core::model::{
    Account, AccountType, GoalRef, Money, Transaction, TransactionDirection, major_units,
};
use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const MOCK_CURRENCY: &str = "GBP";

/// Seeded stand-in for the bank API.
///
/// Produces 2–5 outbound transactions per day of the requested window; the
/// same seed yields the same sequence of accounts, transactions and goal ids.
pub struct MockBankingGateway {
    accounts: Vec<Account>,
    rng: Mutex<StdRng>,
}

impl MockBankingGateway {
    pub fn new(seed: u64) -> Self {
        Self::with_accounts(seed, default_accounts())
    }

    pub fn with_accounts(seed: u64, accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

fn default_accounts() -> Vec<Account> {
    let account = |uid: u128, account_type, category: u128, name: &str| Account {
        account_uid: Uuid::from_u128(uid),
        account_type,
        default_category: Uuid::from_u128(category),
        currency: MOCK_CURRENCY.to_string(),
        name: name.to_string(),
        created_at: None,
    };

    vec![
        account(
            0x12345678_1234_1234_1234_123456789012,
            AccountType::Primary,
            0x87654321_4321_4321_4321_210987654321,
            "Personal Current Account",
        ),
        account(
            0x98765432_9876_9876_9876_987654321098,
            AccountType::Secondary,
            0x11111111_2222_3333_4444_555555555555,
            "High Yield Savings Account",
        ),
        account(
            0x11111111_1111_1111_1111_111111111111,
            AccountType::Business,
            0x22222222_3333_4444_5555_666666666666,
            "Business Current Account",
        ),
    ]
}

/// Spending tiers: ~30% small, ~30% medium, ~25% large, rest big.
fn spending_amount(rng: &mut StdRng) -> u64 {
    let tier: f64 = rng.r#gen();
    if tier < 0.30 {
        rng.gen_range(150..=899)
    } else if tier < 0.60 {
        rng.gen_range(900..=2_599)
    } else if tier < 0.85 {
        rng.gen_range(2_600..=4_599)
    } else {
        rng.gen_range(4_600..=12_000)
    }
}

fn mock_transaction(rng: &mut StdRng, date: NaiveDate, sequence_in_day: u32) -> Transaction {
    let hour = 8 + (sequence_in_day * 3) % 16;
    let time = NaiveTime::from_hms_opt(hour, rng.gen_range(0..60), rng.gen_range(0..60))
        .unwrap_or_default();

    Transaction {
        uid: Uuid::from_u128(rng.r#gen()).to_string(),
        direction: TransactionDirection::Outbound,
        transaction_time: Utc.from_utc_datetime(&date.and_time(time)).fixed_offset(),
        amount: Some(Money::new(spending_amount(rng), MOCK_CURRENCY)),
    }
}

#[async_trait]
impl BankingGateway for MockBankingGateway {
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        debug!("Using mock data for accounts");
        Ok(self.accounts.clone())
    }

    async fn list_transactions(
        &self,
        account: &Account,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Transaction>, GatewayError> {
        debug!(
            account = %account.name,
            %start_date,
            %end_date,
            "Using mock data for transactions"
        );
        let mut rng = self.rng.lock().await;
        let mut transactions = Vec::new();

        let mut date = start_date;
        while date <= end_date {
            let per_day = rng.gen_range(2..=5);
            for sequence in 0..per_day {
                transactions.push(mock_transaction(&mut rng, date, sequence));
            }
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }

        Ok(transactions)
    }

    async fn create_goal(
        &self,
        name: &str,
        _currency: &str,
        _account: &Account,
    ) -> Result<GoalRef, GatewayError> {
        let goal = GoalRef(Uuid::from_u128(self.rng.lock().await.r#gen()));
        info!(%goal, goal_name = %name, "Created mock savings goal");
        Ok(goal)
    }

    async fn fund_goal(
        &self,
        amount_minor_units: u64,
        currency: &str,
        goal: GoalRef,
        _account: &Account,
    ) -> Result<(), GatewayError> {
        info!(
            %goal,
            amount = %major_units(amount_minor_units),
            %currency,
            "Mock transfer to savings goal completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_default_accounts() {
        let gateway = MockBankingGateway::new(1);
        let accounts = gateway.list_accounts().await.unwrap();

        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].account_type, AccountType::Primary);
        assert_eq!(
            accounts[0].account_uid.to_string(),
            "12345678-1234-1234-1234-123456789012"
        );
        assert!(accounts.iter().all(|a| a.currency == "GBP"));
    }

    #[tokio::test]
    async fn test_transactions_cover_each_day() {
        let gateway = MockBankingGateway::new(7);
        let account = gateway.list_accounts().await.unwrap().remove(0);
        let (start, end) = (date(2024, 3, 4), date(2024, 3, 10));

        let transactions = gateway
            .list_transactions(&account, start, end)
            .await
            .unwrap();

        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        for tx in &transactions {
            *per_day.entry(tx.date()).or_default() += 1;
            assert!(tx.is_outbound());
            assert!((150..=12_000).contains(&tx.minor_units()));
            assert_eq!(tx.amount.as_ref().unwrap().currency, "GBP");
        }
        assert_eq!(per_day.len(), 7);
        assert!(per_day.values().all(|count| (2..=5).contains(count)));
    }

    #[tokio::test]
    async fn test_same_seed_same_data() {
        let first = MockBankingGateway::new(99);
        let second = MockBankingGateway::new(99);
        let account = first.list_accounts().await.unwrap().remove(0);
        let (start, end) = (date(2024, 3, 4), date(2024, 3, 6));

        assert_eq!(
            first.list_transactions(&account, start, end).await.unwrap(),
            second.list_transactions(&account, start, end).await.unwrap()
        );
        assert_eq!(
            first.create_goal("Trip", "GBP", &account).await.unwrap(),
            second.create_goal("Trip", "GBP", &account).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_empty_window_has_no_transactions() {
        let gateway = MockBankingGateway::new(3);
        let account = gateway.list_accounts().await.unwrap().remove(0);

        let transactions = gateway
            .list_transactions(&account, date(2024, 3, 10), date(2024, 3, 9))
            .await
            .unwrap();
        assert!(transactions.is_empty());
    }

    #[test]
    fn test_spending_tiers() {
        let mut rng = StdRng::seed_from_u64(5);
        let amounts: Vec<u64> = (0..2_000).map(|_| spending_amount(&mut rng)).collect();

        let small = amounts.iter().filter(|a| **a < 900).count();
        let big = amounts.iter().filter(|a| **a >= 4_600).count();
        assert!(amounts.iter().all(|a| (150..=12_000).contains(a)));
        // Loose bounds around the 30% / 15% targets.
        assert!((450..=750).contains(&small), "small = {small}");
        assert!((180..=420).contains(&big), "big = {big}");
    }
}
