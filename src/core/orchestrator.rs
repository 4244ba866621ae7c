//! Drives one round-up run from account selection to funding a goal.

use crate::core::filter::filter_window;
use crate::core::gateway::{BankingGateway, GatewayError};
use crate::core::intent::{GoalDisposition, UserIntent};
use crate::core::model::{Account, GoalRef};
use crate::core::roundup::calculate;
use chrono::{Duration, NaiveDate};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Length of the transaction window in days, start day included.
pub const WINDOW_DAYS: i64 = 7;

pub const FEATURE_COMING_SOON: &str = "Feature coming soon, please create a new goal for now";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    SelectingAccount,
    FetchingTransactions,
    Computing,
    Disposing,
    Done,
    Aborted,
}

impl Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RunState::SelectingAccount => "selecting account",
                RunState::FetchingTransactions => "fetching transactions",
                RunState::Computing => "computing round-up",
                RunState::Disposing => "disposing round-up",
                RunState::Done => "done",
                RunState::Aborted => "aborted",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("No accounts found")]
    NoAccounts,

    #[error("Gateway call failed while {step}: {source}")]
    Gateway {
        step: RunState,
        #[source]
        source: GatewayError,
    },

    #[error("Account selection failed: {0}")]
    Selection(#[from] std::io::Error),

    #[error("Selected account {index} is not one of the {available} accounts")]
    InvalidSelection { index: usize, available: usize },
}

/// Chooses one of several accounts. Only consulted with two or more.
pub trait AccountSelector: Send + Sync {
    /// Returns the zero-based index of the chosen account.
    fn select(&self, accounts: &[Account]) -> std::io::Result<usize>;
}

/// Always picks the same index.
pub struct FixedAccountSelector(pub usize);

impl AccountSelector for FixedAccountSelector {
    fn select(&self, _accounts: &[Account]) -> std::io::Result<usize> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Funded { goal: GoalRef },
    CreatedUnfunded { goal: GoalRef },
    ExistingGoalUnavailable,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub account: Account,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transactions_retrieved: usize,
    pub transactions_considered: usize,
    pub round_up_minor_units: u64,
    pub disposition: Disposition,
}

/// Last day of a window starting at `start_date`, capped at `today`.
pub fn window_end(start_date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let end = start_date + Duration::days(WINDOW_DAYS - 1);
    end.min(today)
}

pub struct SavingsOrchestrator {
    gateway: Arc<dyn BankingGateway>,
    selector: Arc<dyn AccountSelector>,
    state: RunState,
}

impl SavingsOrchestrator {
    pub fn new(gateway: Arc<dyn BankingGateway>, selector: Arc<dyn AccountSelector>) -> Self {
        Self {
            gateway,
            selector,
            state: RunState::SelectingAccount,
        }
    }

    /// State reached by the last run: `Done` or `Aborted` once it returns.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs every step once, in order. Any gateway error aborts the run.
    pub async fn run(
        &mut self,
        intent: &UserIntent,
        today: NaiveDate,
    ) -> Result<RunReport, RunError> {
        let mut state = RunState::SelectingAccount;
        let result = self.drive(intent, today, &mut state).await;

        if let Err(e) = &result {
            warn!(step = %state, error = %e, "Round-up run aborted");
            transition(&mut state, RunState::Aborted);
        }
        self.state = state;
        result
    }

    async fn drive(
        &self,
        intent: &UserIntent,
        today: NaiveDate,
        state: &mut RunState,
    ) -> Result<RunReport, RunError> {
        let step = *state;
        let accounts = self
            .gateway
            .list_accounts()
            .await
            .map_err(|source| RunError::Gateway { step, source })?;
        let account = self.select_account(accounts)?;
        debug!(account = %account.name, "Selected account");

        transition(state, RunState::FetchingTransactions);
        let start_date = intent.start_date();
        let end_date = window_end(start_date, today);
        let step = *state;
        let transactions = self
            .gateway
            .list_transactions(&account, start_date, end_date)
            .await
            .map_err(|source| RunError::Gateway { step, source })?;

        transition(state, RunState::Computing);
        let considered = filter_window(&transactions, start_date, end_date);
        let amount = calculate(&considered);
        info!(
            retrieved = transactions.len(),
            considered = considered.len(),
            round_up_minor_units = amount,
            "Computed round-up"
        );

        transition(state, RunState::Disposing);
        let step = *state;
        let disposition = match intent.disposition() {
            GoalDisposition::NewGoal(name) => {
                let goal = self
                    .gateway
                    .create_goal(name, &account.currency, &account)
                    .await
                    .map_err(|source| RunError::Gateway { step, source })?;

                if amount > 0 {
                    self.gateway
                        .fund_goal(amount, &account.currency, goal, &account)
                        .await
                        .map_err(|source| RunError::Gateway { step, source })?;
                    Disposition::Funded { goal }
                } else {
                    debug!(%goal, "Nothing to transfer, skipping funding");
                    Disposition::CreatedUnfunded { goal }
                }
            }
            GoalDisposition::ExistingGoal(name) => {
                info!(goal = %name, "{}", FEATURE_COMING_SOON);
                Disposition::ExistingGoalUnavailable
            }
        };

        transition(state, RunState::Done);
        Ok(RunReport {
            account,
            start_date,
            end_date,
            transactions_retrieved: transactions.len(),
            transactions_considered: considered.len(),
            round_up_minor_units: amount,
            disposition,
        })
    }

    fn select_account(&self, accounts: Vec<Account>) -> Result<Account, RunError> {
        let available = accounts.len();
        match available {
            0 => Err(RunError::NoAccounts),
            1 => accounts.into_iter().next().ok_or(RunError::NoAccounts),
            _ => {
                let index = self.selector.select(&accounts)?;
                accounts
                    .into_iter()
                    .nth(index)
                    .ok_or(RunError::InvalidSelection { index, available })
            }
        }
    }
}

fn transition(state: &mut RunState, next: RunState) {
    let from = *state;
    debug!(%from, to = %next, "Run state change");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AccountType, Money, Transaction, TransactionDirection};
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        ListAccounts,
        ListTransactions(NaiveDate, NaiveDate),
        CreateGoal(String, String),
        FundGoal(u64, String, GoalRef),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        ListAccounts,
        ListTransactions,
        CreateGoal,
        FundGoal,
    }

    #[derive(Default)]
    struct RecordingGateway {
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        fail_on: Option<Op>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: Op, call: Call) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(op) {
                return Err(GatewayError::Status {
                    status: 502,
                    body: format!("{op:?} failed"),
                });
            }
            Ok(())
        }
    }

    const GOAL_UID: u128 = 0xfeed;

    #[async_trait]
    impl BankingGateway for RecordingGateway {
        async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError> {
            self.record(Op::ListAccounts, Call::ListAccounts)?;
            Ok(self.accounts.clone())
        }

        async fn list_transactions(
            &self,
            _account: &Account,
            start_date: NaiveDate,
            end_date: NaiveDate,
        ) -> Result<Vec<Transaction>, GatewayError> {
            self.record(
                Op::ListTransactions,
                Call::ListTransactions(start_date, end_date),
            )?;
            Ok(self.transactions.clone())
        }

        async fn create_goal(
            &self,
            name: &str,
            currency: &str,
            _account: &Account,
        ) -> Result<GoalRef, GatewayError> {
            self.record(
                Op::CreateGoal,
                Call::CreateGoal(name.to_string(), currency.to_string()),
            )?;
            Ok(GoalRef(Uuid::from_u128(GOAL_UID)))
        }

        async fn fund_goal(
            &self,
            amount_minor_units: u64,
            currency: &str,
            goal: GoalRef,
            _account: &Account,
        ) -> Result<(), GatewayError> {
            self.record(
                Op::FundGoal,
                Call::FundGoal(amount_minor_units, currency.to_string(), goal),
            )

        }
    }

    struct PanickingSelector;

    impl AccountSelector for PanickingSelector {
        fn select(&self, _accounts: &[Account]) -> std::io::Result<usize> {
            panic!("selector must not be consulted");
        }
    }

    fn account(name: &str) -> Account {
        Account {
            account_uid: Uuid::new_v4(),
            account_type: AccountType::Primary,
            default_category: Uuid::new_v4(),
            currency: "GBP".to_string(),
            name: name.to_string(),
            created_at: None,
        }
    }

    fn at(date: NaiveDate, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .unwrap()
    }

    fn tx(date: NaiveDate, direction: TransactionDirection, minor_units: u64) -> Transaction {
        Transaction {
            uid: Uuid::new_v4().to_string(),
            direction,
            transaction_time: at(date, 12),
            amount: Some(Money::new(minor_units, "GBP")),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn new_goal_intent() -> UserIntent {
        UserIntent::new(start(), GoalDisposition::NewGoal("Holiday".into()), today()).unwrap()
    }

    fn orchestrator(
        gateway: &Arc<RecordingGateway>,
        selector: Arc<dyn AccountSelector>,
    ) -> SavingsOrchestrator {
        SavingsOrchestrator::new(gateway.clone(), selector)
    }

    #[test]
    fn test_window_end() {
        assert_eq!(
            window_end(start(), today()),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(window_end(today(), today()), today());
        let early = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            window_end(early, today()),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
        );
    }

    #[tokio::test]
    async fn test_creates_then_funds_new_goal() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            transactions: vec![
                tx(start(), TransactionDirection::Outbound, 435),
                tx(start(), TransactionDirection::Inbound, 1_001),
            ],
            ..Default::default()
        });

        let report = orchestrator(&gateway, Arc::new(PanickingSelector))
            .run(&new_goal_intent(), today())
            .await
            .unwrap();

        let goal = GoalRef(Uuid::from_u128(GOAL_UID));
        assert_eq!(
            gateway.calls(),
            vec![
                Call::ListAccounts,
                Call::ListTransactions(start(), today()),
                Call::CreateGoal("Holiday".into(), "GBP".into()),
                Call::FundGoal(65, "GBP".into(), goal),
            ]
        );
        assert_eq!(report.round_up_minor_units, 65);
        assert_eq!(report.transactions_retrieved, 2);
        assert_eq!(report.transactions_considered, 1);
        assert_eq!(report.disposition, Disposition::Funded { goal });
    }

    #[tokio::test]
    async fn test_existing_goal_makes_no_goal_calls() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            transactions: vec![tx(start(), TransactionDirection::Outbound, 435)],
            ..Default::default()
        });
        let intent = UserIntent::new(
            start(),
            GoalDisposition::ExistingGoal("Holiday".into()),
            today(),
        )
        .unwrap();

        let report = orchestrator(&gateway, Arc::new(PanickingSelector))
            .run(&intent, today())
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Call::ListAccounts, Call::ListTransactions(start(), today())]
        );
        assert_eq!(report.round_up_minor_units, 65);
        assert_eq!(report.disposition, Disposition::ExistingGoalUnavailable);
    }

    #[tokio::test]
    async fn test_no_accounts_aborts() {
        let gateway = Arc::new(RecordingGateway::default());
        let mut orchestrator = orchestrator(&gateway, Arc::new(PanickingSelector));

        let result = orchestrator.run(&new_goal_intent(), today()).await;

        assert!(matches!(result, Err(RunError::NoAccounts)));
        assert_eq!(orchestrator.state(), RunState::Aborted);
        assert_eq!(gateway.calls(), vec![Call::ListAccounts]);
    }

    #[tokio::test]
    async fn test_zero_round_up_skips_funding() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            transactions: vec![tx(start(), TransactionDirection::Outbound, 500)],
            ..Default::default()
        });

        let report = orchestrator(&gateway, Arc::new(PanickingSelector))
            .run(&new_goal_intent(), today())
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                Call::ListAccounts,
                Call::ListTransactions(start(), today()),
                Call::CreateGoal("Holiday".into(), "GBP".into()),
            ]
        );
        assert!(matches!(
            report.disposition,
            Disposition::CreatedUnfunded { .. }
        ));
    }

    /// Runs a new-goal intent against a gateway failing on `op`, returning the
    /// step reported in the error, the final state and the recorded calls.
    async fn run_failing_on(op: Op) -> (RunState, RunState, Vec<Call>) {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            transactions: vec![tx(start(), TransactionDirection::Outbound, 435)],
            fail_on: Some(op),
            ..Default::default()
        });
        let mut orchestrator = orchestrator(&gateway, Arc::new(PanickingSelector));

        let result = orchestrator.run(&new_goal_intent(), today()).await;

        match result {
            Err(RunError::Gateway {
                step,
                source: GatewayError::Status { status, body },
            }) => {
                assert_eq!(status, 502);
                assert_eq!(body, format!("{op:?} failed"));
                (step, orchestrator.state(), gateway.calls())
            }
            other => panic!("Expected gateway error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_accounts_failure_aborts_run() {
        let (step, state, calls) = run_failing_on(Op::ListAccounts).await;

        assert_eq!(step, RunState::SelectingAccount);
        assert_eq!(state, RunState::Aborted);
        assert_eq!(calls, vec![Call::ListAccounts]);
    }

    #[tokio::test]
    async fn test_list_transactions_failure_aborts_run() {
        let (step, state, calls) = run_failing_on(Op::ListTransactions).await;

        assert_eq!(step, RunState::FetchingTransactions);
        assert_eq!(state, RunState::Aborted);
        assert_eq!(
            calls,
            vec![Call::ListAccounts, Call::ListTransactions(start(), today())]
        );
    }

    #[tokio::test]
    async fn test_create_goal_failure_aborts_run() {
        let (step, state, calls) = run_failing_on(Op::CreateGoal).await;

        assert_eq!(step, RunState::Disposing);
        assert_eq!(state, RunState::Aborted);
        assert_eq!(
            calls.last(),
            Some(&Call::CreateGoal("Holiday".into(), "GBP".into()))
        );
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn test_fund_goal_failure_after_goal_created_aborts_run() {
        let (step, state, calls) = run_failing_on(Op::FundGoal).await;

        assert_eq!(step, RunState::Disposing);
        assert_eq!(state, RunState::Aborted);
        assert_eq!(
            calls,
            vec![
                Call::ListAccounts,
                Call::ListTransactions(start(), today()),
                Call::CreateGoal("Holiday".into(), "GBP".into()),
                Call::FundGoal(65, "GBP".into(), GoalRef(Uuid::from_u128(GOAL_UID))),
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_run_ends_done() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            ..Default::default()
        });
        let mut orchestrator = orchestrator(&gateway, Arc::new(PanickingSelector));

        orchestrator.run(&new_goal_intent(), today()).await.unwrap();

        assert_eq!(orchestrator.state(), RunState::Done);
    }

    #[tokio::test]
    async fn test_filters_out_of_window_transactions() {
        let before = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("Current")],
            transactions: vec![
                tx(before, TransactionDirection::Outbound, 101),
                tx(today(), TransactionDirection::Outbound, 295),
            ],
            ..Default::default()
        });

        let report = orchestrator(&gateway, Arc::new(PanickingSelector))
            .run(&new_goal_intent(), today())
            .await
            .unwrap();

        assert_eq!(report.transactions_considered, 1);
        assert_eq!(report.round_up_minor_units, 5);
    }

    #[tokio::test]
    async fn test_multiple_accounts_use_selector() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("First"), account("Second"), account("Third")],
            ..Default::default()
        });

        let report = orchestrator(&gateway, Arc::new(FixedAccountSelector(1)))
            .run(&new_goal_intent(), today())
            .await
            .unwrap();

        assert_eq!(report.account.name, "Second");
    }

    #[tokio::test]
    async fn test_out_of_range_selection_is_rejected() {
        let gateway = Arc::new(RecordingGateway {
            accounts: vec![account("First"), account("Second")],
            ..Default::default()
        });

        let result = orchestrator(&gateway, Arc::new(FixedAccountSelector(2)))
            .run(&new_goal_intent(), today())
            .await;

        assert!(matches!(
            result,
            Err(RunError::InvalidSelection {
                index: 2,
                available: 2
            })
        ));
        assert_eq!(gateway.calls(), vec![Call::ListAccounts]);
    }
}
