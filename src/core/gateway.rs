//! Banking backend abstraction

use crate::core::model::{Account, GoalRef, Transaction};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed {context} response: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Accounts, transactions and savings goals of the current credential.
///
/// Implementations never substitute defaults for a failed call. Callers must
/// re-filter `list_transactions` output, which may cover more than the window.
#[async_trait]
pub trait BankingGateway: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError>;

    /// Transactions of `account` within the inclusive day range.
    async fn list_transactions(
        &self,
        account: &Account,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Transaction>, GatewayError>;

    async fn create_goal(
        &self,
        name: &str,
        currency: &str,
        account: &Account,
    ) -> Result<GoalRef, GatewayError>;

    async fn fund_goal(
        &self,
        amount_minor_units: u64,
        currency: &str,
        goal: GoalRef,
        account: &Account,
    ) -> Result<(), GatewayError>;
}
