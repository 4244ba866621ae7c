//! Accounts, transactions and money as returned by a banking backend

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Primary,
    Secondary,
    Business,
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccountType::Primary => "PRIMARY",
                AccountType::Secondary => "SECONDARY",
                AccountType::Business => "BUSINESS",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_uid: Uuid,
    pub account_type: AccountType,
    pub default_category: Uuid,
    pub currency: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionDirection {
    #[serde(rename = "IN")]
    Inbound,
    #[serde(rename = "OUT")]
    Outbound,
}

/// An amount in integer minor units (pence for GBP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency: String,
    #[serde(default)]
    pub minor_units: u64,
}

impl Money {
    pub fn new(minor_units: u64, currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            minor_units,
        }
    }

    /// Major-unit value for display only; never round from this.
    pub fn to_major(&self) -> Decimal {
        major_units(self.minor_units)
    }
}

/// Converts minor units to a two-decimal major-unit value.
pub fn major_units(minor_units: u64) -> Decimal {
    Decimal::from(minor_units) / Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "feedItemUid")]
    pub uid: String,
    pub direction: TransactionDirection,
    pub transaction_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub amount: Option<Money>,
}

impl Transaction {
    pub fn is_outbound(&self) -> bool {
        self.direction == TransactionDirection::Outbound
    }

    /// Calendar date in the timestamp's own offset.
    pub fn date(&self) -> NaiveDate {
        self.transaction_time.date_naive()
    }

    /// A transaction without an amount counts as zero.
    pub fn minor_units(&self) -> u64 {
        self.amount.as_ref().map_or(0, |amount| amount.minor_units)
    }
}

/// Identifier of a savings goal, returned by goal creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalRef(pub Uuid);

impl Display for GoalRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
