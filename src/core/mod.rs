//! Core round-up logic and the abstractions it runs against

pub mod config;
pub mod filter;
pub mod gateway;
pub mod intent;
pub mod log;
pub mod model;
pub mod orchestrator;
pub mod roundup;

// Re-export main types for cleaner imports
pub use gateway::{BankingGateway, GatewayError};
pub use intent::{GoalDisposition, UserIntent, ValidationError};
pub use model::{Account, AccountType, GoalRef, Money, Transaction, TransactionDirection};
pub use orchestrator::{AccountSelector, RunError, RunReport, SavingsOrchestrator};
