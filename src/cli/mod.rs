pub mod prompt;
pub mod roundup;
pub mod setup;
pub mod ui;
