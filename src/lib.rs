pub mod cli;
pub mod core;
pub mod providers;

pub use crate::cli::roundup::RoundUpOptions;
pub use crate::core::config;

use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    RoundUp(RoundUpOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("RoundUp starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::RoundUp(options) => cli::roundup::run(&config, options).await,
    }
}
