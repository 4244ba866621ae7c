use super::{prompt, ui};
use crate::core::config::AppConfig;
use crate::core::intent::{GoalDisposition, UserIntent, parse_start_date};
use crate::core::orchestrator::{
    AccountSelector, FixedAccountSelector, RunError, SavingsOrchestrator,
};
use crate::providers;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

/// Values given on the command line; anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct RoundUpOptions {
    pub start_date: Option<String>,
    pub goal: Option<String>,
    pub existing_goal: Option<String>,
    /// 1-based account number, skipping the account prompt.
    pub account: Option<usize>,
    pub force_mock: bool,
}

pub async fn run(config: &AppConfig, options: RoundUpOptions) -> Result<()> {
    let today = Local::now().date_naive();
    ui::display_welcome();

    let intent = resolve_intent(&options, today)?;
    debug!(?intent, "Resolved user intent");

    let gateway = providers::build_gateway(config, options.force_mock)?;
    let selector: Arc<dyn AccountSelector> = match options.account {
        Some(number) => Arc::new(FixedAccountSelector(
            number.checked_sub(1).context("Account numbers start at 1")?,
        )),
        None => Arc::new(prompt::TerminalAccountSelector),
    };

    let mut orchestrator = SavingsOrchestrator::new(gateway, selector);
    match orchestrator.run(&intent, today).await {
        Ok(report) => {
            ui::display_report(&report);
            Ok(())
        }
        Err(RunError::NoAccounts) => {
            println!(
                "{}",
                ui::style_text("No accounts found for this user", ui::StyleType::Error)
            );
            Ok(())
        }
        Err(e) => Err(e).context("Round-up failed"),
    }
}

fn resolve_intent(options: &RoundUpOptions, today: NaiveDate) -> Result<UserIntent> {
    let disposition = match (&options.goal, &options.existing_goal) {
        (Some(name), _) => GoalDisposition::NewGoal(name.clone()),
        (None, Some(name)) => GoalDisposition::ExistingGoal(name.clone()),
        (None, None) => prompt::prompt_goal_disposition()?,
    };
    let start_date = match &options.start_date {
        Some(input) => parse_start_date(input, today)?,
        None => prompt::prompt_start_date(today)?,
    };

    Ok(UserIntent::new(start_date, disposition, today)?)
}
