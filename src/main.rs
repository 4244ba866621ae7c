use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use roundup::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Round up a week of spending into a savings goal
    Run {
        /// First day of the week to round up (yyyy-mm-dd)
        #[arg(short, long)]
        start_date: Option<String>,

        /// Name of a new savings goal to create and fund
        #[arg(short, long, conflicts_with = "existing_goal")]
        goal: Option<String>,

        /// Name of an existing savings goal to fund
        #[arg(short, long)]
        existing_goal: Option<String>,

        /// Account number to use when there are several
        #[arg(short, long)]
        account: Option<usize>,

        /// Use generated demo data regardless of the config
        #[arg(long)]
        mock: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => roundup::cli::setup::setup(),
        Some(Commands::Run {
            start_date,
            goal,
            existing_goal,
            account,
            mock,
        }) => {
            let options = roundup::RoundUpOptions {
                start_date,
                goal,
                existing_goal,
                account,
                force_mock: mock,
            };
            roundup::run_command(
                roundup::AppCommand::RoundUp(options),
                cli.config_path.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
