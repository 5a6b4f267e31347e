mod history;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hotelpulse-cli")]
#[command(about = "Concurrent hotel rating and review-count retrieval")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Retrieve ratings for the roster and append them to the report
    Run {
        /// Only retrieve the hotel with this slug
        #[arg(long)]
        hotel: Option<String>,
        /// Maximum retrievals in flight (defaults to HOTELPULSE_MAX_CONCURRENT_HOTELS)
        #[arg(long)]
        concurrency: Option<usize>,
        /// List the hotels that would be retrieved without opening any session
        #[arg(long)]
        dry_run: bool,
    },
    /// Show summaries of recent runs from the report
    History {
        /// Maximum number of runs to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Load and validate the roster file
    ValidateRoster,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = hotelpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run {
            hotel,
            concurrency,
            dry_run,
        }) => run::run_hotels(&config, hotel.as_deref(), concurrency, dry_run).await?,
        Some(Commands::History { limit }) => history::show_history(&config, limit).await?,
        Some(Commands::ValidateRoster) => run::validate_roster(&config)?,
        None => println!("hotelpulse-cli: use `run`, `history` or `validate-roster` (see --help)"),
    }

    Ok(())
}
