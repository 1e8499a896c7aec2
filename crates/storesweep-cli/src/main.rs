use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod sink;
mod sweep;

#[derive(Debug, Parser)]
#[command(name = "storesweep")]
#[command(about = "Exhaustive store-finder sweep over a country's postal-code cells")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full sweep and write normalized records as JSON lines.
    Sweep {
        /// Print the cell count and configuration, then exit.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storesweep_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Sweep { dry_run }) => sweep::run_sweep(&config, dry_run).await,
        None => sweep::run_sweep(&config, false).await,
    }
}
