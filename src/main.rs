//! timepipe main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use timepipe_api::start_server;
use timepipe_config::Config;
use timepipe_core::TransactionStore;
use timepipe_source::source_from_config;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "timepipe")]
#[command(version = "0.1.0")]
#[command(about = "Searchable transaction table with time pipe deltas", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a commented default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            // the logger is not up yet
            eprintln!("{}", e.report());
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to load configuration from {}", args.config.display())));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level)).init();

    if args.config.exists() {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    let rt = Runtime::new()?;

    rt.block_on(async {
        let source = source_from_config(&config.source);
        log::info!("Transaction source: {}", source.describe());

        let store = Arc::new(TransactionStore::new(source));

        // A failed first fetch still serves the page, with an empty table and a notice
        match store.load().await {
            Ok(count) => log::info!("Initial load: {} transactions", count),
            Err(e) => log::warn!("Initial load failed: {}", e),
        }

        start_server(config, store).await.context("Server error")
    })
}
