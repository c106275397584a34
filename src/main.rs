mod commands;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use glow_track_core::{FileLibraryStore, LibraryStore, RestLibraryStore, RoutineLibraryManager};

use commands::{
    ConfigCommand, PackCommand, PrintCommand, ProductCommand, SearchCommand, ShowCommand,
    StepCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "glowtrack")]
#[command(about = "Skincare routine tracker", version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage routine packs
    Pack(PackCommand),

    /// Manage the steps of the current pack
    Step(StepCommand),

    /// Manage the products attached to a step
    Product(ProductCommand),

    /// Show the current routine as a checklist
    Show(ShowCommand),

    /// Print every pack (or a chosen subset) as a printable sheet
    Print(PrintCommand),

    /// Search the product catalog
    Search(SearchCommand),

    /// Inspect configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.clone())?;

    // Catalog search and config inspection never touch the store.
    match &cli.command {
        Commands::Search(cmd) => return cmd.run(),
        Commands::Config(cmd) => return cmd.run(&config),
        _ => {}
    }

    match &config.server_url {
        Some(url) => {
            let store = RestLibraryStore::new(url.clone(), config.api_key.clone());
            dispatch(&cli.command, store, &config).await
        }
        None => {
            let store = FileLibraryStore::new(config.data_dir.clone());
            dispatch(&cli.command, store, &config).await
        }
    }
}

async fn dispatch<S: LibraryStore + 'static>(
    command: &Commands,
    store: S,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = RoutineLibraryManager::new(store, Duration::from_millis(config.debounce_ms));
    manager
        .on_auth_state_changed(Some(config.identity()))
        .await?;

    match command {
        Commands::Pack(cmd) => cmd.run(&manager).await?,
        Commands::Step(cmd) => cmd.run(&manager).await?,
        Commands::Product(cmd) => cmd.run(&manager).await?,
        Commands::Show(cmd) => cmd.run(&manager).await?,
        Commands::Print(cmd) => cmd.run(&manager).await?,
        Commands::Search(_) | Commands::Config(_) => unreachable!(),
    }

    // One-shot process: make sure the write lands before exit instead of
    // waiting out the debounce window.
    manager.flush().await?;
    Ok(())
}
