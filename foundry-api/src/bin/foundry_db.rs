use clap::{Parser, Subcommand};
use foundry_api::config::ApiConfig;
use foundry_api::storage::bootstrap;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "foundry-db", version, about = "Agent Foundry database bootstrap and migrations")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database if missing and apply pending migrations
    Init,
    /// Add provider/model columns to an agents table created before they existed
    AddModelColumns,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foundry_api::init_tracing();

    let cli = Cli::parse();
    let config = ApiConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Init => {
            let pool = bootstrap::prepare(&config.database).await?;
            pool.close().await;
            info!("Database initialized");
        }
        Command::AddModelColumns => {
            let pool = bootstrap::connect(&config.database).await?;
            let added = bootstrap::add_model_columns(&pool).await;
            pool.close().await;
            info!(added = ?added, "Finished agents table upgrade");
        }
    }

    Ok(())
}
