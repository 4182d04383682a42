use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod cli;
mod settings;

use cli::Cli;
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chainsight=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run CLI
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    tracing::debug!("Cache TTL: {}s", settings.cache_ttl_seconds);

    // Initialize warehouse connection (optional; commands that need one
    // fail with a clear message)
    let database_url = cli.database_url.clone().or_else(|| settings.database_url.clone());

    let warehouse = if let Some(ref db_url) = database_url {
        let pool = chainsight_warehouse::WarehousePool::new(db_url).await?;
        Some(Arc::new(pool))
    } else {
        None
    };

    // Execute command
    commands::execute(cli.command, warehouse, settings).await
}
