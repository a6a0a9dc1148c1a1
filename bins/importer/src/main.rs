//! Caixa operator tool.
//!
//! Imports movement batches, resets periods, prints reports and maintains
//! opening balances against the configured PostgreSQL database.

mod cli;
mod commands;

use caixa_db::PgLedgerStore;
use caixa_shared::AppConfig;
use caixa_shared::config::LogConfig;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::commands::Body;

fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only the command output.
    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    let db = caixa_db::connect_with(&config.database).await?;
    info!("Connected to database");
    let store = PgLedgerStore::new(db);

    let strategy = cli.strategy.unwrap_or(config.import.match_strategy);
    let output = commands::run(&store, cli.command, strategy).await?;
    match &output.body {
        Body::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Body::Text(text) => print!("{text}"),
    }

    if !output.clean {
        std::process::exit(1);
    }
    Ok(())
}
