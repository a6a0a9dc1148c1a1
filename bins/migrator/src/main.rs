//! Database migration runner for Caixa.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured).
//!
//! Usage:
//!   migrator up      - Create the units, movements and opening balance tables
//!   migrator down    - Drop them again
//!   migrator status  - Show which migrations are applied
//!   migrator fresh   - Drop everything and migrate from scratch

use caixa_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
