//! PostgreSQL backend for the Caixa ledger.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the `caixa-core` store traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{BalanceRepository, MovementRepository, PgLedgerStore, UnitRepository};

use caixa_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "connecting to database"
    );
    Database::connect(options).await
}
