//! Repository implementations of the ledger store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the engine. Uniqueness
//! and referential rules are enforced by the schema; constraint violations
//! are translated into the matching [`LedgerError`].

pub mod balance;
pub mod ledger;
pub mod movement;
pub mod unit;

pub use balance::BalanceRepository;
pub use ledger::PgLedgerStore;
pub use movement::MovementRepository;
pub use unit::UnitRepository;

use caixa_core::ledger::LedgerError;
use sea_orm::DbErr;

/// Wraps a database failure the engine cannot act on.
pub(crate) fn store_error(err: DbErr) -> LedgerError {
    tracing::error!(error = %err, "database operation failed");
    LedgerError::Store(err.to_string())
}
