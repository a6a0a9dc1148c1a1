//! `SeaORM` entities for the ledger tables.
//!
//! Each entity converts to its domain type through `into_domain`. A row that
//! does not satisfy the domain rules surfaces as a [`CorruptRow`].

pub mod movements;
pub mod opening_balances;
pub mod units;

use caixa_core::ledger::ValidationError;
use uuid::Uuid;

/// A stored row that no longer satisfies the domain rules.
#[derive(Debug, thiserror::Error)]
pub enum CorruptRow {
    /// A numeric column is outside the range of its domain type.
    #[error("{table} row {id}: column {column} out of range ({value})")]
    OutOfRange {
        /// Table name.
        table: &'static str,
        /// Row id.
        id: Uuid,
        /// Column name.
        column: &'static str,
        /// Stored value.
        value: i64,
    },

    /// The row decodes but fails validation.
    #[error("{table} row {id}: {source}")]
    Invalid {
        /// Table name.
        table: &'static str,
        /// Row id.
        id: Uuid,
        /// Validation failure.
        source: ValidationError,
    },
}

impl From<CorruptRow> for caixa_core::ledger::LedgerError {
    fn from(err: CorruptRow) -> Self {
        tracing::error!(error = %err, "corrupt ledger row");
        Self::Store(err.to_string())
    }
}
