//! Ledger error types.
//!
//! `ValidationError` covers a single movement or unit that breaks a domain
//! rule. `LedgerError` is what store and service operations return.

use caixa_shared::AppError;
use caixa_shared::types::{MoneyParseError, MovementId, Money, Period, PeriodError, UnitId};
use thiserror::Error;

use super::types::{InflowCategory, NaturalKey};

/// A movement or unit rejected before it reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Inflow without a category.
    #[error("inflow movement requires a category")]
    MissingCategory,

    /// Outflow carrying a category.
    #[error("outflow movement must not carry a category (got {0})")]
    UnexpectedCategory(InflowCategory),

    /// Amounts are non-negative; direction carries the sign.
    #[error("amount cannot be negative: {0}")]
    NegativeAmount(Money),

    /// Day outside 1..=31.
    #[error("day must be between 1 and 31, got {0}")]
    InvalidDay(u8),

    /// Month or year out of range.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// A numeric batch field does not fit its type.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Field name as it appears in the batch.
        field: &'static str,
        /// Value found.
        value: i64,
    },

    /// A batch record is missing fields or has the wrong JSON shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Amount text could not be read.
    #[error(transparent)]
    InvalidAmount(#[from] MoneyParseError),

    /// Direction text is neither inflow nor outflow.
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    /// Category text is not tithe, offering or other.
    #[error("unknown inflow category: {0:?}")]
    UnknownCategory(String),

    /// Blank description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// Blank unit name.
    #[error("unit name cannot be empty")]
    EmptyUnitName,

    /// A stored movement handed to aggregation belongs elsewhere.
    #[error("movement {movement} belongs to unit {unit_id} period {period}, not the one being aggregated")]
    ForeignMovement {
        /// Offending movement.
        movement: MovementId,
        /// Unit it belongs to.
        unit_id: UnitId,
        /// Period it belongs to.
        period: Period,
    },

    /// A report or movement dated in another period than the one requested.
    #[error("expected period {expected}, found {found}")]
    PeriodMismatch {
        /// Requested period.
        expected: Period,
        /// Period actually found.
        found: Period,
    },

    /// A movement handed to one unit's operation belongs to another.
    #[error("movement for unit {found} handed to unit {expected}")]
    UnitMismatch {
        /// Unit being written.
        expected: UnitId,
        /// Unit the movement belongs to.
        found: UnitId,
    },

    /// A candidate in a period reset targets another period.
    #[error("batch item {index} is dated {found}, outside the period being reset ({expected})")]
    OutsideResetPeriod {
        /// Position in the batch.
        index: usize,
        /// Period being reset.
        expected: Period,
        /// Period the candidate is dated in, as `MM/YYYY`.
        found: String,
    },
}

/// Errors returned by ledger stores and services.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input rejected by a domain rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No unit with this id.
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    /// No movement with this id.
    #[error("Movement not found: {0}")]
    MovementNotFound(MovementId),

    /// Unit cannot be removed while movements reference it.
    #[error("Unit {unit_id} still has {movements} movement(s)")]
    UnitInUse {
        /// The unit.
        unit_id: UnitId,
        /// How many movements reference it.
        movements: u64,
    },

    /// The natural key already exists in the store.
    #[error("Duplicate movement for unit {unit_id} on day {day} of {period}: {description:?}")]
    DuplicateMovement {
        /// Unit of the rejected movement.
        unit_id: UnitId,
        /// Period of the rejected movement.
        period: Period,
        /// Day of the rejected movement.
        day: u8,
        /// Description of the rejected movement.
        description: String,
    },

    /// Report totals disagree with each other. Always a bug in aggregation.
    #[error("Reconciliation mismatch: {0}")]
    ReconciliationMismatch(String),

    /// Backing store failure (connectivity, poisoned lock, ...).
    #[error("Store error: {0}")]
    Store(String),
}

impl From<NaturalKey> for LedgerError {
    fn from(key: NaturalKey) -> Self {
        Self::DuplicateMovement {
            unit_id: key.unit_id,
            period: key.period,
            day: key.day,
            description: key.description,
        }
    }
}

impl LedgerError {
    /// Returns the error code for operator-facing output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnitNotFound(_) => "UNIT_NOT_FOUND",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::UnitInUse { .. } => "UNIT_IN_USE",
            Self::DuplicateMovement { .. } => "DUPLICATE_MOVEMENT",
            Self::ReconciliationMismatch(_) => "RECONCILIATION_MISMATCH",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns true if this error is isolated per record during a batch import.
    #[must_use]
    pub const fn is_record_level(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::Validation(_) => Self::Validation(message),
            LedgerError::UnitNotFound(_) | LedgerError::MovementNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::UnitInUse { .. } => Self::BusinessRule(message),
            LedgerError::DuplicateMovement { .. } => Self::Conflict(message),
            LedgerError::ReconciliationMismatch(_) => Self::Internal(message),
            LedgerError::Store(_) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::from(ValidationError::MissingCategory).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            LedgerError::UnitNotFound(UnitId::new()).error_code(),
            "UNIT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::Store("down".to_string()).error_code(),
            "STORE_ERROR"
        );
    }

    #[test]
    fn test_only_validation_is_record_level() {
        assert!(LedgerError::from(ValidationError::EmptyDescription).is_record_level());
        assert!(!LedgerError::Store("down".to_string()).is_record_level());
        assert!(!LedgerError::ReconciliationMismatch(String::new()).is_record_level());
    }

    #[test]
    fn test_app_error_mapping() {
        let unit_id = UnitId::new();
        assert_eq!(
            AppError::from(LedgerError::UnitNotFound(unit_id)).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            AppError::from(LedgerError::UnitInUse {
                unit_id,
                movements: 3
            })
            .error_code(),
            "BUSINESS_RULE_VIOLATION"
        );
        assert_eq!(
            AppError::from(LedgerError::ReconciliationMismatch("x".into())).error_code(),
            "INTERNAL_ERROR"
        );
        assert_eq!(
            AppError::from(LedgerError::Store("x".into())).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::NegativeAmount(Money::from_cents(-500)).to_string(),
            "amount cannot be negative: -5.00"
        );
        assert_eq!(
            LedgerError::from(ValidationError::InvalidDay(32)).to_string(),
            "day must be between 1 and 31, got 32"
        );
        assert_eq!(
            LedgerError::from(ValidationError::UnexpectedCategory(InflowCategory::Tithe))
                .to_string(),
            "outflow movement must not carry a category (got tithe)"
        );
    }
}
