//! Application-wide error types.
//!
//! Domain crates keep their own `thiserror` enums and convert into
//! `AppError` at the boundary a presentation layer talks to.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any state changed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate movement).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage backend error.
    #[error("Database error: {0}")]
    Database(String),

    /// Broken internal invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the caller can fix the problem by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::BusinessRule(_) | Self::Conflict(_)
        )
    }
}
