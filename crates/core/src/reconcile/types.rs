//! Import summaries returned to operators.

use caixa_shared::types::Period;
use serde::Serialize;

/// Outcome counts for one period of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Month number as given in the batch.
    pub month: u8,
    /// Year as given in the batch.
    pub year: i32,
    /// Movements already stored for the period before the import started.
    pub existing: usize,
    /// Candidates stored by this import.
    pub inserted: usize,
    /// Candidates matching a movement already stored (or earlier in the batch).
    pub skipped: usize,
    /// Candidates rejected by validation.
    pub failed: usize,
}

impl PeriodSummary {
    /// The validated period, if the batch's month and year were in range.
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        Period::new(self.month, self.year).ok()
    }
}

/// A candidate that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    /// Position of the candidate in the submitted batch.
    pub index: usize,
    /// Candidate description, for the operator.
    pub description: String,
    /// Why validation rejected it.
    pub reason: String,
}

/// Result of a reconciling import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Per-period counts, oldest period first.
    pub periods: Vec<PeriodSummary>,
    /// Total stored.
    pub inserted: usize,
    /// Total skipped as already present.
    pub skipped: usize,
    /// Total rejected, including records that could not be read and so
    /// appear under no period.
    pub failed: usize,
    /// Every rejected candidate with its reason.
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    pub(crate) fn push(&mut self, period: PeriodSummary) {
        self.inserted += period.inserted;
        self.skipped += period.skipped;
        self.failed += period.failed;
        self.periods.push(period);
    }

    /// Number of candidates accounted for.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.inserted + self.skipped + self.failed
    }

    /// Returns true if nothing was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Result of a period reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    /// Period that was reset.
    pub period: Period,
    /// Stored movements the replacement deleted.
    pub removed: u64,
    /// Counts for the replacement batch. `existing` is always zero: candidates
    /// are matched against each other only.
    pub summary: ImportSummary,
}
