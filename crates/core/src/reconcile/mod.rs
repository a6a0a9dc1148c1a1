//! Reconciling import of externally transcribed movements.
//!
//! - Additive, idempotent import keyed on the natural key
//! - Configurable description matching
//! - Per-period and total inserted/skipped/failed summaries
//! - Explicit period reset (atomic replacement of one period)

pub mod importer;
pub mod types;

#[cfg(test)]
mod importer_props;

pub use importer::ReconcilingImporter;
pub use types::{ImportFailure, ImportSummary, PeriodSummary, ResetOutcome};
