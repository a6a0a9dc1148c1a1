//! Monthly report generation.
//!
//! This module provides the ledger aggregator and the queries built on it:
//! - Monthly report (category totals, running balances, closing balance)
//! - Year overview
//! - Field consolidation
//! - Expected-totals verification
//! - Opening balance continuity and period close
//! - Semicolon-delimited cash sheet export

pub mod export;
pub mod reader;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use export::{ExportError, write_monthly_csv};
pub use reader::ReportReader;
pub use service::ReportService;
pub use types::*;
