//! Ledger aggregation and reconciliation engine for Caixa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Stores are reached only through the traits in [`ledger::store`].
//!
//! # Modules
//!
//! - `ledger` - Units, movements, store traits, in-memory store, opening balances
//! - `reports` - Monthly aggregation, year overview, field consolidation
//! - `reconcile` - Idempotent batch import and explicit period reset

pub mod ledger;
pub mod reconcile;
pub mod reports;
