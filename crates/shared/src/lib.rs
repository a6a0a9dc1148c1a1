//! Shared types, errors, and configuration for Caixa.
//!
//! This crate provides the vocabulary every other crate speaks:
//! - `Money` with exact two-digit precision and Brazilian-notation parsing
//! - Typed IDs for units, movements, and operators
//! - Monthly `Period` with chronological ordering
//! - Description matching strategies for the reconciling importer
//! - Application-wide error type and layered configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
