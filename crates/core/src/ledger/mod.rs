//! Movement ledger.
//!
//! This module implements the storage-facing half of the engine:
//! - Units and movements with the direction/category coupling enforced at construction
//! - Store traits (`UnitStore`, `MovementStore`, `BalanceStore`)
//! - An in-memory store backend
//! - Opening balance (carry) service
//! - Error types for ledger operations

pub mod carry;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use carry::CarryService;
pub use error::{LedgerError, ValidationError};
pub use memory::MemoryLedger;
pub use store::{BalanceStore, LedgerStore, MovementStore, UnitStore};
pub use types::{
    BatchRecord, Direction, Flow, InflowCategory, MatchKey, MovementDraft, MovementFilter,
    NaturalKey, NewMovement, NewUnit, RawAmount, RawMovement, StoredMovement, Unit,
};
