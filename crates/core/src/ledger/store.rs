//! Store seams the engine is written against.
//!
//! Backends: [`MemoryLedger`](super::memory::MemoryLedger) for tests and
//! tooling, and the PostgreSQL repositories in `caixa-db`. Every backend
//! must enforce natural-key uniqueness inside `add` itself; the importer's
//! own duplicate check is only a shortcut. `replace_period` must be atomic.

use async_trait::async_trait;
use caixa_shared::types::{Money, MovementId, Period, UnitId, UserId};

use super::error::LedgerError;
use super::types::{MovementDraft, MovementFilter, NewMovement, NewUnit, StoredMovement, Unit};

/// Registry of units.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Registers a unit and assigns its id.
    async fn register_unit(&self, unit: NewUnit) -> Result<Unit, LedgerError>;

    /// Looks up a unit.
    async fn find_unit(&self, id: UnitId) -> Result<Option<Unit>, LedgerError>;

    /// All units ordered by name.
    async fn list_units(&self) -> Result<Vec<Unit>, LedgerError>;

    /// Removes a unit that no movement references.
    ///
    /// # Errors
    ///
    /// `UnitInUse` while movements exist, `UnitNotFound` if absent.
    async fn remove_unit(&self, id: UnitId) -> Result<(), LedgerError>;

    /// Looks up a unit, failing with `UnitNotFound` if it is absent.
    async fn get_unit(&self, id: UnitId) -> Result<Unit, LedgerError> {
        self.find_unit(id)
            .await?
            .ok_or(LedgerError::UnitNotFound(id))
    }
}

/// Collection of dated movements per unit.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Stores a movement, assigning its id, sequence and creation time.
    ///
    /// # Errors
    ///
    /// `DuplicateMovement` if the natural key already exists,
    /// `UnitNotFound` if the unit is not registered.
    async fn add(&self, movement: NewMovement) -> Result<StoredMovement, LedgerError>;

    /// Movements of a unit ordered by period, day, then insertion order.
    async fn list(
        &self,
        unit_id: UnitId,
        filter: MovementFilter,
    ) -> Result<Vec<StoredMovement>, LedgerError>;

    /// Hard-deletes one movement.
    async fn remove(&self, id: MovementId) -> Result<(), LedgerError>;

    /// Replaces every movement of a unit in a period with `movements`, all or
    /// nothing. Returns how many were deleted and the stored replacements.
    ///
    /// # Errors
    ///
    /// `UnitNotFound` if the unit is not registered, `DuplicateMovement` if two
    /// replacements share a natural key, `Validation(PeriodMismatch)` or
    /// `Validation(UnitMismatch)` if one is dated outside `period` or belongs
    /// to another unit. The period is left untouched on any error.
    async fn replace_period(
        &self,
        unit_id: UnitId,
        period: Period,
        movements: Vec<NewMovement>,
    ) -> Result<(u64, Vec<StoredMovement>), LedgerError>;

    /// Validates a draft and stores it.
    async fn add_draft(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        draft: &MovementDraft,
    ) -> Result<StoredMovement, LedgerError> {
        let movement = NewMovement::from_draft(unit_id, recorded_by, draft)?;
        self.add(movement).await
    }
}

/// Opening balances keyed by unit and period.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Stored opening balance, if one was ever set.
    async fn opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<Option<Money>, LedgerError>;

    /// Upserts the opening balance. Last write wins.
    async fn set_opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
        value: Money,
    ) -> Result<(), LedgerError>;
}

/// Everything the engine needs from a backend.
pub trait LedgerStore: UnitStore + MovementStore + BalanceStore {}

impl<T> LedgerStore for T where T: UnitStore + MovementStore + BalanceStore + ?Sized {}
