//! The full PostgreSQL ledger store.

use async_trait::async_trait;
use caixa_core::ledger::{
    BalanceStore, LedgerError, MovementFilter, MovementStore, NewMovement, NewUnit,
    StoredMovement, Unit, UnitStore,
};
use caixa_shared::types::{Money, MovementId, Period, UnitId};
use sea_orm::DatabaseConnection;

use super::{BalanceRepository, MovementRepository, UnitRepository};

/// Combines the three repositories into one
/// [`LedgerStore`](caixa_core::ledger::LedgerStore).
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    units: UnitRepository,
    movements: MovementRepository,
    balances: BalanceRepository,
}

impl PgLedgerStore {
    /// Creates a store sharing one connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            units: UnitRepository::new(db.clone()),
            movements: MovementRepository::new(db.clone()),
            balances: BalanceRepository::new(db),
        }
    }
}

#[async_trait]
impl UnitStore for PgLedgerStore {
    async fn register_unit(&self, unit: NewUnit) -> Result<Unit, LedgerError> {
        self.units.register_unit(unit).await
    }

    async fn find_unit(&self, id: UnitId) -> Result<Option<Unit>, LedgerError> {
        self.units.find_unit(id).await
    }

    async fn list_units(&self) -> Result<Vec<Unit>, LedgerError> {
        self.units.list_units().await
    }

    async fn remove_unit(&self, id: UnitId) -> Result<(), LedgerError> {
        self.units.remove_unit(id).await
    }
}

#[async_trait]
impl MovementStore for PgLedgerStore {
    async fn add(&self, movement: NewMovement) -> Result<StoredMovement, LedgerError> {
        self.movements.add(movement).await
    }

    async fn list(
        &self,
        unit_id: UnitId,
        filter: MovementFilter,
    ) -> Result<Vec<StoredMovement>, LedgerError> {
        self.movements.list(unit_id, filter).await
    }

    async fn remove(&self, id: MovementId) -> Result<(), LedgerError> {
        self.movements.remove(id).await
    }

    async fn replace_period(
        &self,
        unit_id: UnitId,
        period: Period,
        movements: Vec<NewMovement>,
    ) -> Result<(u64, Vec<StoredMovement>), LedgerError> {
        self.movements.replace_period(unit_id, period, movements).await
    }
}

#[async_trait]
impl BalanceStore for PgLedgerStore {
    async fn opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<Option<Money>, LedgerError> {
        self.balances.opening_balance(unit_id, period).await
    }

    async fn set_opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
        value: Money,
    ) -> Result<(), LedgerError> {
        self.balances
            .set_opening_balance(unit_id, period, value)
            .await
    }
}
