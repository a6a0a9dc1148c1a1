//! In-process ledger store.
//!
//! Holds units, movements and opening balances behind one lock so the
//! natural-key check and the insert happen atomically. Each instance is
//! independent; nothing is global.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use caixa_shared::types::{Money, MovementId, Period, UnitId};
use chrono::Utc;

use super::error::LedgerError;
use super::store::{BalanceStore, MovementStore, UnitStore};
use super::types::{MovementFilter, NaturalKey, NewMovement, NewUnit, StoredMovement, Unit};

#[derive(Debug, Default)]
struct Inner {
    units: HashMap<UnitId, Unit>,
    movements: Vec<StoredMovement>,
    natural_keys: HashSet<NaturalKey>,
    balances: HashMap<(UnitId, Period), Money>,
    next_sequence: i64,
}

/// Ledger store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

fn poisoned<T>(_: PoisonError<T>) -> LedgerError {
    LedgerError::Store("memory ledger lock poisoned".to_string())
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored movements across all units.
    pub fn movement_count(&self) -> Result<usize, LedgerError> {
        Ok(self.inner.read().map_err(poisoned)?.movements.len())
    }
}

#[async_trait]
impl UnitStore for MemoryLedger {
    async fn register_unit(&self, unit: NewUnit) -> Result<Unit, LedgerError> {
        let unit = Unit {
            id: UnitId::new(),
            name: unit.name().to_string(),
            field: unit.field().to_string(),
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn find_unit(&self, id: UnitId) -> Result<Option<Unit>, LedgerError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.units.get(&id).cloned())
    }

    async fn list_units(&self) -> Result<Vec<Unit>, LedgerError> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut units: Vec<Unit> = inner.units.values().cloned().collect();
        units.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(units)
    }

    async fn remove_unit(&self, id: UnitId) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.units.contains_key(&id) {
            return Err(LedgerError::UnitNotFound(id));
        }
        let movements = inner.movements.iter().filter(|m| m.unit_id == id).count() as u64;
        if movements > 0 {
            return Err(LedgerError::UnitInUse {
                unit_id: id,
                movements,
            });
        }
        inner.units.remove(&id);
        inner.balances.retain(|(unit_id, _), _| *unit_id != id);
        Ok(())
    }
}

#[async_trait]
impl MovementStore for MemoryLedger {
    async fn add(&self, movement: NewMovement) -> Result<StoredMovement, LedgerError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.units.contains_key(&movement.unit_id()) {
            return Err(LedgerError::UnitNotFound(movement.unit_id()));
        }

        let key = movement.natural_key();
        if inner.natural_keys.contains(&key) {
            return Err(key.into());
        }

        inner.next_sequence += 1;
        let stored = movement.into_stored(MovementId::new(), inner.next_sequence, Utc::now());
        inner.natural_keys.insert(key);
        inner.movements.push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        unit_id: UnitId,
        filter: MovementFilter,
    ) -> Result<Vec<StoredMovement>, LedgerError> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut movements: Vec<StoredMovement> = inner
            .movements
            .iter()
            .filter(|m| m.unit_id == unit_id && filter.matches(m.period))
            .cloned()
            .collect();
        movements.sort_by_key(StoredMovement::order_key);
        Ok(movements)
    }

    async fn remove(&self, id: MovementId) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let position = inner
            .movements
            .iter()
            .position(|m| m.id == id)
            .ok_or(LedgerError::MovementNotFound(id))?;
        let removed = inner.movements.remove(position);
        inner.natural_keys.remove(&removed.natural_key());
        Ok(())
    }

    async fn replace_period(
        &self,
        unit_id: UnitId,
        period: Period,
        replacements: Vec<NewMovement>,
    ) -> Result<(u64, Vec<StoredMovement>), LedgerError> {
        for movement in &replacements {
            movement.ensure_in(unit_id, period)?;
        }
        let mut keys = HashSet::with_capacity(replacements.len());
        for movement in &replacements {
            let key = movement.natural_key();
            if keys.contains(&key) {
                return Err(key.into());
            }
            keys.insert(key);
        }

        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.units.contains_key(&unit_id) {
            return Err(LedgerError::UnitNotFound(unit_id));
        }
        let Inner {
            movements,
            natural_keys,
            next_sequence,
            ..
        } = &mut *inner;

        let before = movements.len();
        movements.retain(|m| {
            let doomed = m.unit_id == unit_id && m.period == period;
            if doomed {
                natural_keys.remove(&m.natural_key());
            }
            !doomed
        });
        let removed = (before - movements.len()) as u64;

        let now = Utc::now();
        let mut stored = Vec::with_capacity(replacements.len());
        for movement in replacements {
            *next_sequence += 1;
            let row = movement.into_stored(MovementId::new(), *next_sequence, now);
            movements.push(row.clone());
            stored.push(row);
        }
        natural_keys.extend(keys);
        Ok((removed, stored))
    }
}

#[async_trait]
impl BalanceStore for MemoryLedger {
    async fn opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<Option<Money>, LedgerError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.balances.get(&(unit_id, period)).copied())
    }

    async fn set_opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
        value: Money,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.units.contains_key(&unit_id) {
            return Err(LedgerError::UnitNotFound(unit_id));
        }
        inner.balances.insert((unit_id, period), value);
        Ok(())
    }
}
