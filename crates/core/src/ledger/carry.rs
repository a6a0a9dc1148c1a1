//! Opening balance (carry) service.
//!
//! An opening balance is never derived from the previous period on its own.
//! Callers that want the chain kept in sync use [`CarryService::carry_forward`]
//! explicitly, or compare the two with
//! [`ReportReader::continuity`](crate::reports::ReportReader::continuity).

use caixa_shared::types::{Money, Period, UnitId};

use super::error::{LedgerError, ValidationError};
use super::store::{BalanceStore, UnitStore};

/// Reads and writes opening balances for a unit's periods.
pub struct CarryService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> CarryService<'a, S>
where
    S: UnitStore + BalanceStore + ?Sized,
{
    /// Creates a carry service over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Opening balance for the period, or zero if none was recorded.
    ///
    /// # Errors
    ///
    /// `UnitNotFound` if the unit is not registered.
    pub async fn get(&self, unit_id: UnitId, period: Period) -> Result<Money, LedgerError> {
        self.store.get_unit(unit_id).await?;
        Ok(self
            .store
            .opening_balance(unit_id, period)
            .await?
            .unwrap_or(Money::ZERO))
    }

    /// Upserts the opening balance. No history is kept.
    pub async fn set(
        &self,
        unit_id: UnitId,
        period: Period,
        value: Money,
    ) -> Result<(), LedgerError> {
        self.store.get_unit(unit_id).await?;
        self.store.set_opening_balance(unit_id, period, value).await?;
        tracing::debug!(unit = %unit_id, %period, opening = %value, "opening balance set");
        Ok(())
    }

    /// Writes `closing` as the opening balance of the period after `period`.
    /// Returns that next period.
    ///
    /// # Errors
    ///
    /// `Validation(InvalidPeriod)` when `period` is the last supported month.
    pub async fn carry_forward(
        &self,
        unit_id: UnitId,
        period: Period,
        closing: Money,
    ) -> Result<Period, LedgerError> {
        let next = period.next().map_err(ValidationError::from)?;
        self.set(unit_id, next, closing).await?;
        tracing::info!(unit = %unit_id, from = %period, to = %next, balance = %closing, "balance carried forward");
        Ok(next)
    }
}
