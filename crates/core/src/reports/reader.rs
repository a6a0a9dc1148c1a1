//! Store-backed report queries.
//!
//! Each query fetches its snapshot once and hands it to [`ReportService`].

use caixa_shared::types::{Money, Period, UnitId};

use super::service::ReportService;
use super::types::{ContinuityCheck, FieldSummary, MonthlyReport, YearOverview};
use crate::ledger::{CarryService, LedgerError, LedgerStore, MovementFilter, ValidationError};

/// Produces reports from a ledger store.
pub struct ReportReader<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> ReportReader<'a, S>
where
    S: LedgerStore + ?Sized,
{
    /// Creates a reader over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Monthly report for one unit and period.
    ///
    /// # Errors
    ///
    /// `UnitNotFound` for an unknown unit, `Store` on backend failure,
    /// and anything [`ReportService::aggregate`] rejects.
    pub async fn monthly(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<MonthlyReport, LedgerError> {
        let opening = CarryService::new(self.store).get(unit_id, period).await?;
        let movements = self
            .store
            .list(unit_id, MovementFilter::period(period))
            .await?;
        ReportService::aggregate(unit_id, period, opening, &movements)
    }

    /// Twelve monthly reports for `year`, each with its own stored opening balance.
    pub async fn year_overview(
        &self,
        unit_id: UnitId,
        year: i32,
    ) -> Result<YearOverview, LedgerError> {
        let mut months = Vec::with_capacity(12);
        for period in Period::months_of(year).map_err(ValidationError::from)? {
            months.push(self.monthly(unit_id, period).await?);
        }
        Ok(YearOverview {
            unit_id,
            year,
            months,
        })
    }

    /// Sum of the monthly reports of every unit in `field`.
    pub async fn field_summary(
        &self,
        field: &str,
        period: Period,
    ) -> Result<FieldSummary, LedgerError> {
        let units = self.store.list_units().await?;
        let mut reports = Vec::new();
        for unit in units.iter().filter(|u| u.field == field) {
            reports.push(self.monthly(unit.id, period).await?);
        }
        ReportService::consolidate(field, period, &reports)
    }

    /// Compares the stored opening balance of `period` with the closing
    /// balance of the period before it.
    pub async fn continuity(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<ContinuityCheck, LedgerError> {
        let previous_period = period.previous().map_err(ValidationError::from)?;
        let previous = self.monthly(unit_id, previous_period).await?;
        let stored_opening = self.store.opening_balance(unit_id, period).await?;
        let drift = stored_opening.unwrap_or(Money::ZERO) - previous.closing_balance;

        if !drift.is_zero() {
            tracing::warn!(
                unit = %unit_id,
                %period,
                previous_closing = %previous.closing_balance,
                %drift,
                "opening balance does not match previous closing"
            );
        }

        Ok(ContinuityCheck {
            period,
            previous_closing: previous.closing_balance,
            stored_opening,
            drift,
        })
    }

    /// Computes the period's report and carries its closing balance into the
    /// next period's opening balance.
    pub async fn close_period(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<MonthlyReport, LedgerError> {
        let report = self.monthly(unit_id, period).await?;
        CarryService::new(self.store)
            .carry_forward(unit_id, period, report.closing_balance)
            .await?;
        Ok(report)
    }
}
