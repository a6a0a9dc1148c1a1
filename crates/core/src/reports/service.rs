//! Ledger aggregation.
//!
//! Pure functions over an already-fetched movement snapshot. The same
//! snapshot and opening balance always produce the same report.

use caixa_shared::types::{Money, Period, UnitId};

use super::types::{
    ExpectedTotals, FieldSummary, MonthlyReport, ReportLine, TotalsField, TotalsMismatch,
};
use crate::ledger::{Flow, InflowCategory, LedgerError, StoredMovement, ValidationError};

/// Service for folding movements into reports.
pub struct ReportService;

impl ReportService {
    /// Folds a period's movements and its opening balance into a report.
    ///
    /// Movements are applied in the order given, which must be store order.
    /// Running balances, category totals and the closing balance are computed
    /// in a single pass, then the reconciliation identities are checked.
    ///
    /// # Errors
    ///
    /// - `Validation` if a movement belongs to another unit or period, or has
    ///   a day outside 1..=31 (it bypassed insertion-time validation).
    /// - `ReconciliationMismatch` if the computed totals disagree with each
    ///   other. This is a bug and is logged at `error`.
    pub fn aggregate(
        unit_id: UnitId,
        period: Period,
        opening_balance: Money,
        movements: &[StoredMovement],
    ) -> Result<MonthlyReport, LedgerError> {
        let mut running = opening_balance;
        let mut total_tithe = Money::ZERO;
        let mut total_offering = Money::ZERO;
        let mut total_other = Money::ZERO;
        let mut total_inflow = Money::ZERO;
        let mut total_outflow = Money::ZERO;
        let mut lines = Vec::with_capacity(movements.len());

        for movement in movements {
            Self::check_membership(unit_id, period, movement)?;

            match movement.flow {
                Flow::Inflow { category, amount } => {
                    total_inflow += amount;
                    match category {
                        InflowCategory::Tithe => total_tithe += amount,
                        InflowCategory::Offering => total_offering += amount,
                        InflowCategory::Other => total_other += amount,
                    }
                }
                Flow::Outflow { amount } => total_outflow += amount,
            }
            running += movement.flow.balance_effect();

            lines.push(ReportLine {
                movement: movement.clone(),
                running_balance: running,
            });
        }

        let report = MonthlyReport {
            unit_id,
            period,
            opening_balance,
            total_tithe,
            total_offering,
            total_other,
            total_inflow,
            total_outflow,
            closing_balance: opening_balance + total_inflow - total_outflow,
            lines,
        };

        if let Err(detail) = report.check_invariants() {
            tracing::error!(unit = %unit_id, %period, %detail, "report failed reconciliation");
            return Err(LedgerError::ReconciliationMismatch(detail));
        }

        Ok(report)
    }

    fn check_membership(
        unit_id: UnitId,
        period: Period,
        movement: &StoredMovement,
    ) -> Result<(), ValidationError> {
        if movement.unit_id != unit_id || movement.period != period {
            return Err(ValidationError::ForeignMovement {
                movement: movement.id,
                unit_id: movement.unit_id,
                period: movement.period,
            });
        }
        if !(1..=31).contains(&movement.day) {
            return Err(ValidationError::InvalidDay(movement.day));
        }
        if movement.flow.amount().is_negative() {
            return Err(ValidationError::NegativeAmount(movement.flow.amount()));
        }
        Ok(())
    }

    /// Sums reports of several units for the same period.
    ///
    /// # Errors
    ///
    /// `Validation` if a report is for another period.
    pub fn consolidate(
        field: &str,
        period: Period,
        reports: &[MonthlyReport],
    ) -> Result<FieldSummary, LedgerError> {
        let mut summary = FieldSummary {
            field: field.to_string(),
            period,
            units: 0,
            opening_balance: Money::ZERO,
            total_tithe: Money::ZERO,
            total_offering: Money::ZERO,
            total_other: Money::ZERO,
            total_inflow: Money::ZERO,
            total_outflow: Money::ZERO,
            closing_balance: Money::ZERO,
        };

        for report in reports {
            if report.period != period {
                return Err(ValidationError::PeriodMismatch {
                    expected: period,
                    found: report.period,
                }
                .into());
            }
            summary.units += 1;
            summary.opening_balance += report.opening_balance;
            summary.total_tithe += report.total_tithe;
            summary.total_offering += report.total_offering;
            summary.total_other += report.total_other;
            summary.total_inflow += report.total_inflow;
            summary.total_outflow += report.total_outflow;
            summary.closing_balance += report.closing_balance;
        }

        Ok(summary)
    }

    /// Compares a report against externally stated totals.
    /// Returns one entry per stated total that differs; empty means it reconciles.
    #[must_use]
    pub fn verify_expected(report: &MonthlyReport, expected: &ExpectedTotals) -> Vec<TotalsMismatch> {
        [
            (TotalsField::Tithe, expected.tithe, report.total_tithe),
            (TotalsField::Offering, expected.offering, report.total_offering),
            (TotalsField::Other, expected.other, report.total_other),
            (TotalsField::Inflow, expected.inflow, report.total_inflow),
            (TotalsField::Outflow, expected.outflow, report.total_outflow),
            (TotalsField::Closing, expected.closing, report.closing_balance),
        ]
        .into_iter()
        .filter_map(|(field, expected, actual)| {
            expected
                .filter(|value| *value != actual)
                .map(|expected| TotalsMismatch {
                    field,
                    expected,
                    actual,
                })
        })
        .collect()
    }
}
