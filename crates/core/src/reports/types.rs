//! Report value objects. Computed on demand, never stored.

use caixa_shared::types::{Money, Period, UnitId};
use serde::{Deserialize, Serialize};

use crate::ledger::StoredMovement;

/// A movement annotated with the balance right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// The movement.
    #[serde(flatten)]
    pub movement: StoredMovement,
    /// Balance after applying this movement.
    pub running_balance: Money,
}

/// Totals and running balances of one unit for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    /// Unit reported on.
    pub unit_id: UnitId,
    /// Period reported on.
    pub period: Period,
    /// Balance inherited into the period.
    pub opening_balance: Money,
    /// Inflows categorized as tithe.
    pub total_tithe: Money,
    /// Inflows categorized as offering.
    pub total_offering: Money,
    /// Inflows categorized as other.
    pub total_other: Money,
    /// All inflows.
    pub total_inflow: Money,
    /// All outflows.
    pub total_outflow: Money,
    /// `opening + inflow - outflow`.
    pub closing_balance: Money,
    /// Movements in store order with running balances.
    pub lines: Vec<ReportLine>,
}

impl MonthlyReport {
    /// Checks the two reconciliation identities:
    /// inflow equals the category sum, and closing equals both
    /// `opening + inflow - outflow` and the last running balance.
    ///
    /// # Errors
    ///
    /// Returns a description of the first identity that fails.
    pub fn check_invariants(&self) -> Result<(), String> {
        let categories = self.total_tithe + self.total_offering + self.total_other;
        if self.total_inflow != categories {
            return Err(format!(
                "total inflow {} != tithe {} + offering {} + other {}",
                self.total_inflow, self.total_tithe, self.total_offering, self.total_other
            ));
        }

        let expected_closing = self.opening_balance + self.total_inflow - self.total_outflow;
        if self.closing_balance != expected_closing {
            return Err(format!(
                "closing {} != opening {} + inflow {} - outflow {}",
                self.closing_balance, self.opening_balance, self.total_inflow, self.total_outflow
            ));
        }

        let last_running = self
            .lines
            .last()
            .map_or(self.opening_balance, |line| line.running_balance);
        if self.closing_balance != last_running {
            return Err(format!(
                "closing {} != last running balance {last_running}",
                self.closing_balance
            ));
        }

        Ok(())
    }
}

/// Twelve consecutive monthly reports of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOverview {
    /// Unit reported on.
    pub unit_id: UnitId,
    /// Calendar year.
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthlyReport>,
}

impl YearOverview {
    /// Total inflow over the year.
    #[must_use]
    pub fn total_inflow(&self) -> Money {
        self.months.iter().map(|m| m.total_inflow).sum()
    }

    /// Total outflow over the year.
    #[must_use]
    pub fn total_outflow(&self) -> Money {
        self.months.iter().map(|m| m.total_outflow).sum()
    }
}

/// Monthly totals summed over every unit of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Field name.
    pub field: String,
    /// Period summarized.
    pub period: Period,
    /// Number of units included.
    pub units: usize,
    /// Sum of opening balances.
    pub opening_balance: Money,
    /// Sum of tithes.
    pub total_tithe: Money,
    /// Sum of offerings.
    pub total_offering: Money,
    /// Sum of other inflows.
    pub total_other: Money,
    /// Sum of inflows.
    pub total_inflow: Money,
    /// Sum of outflows.
    pub total_outflow: Money,
    /// Sum of closing balances.
    pub closing_balance: Money,
}

/// Totals stated by an external source (a paper ledger, a spreadsheet).
/// Fields left out are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedTotals {
    /// Expected tithe total.
    #[serde(default)]
    pub tithe: Option<Money>,
    /// Expected offering total.
    #[serde(default)]
    pub offering: Option<Money>,
    /// Expected other-income total.
    #[serde(default)]
    pub other: Option<Money>,
    /// Expected inflow total.
    #[serde(default)]
    pub inflow: Option<Money>,
    /// Expected outflow total.
    #[serde(default)]
    pub outflow: Option<Money>,
    /// Expected closing balance.
    #[serde(default)]
    pub closing: Option<Money>,
}

/// Which report total a mismatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsField {
    /// `total_tithe`.
    Tithe,
    /// `total_offering`.
    Offering,
    /// `total_other`.
    Other,
    /// `total_inflow`.
    Inflow,
    /// `total_outflow`.
    Outflow,
    /// `closing_balance`.
    Closing,
}

/// A computed total that differs from the externally stated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsMismatch {
    /// The total.
    pub field: TotalsField,
    /// Stated value.
    pub expected: Money,
    /// Computed value.
    pub actual: Money,
}

impl TotalsMismatch {
    /// `actual - expected`.
    #[must_use]
    pub fn difference(&self) -> Money {
        self.actual - self.expected
    }
}

/// Comparison of a period's stored opening balance with the previous closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinuityCheck {
    /// Period whose opening balance is checked.
    pub period: Period,
    /// Closing balance of the previous period.
    pub previous_closing: Money,
    /// Opening balance as stored, if any.
    pub stored_opening: Option<Money>,
    /// `effective opening - previous closing`, where a missing opening counts as zero.
    pub drift: Money,
}

impl ContinuityCheck {
    /// Returns true when the balances chain without a gap.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.drift.is_zero()
    }
}
