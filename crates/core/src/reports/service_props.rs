//! Property-based tests for ReportService::aggregate.
//!
//! Feature: ledger-aggregation
//! - Property 1: Determinism
//! - Property 2: Category Reconciliation
//! - Property 3: Closing Balance Identity
//! - Property 4: Running Balance Is A Prefix Sum

use caixa_shared::types::{Money, MovementId, Period, UnitId, UserId};
use chrono::Utc;
use proptest::prelude::*;

use super::service::ReportService;
use crate::ledger::{Flow, InflowCategory, StoredMovement};

/// Strategy for non-negative amounts (0.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(Money::from_cents)
}

/// Strategy for signed opening balances.
fn opening() -> impl Strategy<Value = Money> {
    (-5_000_000i64..5_000_000i64).prop_map(Money::from_cents)
}

fn flow() -> impl Strategy<Value = Flow> {
    prop_oneof![
        amount().prop_map(|amount| Flow::Inflow {
            category: InflowCategory::Tithe,
            amount
        }),
        amount().prop_map(|amount| Flow::Inflow {
            category: InflowCategory::Offering,
            amount
        }),
        amount().prop_map(|amount| Flow::Inflow {
            category: InflowCategory::Other,
            amount
        }),
        amount().prop_map(|amount| Flow::Outflow { amount }),
    ]
}

/// Movements for one unit/period already in store order.
fn movements(unit_id: UnitId, period: Period) -> impl Strategy<Value = Vec<StoredMovement>> {
    prop::collection::vec((1u8..=31, flow()), 0..40).prop_map(move |mut rows| {
        rows.sort_by_key(|(day, _)| *day);
        let recorded_by = UserId::new();
        rows.into_iter()
            .enumerate()
            .map(|(i, (day, flow))| StoredMovement {
                id: MovementId::new(),
                unit_id,
                period,
                day,
                description: format!("movement {i}"),
                flow,
                recorded_by,
                created_at: Utc::now(),
                sequence: i64::try_from(i).unwrap_or(i64::MAX),
            })
            .collect()
    })
}

fn fixture() -> (UnitId, Period) {
    (UnitId::new(), Period::new(11, 2025).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Feature: ledger-aggregation, Property 1: Determinism
    /// Aggregating the same list twice with the same opening yields identical reports.
    #[test]
    fn prop_aggregate_is_deterministic(
        (unit_id, period, list, open) in Just(fixture()).prop_flat_map(|(unit_id, period)| {
            (Just(unit_id), Just(period), movements(unit_id, period), opening())
        })
    ) {
        let first = ReportService::aggregate(unit_id, period, open, &list).unwrap();
        let second = ReportService::aggregate(unit_id, period, open, &list).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Feature: ledger-aggregation, Property 2: Category Reconciliation
    /// total_inflow == total_tithe + total_offering + total_other.
    #[test]
    fn prop_inflow_equals_category_sum(
        (unit_id, period, list, open) in Just(fixture()).prop_flat_map(|(unit_id, period)| {
            (Just(unit_id), Just(period), movements(unit_id, period), opening())
        })
    ) {
        let report = ReportService::aggregate(unit_id, period, open, &list).unwrap();
        prop_assert_eq!(
            report.total_inflow,
            report.total_tithe + report.total_offering + report.total_other
        );

        let outflow: Money = list
            .iter()
            .filter(|m| matches!(m.flow, Flow::Outflow { .. }))
            .map(|m| m.flow.amount())
            .sum();
        prop_assert_eq!(report.total_outflow, outflow);
    }

    /// Feature: ledger-aggregation, Property 3: Closing Balance Identity
    /// closing == opening + inflow - outflow == last running balance (or opening).
    #[test]
    fn prop_closing_balance_identity(
        (unit_id, period, list, open) in Just(fixture()).prop_flat_map(|(unit_id, period)| {
            (Just(unit_id), Just(period), movements(unit_id, period), opening())
        })
    ) {
        let report = ReportService::aggregate(unit_id, period, open, &list).unwrap();
        prop_assert_eq!(
            report.closing_balance,
            open + report.total_inflow - report.total_outflow
        );
        let last = report.lines.last().map_or(open, |line| line.running_balance);
        prop_assert_eq!(report.closing_balance, last);
        prop_assert!(report.check_invariants().is_ok());
    }

    /// Feature: ledger-aggregation, Property 4: Running Balance Is A Prefix Sum
    /// Each line's balance equals opening plus the signed amounts up to and including it.
    #[test]
    fn prop_running_balance_is_prefix_sum(
        (unit_id, period, list, open) in Just(fixture()).prop_flat_map(|(unit_id, period)| {
            (Just(unit_id), Just(period), movements(unit_id, period), opening())
        })
    ) {
        let report = ReportService::aggregate(unit_id, period, open, &list).unwrap();
        prop_assert_eq!(report.lines.len(), list.len());

        for (i, line) in report.lines.iter().enumerate() {
            let prefix: Money = list[..=i].iter().map(|m| m.flow.balance_effect()).sum();
            prop_assert_eq!(line.running_balance, open + prefix);
            prop_assert_eq!(&line.movement, &list[i]);
        }
    }
}
