//! Execution of operator subcommands against any ledger store.

use std::path::Path;

use anyhow::{Context, bail};
use caixa_core::ledger::{
    BatchRecord, CarryService, LedgerStore, MovementDraft, NewUnit, RawMovement, ValidationError,
};
use caixa_core::reconcile::ReconcilingImporter;
use caixa_core::reports::{ExpectedTotals, ReportReader, ReportService, write_monthly_csv};
use caixa_shared::types::MatchStrategy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::cli::{Command, ReportFormat};

/// What a command printed.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Pretty-printed JSON.
    Json(Value),
    /// Text written as is.
    Text(String),
}

/// What a command produced.
#[derive(Debug)]
pub struct Output {
    /// Printed on stdout.
    pub body: Body,
    /// False when a check found a discrepancy; the process then exits non-zero.
    pub clean: bool,
}

impl Output {
    fn of<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(Self {
            body: Body::Json(serde_json::to_value(value)?),
            clean: true,
        })
    }
}

/// Types each element of a batch on its own so one bad record does not
/// sink the file.
fn batch_records(values: Vec<Value>) -> Vec<BatchRecord> {
    values
        .into_iter()
        .map(|value| {
            let description = value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match serde_json::from_value::<RawMovement>(value) {
                Ok(raw) => BatchRecord::from(raw),
                Err(err) => BatchRecord::Rejected {
                    description,
                    reason: ValidationError::MalformedRecord(err.to_string()),
                },
            }
        })
        .collect()
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Runs `command` against `store`.
pub async fn run<S>(store: &S, command: Command, strategy: MatchStrategy) -> anyhow::Result<Output>
where
    S: LedgerStore + ?Sized,
{
    let reader = ReportReader::new(store);
    match command {
        Command::Units => Output::of(&store.list_units().await?),
        Command::UnitAdd { name, field } => {
            let unit = store.register_unit(NewUnit::new(&name, &field)?).await?;
            Output::of(&unit)
        }
        Command::UnitRemove { unit } => {
            store.remove_unit(unit).await?;
            Output::of(&json!({ "removed": unit }))
        }
        Command::Import { unit, batch, user } => {
            let records = batch_records(read_json(&batch).await?);
            let summary = ReconcilingImporter::new(store)
                .with_strategy(strategy)
                .import_records(unit, user, &records)
                .await?;
            Output::of(&summary)
        }
        Command::Reset {
            unit,
            period,
            batch,
            user,
            confirm,
        } => {
            if !confirm {
                bail!("reset deletes every stored movement of {period}; pass --confirm to proceed");
            }
            let records = batch_records(read_json(&batch).await?);
            let mut drafts: Vec<MovementDraft> = Vec::with_capacity(records.len());
            for (index, record) in records.into_iter().enumerate() {
                match record {
                    BatchRecord::Draft(draft) => drafts.push(draft),
                    BatchRecord::Rejected { reason, .. } => {
                        bail!("batch item {index} cannot be read ({reason}); nothing was reset")
                    }
                }
            }
            let outcome = ReconcilingImporter::new(store)
                .with_strategy(strategy)
                .reset_period(unit, user, period, &drafts)
                .await?;
            Output::of(&outcome)
        }
        Command::Report {
            unit,
            period,
            format,
        } => {
            let report = reader.monthly(unit, period).await?;
            match format {
                ReportFormat::Json => Output::of(&report),
                ReportFormat::Csv => {
                    let heading = store.get_unit(unit).await?;
                    let mut sheet = Vec::new();
                    write_monthly_csv(&heading, &report, &mut sheet)?;
                    Ok(Output {
                        body: Body::Text(String::from_utf8(sheet)?),
                        clean: true,
                    })
                }
            }
        }
        Command::Year { unit, year } => Output::of(&reader.year_overview(unit, year).await?),
        Command::Field { field, period } => {
            Output::of(&reader.field_summary(&field, period).await?)
        }
        Command::OpeningSet {
            unit,
            period,
            amount,
        } => {
            CarryService::new(store).set(unit, period, amount).await?;
            Output::of(&json!({ "unit_id": unit, "period": period, "opening_balance": amount }))
        }
        Command::Close { unit, period } => {
            let report = reader.close_period(unit, period).await?;
            Output::of(&json!({
                "period": period,
                "closing_balance": report.closing_balance,
                "carried_to": period.next()?,
            }))
        }
        Command::Continuity { unit, period } => {
            let check = reader.continuity(unit, period).await?;
            let mut output = Output::of(&check)?;
            output.clean = check.is_continuous();
            Ok(output)
        }
        Command::Verify {
            unit,
            period,
            expected,
        } => {
            let expected: ExpectedTotals = read_json(&expected).await?;
            let report = reader.monthly(unit, period).await?;
            let mismatches = ReportService::verify_expected(&report, &expected);
            Ok(Output {
                clean: mismatches.is_empty(),
                body: Body::Json(serde_json::to_value(&mismatches)?),
            })
        }
    }
}
