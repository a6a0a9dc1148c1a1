//! Semicolon-delimited rendering of a monthly report.
//!
//! The layout is the cash sheet a congregation hands to the field treasury:
//! a short heading, the movement table with the opening balance on top, a
//! totals row and the amount to remit. Amounts use a decimal comma.

use std::io::{self, Write};

use caixa_shared::types::{Money, UnitId};
use thiserror::Error;

use super::types::MonthlyReport;
use crate::ledger::{Flow, InflowCategory, Unit};

/// Column header of the movement table.
pub const SHEET_HEADER: [&str; 8] = [
    "DIA",
    "DESCRIÇÃO",
    "DÍZIMO",
    "OFERTAS",
    "OUTROS",
    "TOTAL ENTRADA",
    "SAÍDAS",
    "SALDO",
];

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Failure while writing a sheet.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The report was computed for another unit.
    #[error("report of unit {report} rendered with the heading of unit {unit}")]
    UnitMismatch {
        /// Unit the report belongs to.
        report: UnitId,
        /// Unit passed for the heading.
        unit: UnitId,
    },

    /// The CSV writer failed.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// The underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// `-49,89`: two decimals, decimal comma, no grouping.
#[must_use]
pub fn sheet_amount(value: Money) -> String {
    value.to_string().replace('.', ",")
}

/// Writes `report` as a cash sheet headed with `unit`'s name and field.
///
/// Semicolons inside descriptions become commas so every table row keeps
/// eight columns.
pub fn write_monthly_csv<W: Write>(
    unit: &Unit,
    report: &MonthlyReport,
    mut writer: W,
) -> Result<(), ExportError> {
    if report.unit_id != unit.id {
        return Err(ExportError::UnitMismatch {
            report: report.unit_id,
            unit: unit.id,
        });
    }

    let month = MONTH_NAMES[usize::from(report.period.month() - 1)];
    writeln!(writer, "MOVIMENTAÇÃO DO CAIXA - {month} de {}", report.period.year())?;
    writeln!(writer, "Campo: {}", unit.field)?;
    writeln!(writer, "Congregação: {}", unit.name)?;
    writeln!(writer)?;

    let mut csv = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(SHEET_HEADER)?;
    csv.write_record([
        "SALDO ANTERIOR",
        "",
        "",
        "",
        "",
        "",
        "",
        sheet_amount(report.opening_balance).as_str(),
    ])?;

    for line in &report.lines {
        let movement = &line.movement;
        let mut columns: [String; 5] = Default::default();
        match movement.flow {
            Flow::Inflow { category, amount } => {
                let slot = match category {
                    InflowCategory::Tithe => 0,
                    InflowCategory::Offering => 1,
                    InflowCategory::Other => 2,
                };
                columns[slot] = sheet_amount(amount);
                columns[3] = sheet_amount(amount);
            }
            Flow::Outflow { amount } => columns[4] = sheet_amount(amount),
        }
        let [tithe, offering, other, inflow, outflow] = columns;
        csv.write_record([
            movement.day.to_string(),
            movement.description.replace(';', ","),
            tithe,
            offering,
            other,
            inflow,
            outflow,
            sheet_amount(line.running_balance),
        ])?;
    }

    csv.write_record([
        "TOTAIS".to_string(),
        String::new(),
        sheet_amount(report.total_tithe),
        sheet_amount(report.total_offering),
        sheet_amount(report.total_other),
        sheet_amount(report.total_inflow),
        sheet_amount(report.total_outflow),
        sheet_amount(report.closing_balance),
    ])?;

    let mut writer = csv
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    writeln!(writer)?;
    writeln!(
        writer,
        "TOTAL A SER RECOLHIDO NA TESOURARIA DA SEDE: {}",
        sheet_amount(report.closing_balance)
    )?;
    writer.flush()?;
    Ok(())
}
