//! Command-line surface of the `caixa` operator tool.

use std::path::PathBuf;

use caixa_shared::types::{MatchStrategy, Money, Period, UnitId, UserId};
use clap::{Parser, Subcommand, ValueEnum};

/// Cash ledger tooling for congregations and fields.
#[derive(Parser, Debug)]
#[command(name = "caixa", version, about, long_about = None)]
pub struct Cli {
    /// Description matching used by `import` and `reset` (`exact` or `normalized`).
    /// Overrides `import.match_strategy` from configuration.
    #[arg(long, global = true, value_name = "STRATEGY")]
    pub strategy: Option<MatchStrategy>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// How `report` prints a monthly report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// The full report as JSON.
    #[default]
    Json,
    /// The semicolon-delimited cash sheet.
    Csv,
}

/// Operator subcommands. Results are printed as JSON on stdout unless a
/// command says otherwise.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered units ordered by name.
    Units,

    /// Register a unit.
    UnitAdd {
        /// Unit display name.
        name: String,
        /// Field the unit belongs to.
        #[arg(long, default_value = "")]
        field: String,
    },

    /// Remove a unit that has no movements.
    UnitRemove {
        /// Unit id.
        unit: UnitId,
    },

    /// Import a JSON array of movements, skipping those already stored.
    Import {
        /// Unit id.
        unit: UnitId,
        /// Path to the JSON batch.
        batch: PathBuf,
        /// Operator recorded on every inserted movement.
        #[arg(long)]
        user: UserId,
    },

    /// Delete every movement of a period and import the batch in its place.
    Reset {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
        /// Path to the JSON batch.
        batch: PathBuf,
        /// Operator recorded on every inserted movement.
        #[arg(long)]
        user: UserId,
        /// Required; the reset deletes stored movements.
        #[arg(long)]
        confirm: bool,
    },

    /// Print the monthly report.
    Report {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
        /// `json`, or `csv` for the cash sheet.
        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
    },

    /// Print the twelve monthly reports of a year.
    Year {
        /// Unit id.
        unit: UnitId,
        /// Calendar year.
        year: i32,
    },

    /// Consolidate the monthly reports of every unit in a field.
    Field {
        /// Field name.
        field: String,
        /// Period as MM/YYYY.
        period: Period,
    },

    /// Set the opening balance of a period.
    OpeningSet {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
        /// Amount, e.g. `1.234,56` or `-25.50`.
        #[arg(allow_hyphen_values = true)]
        amount: Money,
    },

    /// Report a period and carry its closing balance into the next one.
    Close {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
    },

    /// Compare a period's opening balance with the previous closing balance.
    Continuity {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
    },

    /// Check a monthly report against expected totals from a JSON file.
    Verify {
        /// Unit id.
        unit: UnitId,
        /// Period as MM/YYYY.
        period: Period,
        /// Path to the expected totals.
        expected: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    const UNIT: &str = "0192f3a4-5b6c-7d8e-9f00-112233445566";
    const USER: &str = "0192f3a4-5b6c-7d8e-9f00-665544332211";

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("caixa").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let cli = parse(&["report", UNIT, "11/2025"]);
        assert_eq!(
            cli.command,
            Command::Report {
                unit: UNIT.parse().unwrap(),
                period: Period::new(11, 2025).unwrap(),
                format: ReportFormat::Json,
            }
        );
        assert_eq!(cli.strategy, None);
    }

    #[test]
    fn test_parse_report_as_csv() {
        let cli = parse(&["report", UNIT, "11/2025", "--format", "csv"]);
        assert!(matches!(
            cli.command,
            Command::Report {
                format: ReportFormat::Csv,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_import_with_strategy() {
        let cli = parse(&["import", UNIT, "nov.json", "--user", USER, "--strategy", "normalized"]);
        assert_eq!(cli.strategy, Some(MatchStrategy::Normalized));
        assert!(matches!(
            cli.command,
            Command::Import { ref batch, .. } if batch == &PathBuf::from("nov.json")
        ));
    }

    #[test]
    fn test_reset_defaults_to_unconfirmed() {
        let cli = parse(&["reset", UNIT, "2025-11", "nov.json", "--user", USER]);
        assert!(matches!(cli.command, Command::Reset { confirm: false, .. }));
    }

    #[rstest]
    #[case("1.234,56", 123_456)]
    #[case("-25,50", -2_550)]
    #[case("R$ 90,11", 9_011)]
    fn test_parse_opening_amount(#[case] amount: &str, #[case] cents: i64) {
        let cli = parse(&["opening-set", UNIT, "12/2025", amount]);
        assert!(matches!(
            cli.command,
            Command::OpeningSet { amount, .. } if amount == Money::from_cents(cents)
        ));
    }

    #[rstest]
    #[case(&["report", "not-a-uuid", "11/2025"])]
    #[case(&["report", UNIT, "13/2025"])]
    #[case(&["import", UNIT, "nov.json"])]
    #[case(&["opening-set", UNIT, "12/2025", "abc"])]
    #[case(&["opening-set", UNIT, "12/2025", "1.500"])]
    #[case(&["report", UNIT, "11/2025", "--format", "xlsx"])]
    fn test_rejects_bad_arguments(#[case] args: &[&str]) {
        let argv = std::iter::once("caixa").chain(args.iter().copied());
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
