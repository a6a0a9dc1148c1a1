//! Monthly accounting period.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest year accepted for a period.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for a period.
pub const MAX_YEAR: i32 = 9999;

/// Errors building a period from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1..=12.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),

    /// Year outside the supported range.
    #[error("year must be between 1900 and 9999, got {0}")]
    InvalidYear(i32),

    /// Text is neither `MM/YYYY` nor `YYYY-MM`.
    #[error("invalid period {0:?}, expected MM/YYYY")]
    Malformed(String),
}

/// A calendar month of a given year.
///
/// Ordering is chronological. December's successor is January of the next year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u8,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u8,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.month, raw.year)
    }
}

impl Period {
    /// Creates a validated period.
    pub fn new(month: u8, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// Month number, 1 through 12.
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The following month.
    ///
    /// # Errors
    ///
    /// `InvalidYear` past December of the last supported year.
    pub fn next(self) -> Result<Self, PeriodError> {
        if self.month == 12 {
            Self::new(1, self.year + 1)
        } else {
            Self::new(self.month + 1, self.year)
        }
    }

    /// The preceding month.
    ///
    /// # Errors
    ///
    /// `InvalidYear` before January of the first supported year.
    pub fn previous(self) -> Result<Self, PeriodError> {
        if self.month == 1 {
            Self::new(12, self.year - 1)
        } else {
            Self::new(self.month - 1, self.year)
        }
    }

    /// All twelve months of `year`, January first.
    pub fn months_of(year: i32) -> Result<Vec<Self>, PeriodError> {
        (1..=12).map(|month| Self::new(month, year)).collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let malformed = || PeriodError::Malformed(s.to_string());

        let (month, year) = if let Some((month, year)) = text.split_once('/') {
            (month, year)
        } else if let Some((year, month)) = text.split_once('-') {
            (month, year)
        } else {
            return Err(malformed());
        };

        let month = month.trim().parse::<u8>().map_err(|_| malformed())?;
        let year = year.trim().parse::<i32>().map_err(|_| malformed())?;
        Self::new(month, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn test_rejects_month(#[case] month: u8) {
        assert_eq!(Period::new(month, 2025), Err(PeriodError::InvalidMonth(month)));
    }

    #[test]
    fn test_rejects_year() {
        assert_eq!(Period::new(1, 25), Err(PeriodError::InvalidYear(25)));
    }

    #[test]
    fn test_next_and_previous_roll_over_year() {
        let december = Period::new(12, 2025).unwrap();
        let january = Period::new(1, 2026).unwrap();
        assert_eq!(december.next(), Ok(january));
        assert_eq!(january.previous(), Ok(december));
        assert_eq!(Period::new(5, 2025).unwrap().next().unwrap().month(), 6);
    }

    #[test]
    fn test_next_and_previous_stop_at_supported_range() {
        let last = Period::new(12, MAX_YEAR).unwrap();
        let first = Period::new(1, MIN_YEAR).unwrap();
        assert_eq!(last.next(), Err(PeriodError::InvalidYear(MAX_YEAR + 1)));
        assert_eq!(first.previous(), Err(PeriodError::InvalidYear(MIN_YEAR - 1)));
        assert_eq!(last.previous().unwrap().month(), 11);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut periods = vec![
            Period::new(1, 2026).unwrap(),
            Period::new(11, 2025).unwrap(),
            Period::new(12, 2025).unwrap(),
        ];
        periods.sort();
        assert_eq!(
            periods.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["11/2025", "12/2025", "01/2026"]
        );
    }

    #[rstest]
    #[case("11/2025", 11, 2025)]
    #[case(" 3/2025 ", 3, 2025)]
    #[case("2025-07", 7, 2025)]
    fn test_parse(#[case] input: &str, #[case] month: u8, #[case] year: i32) {
        let period: Period = input.parse().unwrap();
        assert_eq!((period.month(), period.year()), (month, year));
    }

    #[rstest]
    #[case("november")]
    #[case("13/2025")]
    #[case("11/")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(input.parse::<Period>().is_err());
    }

    #[test]
    fn test_months_of_year() {
        let months = Period::months_of(2025).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month(), 1);
        assert_eq!(months[11].month(), 12);
    }

    #[test]
    fn test_serde_validates() {
        let period: Period = serde_json::from_str(r#"{"year":2025,"month":11}"#).unwrap();
        assert_eq!(period, Period::new(11, 2025).unwrap());
        assert!(serde_json::from_str::<Period>(r#"{"year":2025,"month":14}"#).is_err());
        assert_eq!(
            serde_json::to_string(&period).unwrap(),
            r#"{"year":2025,"month":11}"#
        );
    }
}
