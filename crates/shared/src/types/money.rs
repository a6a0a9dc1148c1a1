//! Money type with exact two-digit decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and always carries exactly two
//! fraction digits. Rounding (banker's rounding) happens only where external
//! text or decimals enter the system; arithmetic between `Money` values is exact.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fraction digits carried by every amount.
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// A signed currency amount with exactly two fraction digits.
///
/// Serializes as a decimal string (`"90.11"`). Deserializes from a string in
/// either `52.89` or Brazilian `52,89` / `1.234,56` notation, or from a JSON
/// number; both paths round half-to-even to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr", into = "String")]
pub struct Money(Decimal);

/// Error returned when external text cannot be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    /// The input was empty after trimming.
    #[error("amount is empty")]
    Empty,

    /// The input is not a decimal number.
    #[error("invalid amount: {0:?}")]
    Invalid(String),

    /// A lone dot followed by exactly three digits, as in `1.500`, reads as
    /// either a thousands group or a decimal point.
    #[error("ambiguous amount {0:?}: write 1.500,00 for thousands or 1,50 for a decimal")]
    Ambiguous(String),
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount from a count of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, MINOR_UNIT_DIGITS))
    }

    /// Creates an amount from an arbitrary decimal, rounding half-to-even to the cent.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(MINOR_UNIT_DIGITS);
        Self(rounded)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.is_zero() { self } else { Self(-self.0) }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0.00");
        }
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };
        let body = body.strip_prefix("R$").map_or(body, str::trim_start);

        if body.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if body.starts_with(['-', '+']) {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }
        if is_ambiguous_grouping(body) {
            return Err(MoneyParseError::Ambiguous(s.to_string()));
        }

        let value = Decimal::from_str(&normalize_separators(body))
            .map_err(|_| MoneyParseError::Invalid(s.to_string()))?;

        Ok(Self::from_decimal(if negative { -value } else { value }))
    }
}

/// Rewrites Brazilian notation (`1.234,56`) and plain decimal commas (`52,89`)
/// into the `.`-separated form `Decimal` parses.
fn normalize_separators(body: &str) -> String {
    match (body.rfind(','), body.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => body.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => body.replace(',', ""),
        (Some(_), None) => body.replace(',', "."),
        _ => body.to_string(),
    }
}

/// `1.500` with no comma anywhere. A leading zero group (`0.125`) cannot be
/// a thousands separator and stays a decimal.
fn is_ambiguous_grouping(body: &str) -> bool {
    if body.contains(',') {
        return false;
    }
    match body.split_once('.') {
        Some((whole, fraction)) => {
            fraction.len() == 3
                && fraction.bytes().all(|b| b.is_ascii_digit())
                && !whole.trim_start_matches('0').is_empty()
        }
        None => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Text(String),
    Number(Decimal),
}

impl TryFrom<MoneyRepr> for Money {
    type Error = MoneyParseError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        match repr {
            MoneyRepr::Text(text) => text.parse(),
            MoneyRepr::Number(value) => Ok(Self::from_decimal(value)),
        }
    }
}
