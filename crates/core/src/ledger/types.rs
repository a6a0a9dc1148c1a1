//! Domain types for units and movements.
//!
//! The direction/category coupling is carried by [`Flow`]: an inflow always
//! has a category and an outflow never does. [`NewMovement`] can only be built
//! through validation, so every movement that reaches a store is well formed.

use std::fmt;
use std::str::FromStr;

use caixa_shared::types::{MatchStrategy, Money, MovementId, Period, UnitId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// A congregation whose cash movements are tracked independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Parent field the unit belongs to.
    pub field: String,
    /// When the unit was registered.
    pub created_at: DateTime<Utc>,
}

/// Input for registering a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    name: String,
    field: String,
}

impl NewUnit {
    /// Validates and trims the unit's name and field.
    pub fn new(name: &str, field: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyUnitName);
        }
        Ok(Self {
            name: name.to_string(),
            field: field.trim().to_string(),
        })
    }

    /// Unit display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Whether cash came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money received.
    #[serde(alias = "entrada")]
    Inflow,
    /// Money spent.
    #[serde(alias = "saida")]
    Outflow,
}

impl Direction {
    /// Stable lowercase name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflow" | "entrada" => Ok(Self::Inflow),
            "outflow" | "saida" => Ok(Self::Outflow),
            other => Err(ValidationError::UnknownDirection(other.to_string())),
        }
    }
}

/// Bucket an inflow is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflowCategory {
    /// Tithes (dízimo).
    #[serde(alias = "dizimo")]
    Tithe,
    /// Offerings.
    #[serde(alias = "ofertas")]
    Offering,
    /// Any other income.
    #[serde(alias = "outros")]
    Other,
}

impl InflowCategory {
    /// Stable lowercase name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tithe => "tithe",
            Self::Offering => "offering",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for InflowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InflowCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tithe" | "dizimo" => Ok(Self::Tithe),
            "offering" | "ofertas" => Ok(Self::Offering),
            "other" | "outros" => Ok(Self::Other),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// Direction, category and amount of a movement as one closed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum Flow {
    /// Money received under a category.
    Inflow {
        /// Reporting bucket.
        category: InflowCategory,
        /// Non-negative amount.
        amount: Money,
    },
    /// Money spent.
    Outflow {
        /// Non-negative amount.
        amount: Money,
    },
}

impl Flow {
    /// Builds a flow from loosely-typed parts, enforcing the category coupling
    /// and a non-negative amount.
    pub fn from_parts(
        direction: Direction,
        category: Option<InflowCategory>,
        amount: Money,
    ) -> Result<Self, ValidationError> {
        if amount.is_negative() {
            return Err(ValidationError::NegativeAmount(amount));
        }
        match (direction, category) {
            (Direction::Inflow, Some(category)) => Ok(Self::Inflow { category, amount }),
            (Direction::Inflow, None) => Err(ValidationError::MissingCategory),
            (Direction::Outflow, None) => Ok(Self::Outflow { amount }),
            (Direction::Outflow, Some(category)) => {
                Err(ValidationError::UnexpectedCategory(category))
            }
        }
    }

    /// Direction of the flow.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::Inflow { .. } => Direction::Inflow,
            Self::Outflow { .. } => Direction::Outflow,
        }
    }

    /// Category, present only for inflows.
    #[must_use]
    pub const fn category(&self) -> Option<InflowCategory> {
        match self {
            Self::Inflow { category, .. } => Some(*category),
            Self::Outflow { .. } => None,
        }
    }

    /// Unsigned amount.
    #[must_use]
    pub const fn amount(&self) -> Money {
        match self {
            Self::Inflow { amount, .. } | Self::Outflow { amount } => *amount,
        }
    }

    /// Effect on the balance: positive for inflows, negative for outflows.
    #[must_use]
    pub fn balance_effect(&self) -> Money {
        match self {
            Self::Inflow { amount, .. } => *amount,
            Self::Outflow { amount } => -*amount,
        }
    }
}

/// A candidate movement as it arrives from an external batch or form.
///
/// Nothing is validated yet; see [`NewMovement::from_draft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    /// Day of month.
    pub day: u8,
    /// Month number.
    pub month: u8,
    /// Year.
    pub year: i32,
    /// Free-text annotation. Never parsed for amounts.
    pub description: String,
    /// Inflow or outflow.
    pub direction: Direction,
    /// Required for inflows, absent for outflows.
    #[serde(default, alias = "category")]
    pub inflow_category: Option<InflowCategory>,
    /// Authoritative amount.
    pub amount: Money,
}

/// One batch record before any typing beyond its JSON shape.
///
/// Numbers are read wide and text is kept as text so that a transcription
/// typo rejects only its own record. See [`RawMovement::into_draft`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMovement {
    /// Day of month.
    pub day: i64,
    /// Month number.
    pub month: i64,
    /// Year.
    pub year: i64,
    /// Free-text annotation.
    #[serde(default)]
    pub description: String,
    /// `inflow`/`entrada` or `outflow`/`saida`, any case.
    pub direction: String,
    /// Category name, any case. Blank counts as absent.
    #[serde(default, alias = "category")]
    pub inflow_category: Option<String>,
    /// Amount as text (`52,89`) or a JSON number.
    pub amount: RawAmount,
}

/// Amount as it appears in a batch record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Text in any notation [`Money`] parses.
    Text(String),
    /// A JSON number.
    Number(rust_decimal::Decimal),
}

impl RawMovement {
    /// Types every field.
    ///
    /// # Errors
    ///
    /// `OutOfRange` for a day, month or year that does not fit,
    /// `UnknownDirection`, `UnknownCategory` or `InvalidAmount`.
    pub fn into_draft(self) -> Result<MovementDraft, ValidationError> {
        let narrow = |field: &'static str, value: i64| ValidationError::OutOfRange { field, value };
        let day = u8::try_from(self.day).map_err(|_| narrow("day", self.day))?;
        let month = u8::try_from(self.month).map_err(|_| narrow("month", self.month))?;
        let year = i32::try_from(self.year).map_err(|_| narrow("year", self.year))?;

        let direction = self.direction.trim().to_lowercase().parse()?;
        let inflow_category = match self.inflow_category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(category) => Some(category.to_lowercase().parse()?),
        };
        let amount = match self.amount {
            RawAmount::Text(text) => text.parse()?,
            RawAmount::Number(value) => Money::from_decimal(value),
        };

        Ok(MovementDraft {
            day,
            month,
            year,
            description: self.description,
            direction,
            inflow_category,
            amount,
        })
    }
}

/// A batch record after typing: either a draft or the reason it was not one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchRecord {
    /// Typed; still to be matched and validated.
    Draft(MovementDraft),
    /// Could not be typed.
    Rejected {
        /// Description as far as it could be read.
        description: String,
        /// Why.
        reason: ValidationError,
    },
}

impl From<RawMovement> for BatchRecord {
    fn from(raw: RawMovement) -> Self {
        let description = raw.description.clone();
        match raw.into_draft() {
            Ok(draft) => Self::Draft(draft),
            Err(reason) => Self::Rejected {
                description,
                reason,
            },
        }
    }
}

impl From<MovementDraft> for BatchRecord {
    fn from(draft: MovementDraft) -> Self {
        Self::Draft(draft)
    }
}

/// A validated movement ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    unit_id: UnitId,
    period: Period,
    day: u8,
    description: String,
    flow: Flow,
    recorded_by: UserId,
}

impl NewMovement {
    /// Validates a movement.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the day is outside 1..=31, the
    /// description is blank, or the amount is negative.
    pub fn new(
        unit_id: UnitId,
        period: Period,
        day: u8,
        description: &str,
        flow: Flow,
        recorded_by: UserId,
    ) -> Result<Self, ValidationError> {
        if !(1..=31).contains(&day) {
            return Err(ValidationError::InvalidDay(day));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if flow.amount().is_negative() {
            return Err(ValidationError::NegativeAmount(flow.amount()));
        }
        Ok(Self {
            unit_id,
            period,
            day,
            description: description.to_string(),
            flow,
            recorded_by,
        })
    }

    /// Validates a draft for `unit_id`.
    pub fn from_draft(
        unit_id: UnitId,
        recorded_by: UserId,
        draft: &MovementDraft,
    ) -> Result<Self, ValidationError> {
        let period = Period::new(draft.month, draft.year)?;
        let flow = Flow::from_parts(draft.direction, draft.inflow_category, draft.amount)?;
        Self::new(unit_id, period, draft.day, &draft.description, flow, recorded_by)
    }

    /// Owning unit.
    #[must_use]
    pub const fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    /// Period the movement is dated in.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Day of month.
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Trimmed description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Direction, category and amount.
    #[must_use]
    pub const fn flow(&self) -> Flow {
        self.flow
    }

    /// Operator who recorded the movement.
    #[must_use]
    pub const fn recorded_by(&self) -> UserId {
        self.recorded_by
    }

    /// Identity used to detect the same real-world transaction.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            unit_id: self.unit_id,
            period: self.period,
            day: self.day,
            description: self.description.clone(),
            amount: self.flow.amount(),
        }
    }

    /// Checks that the movement belongs to `unit_id` and is dated in `period`.
    pub fn ensure_in(&self, unit_id: UnitId, period: Period) -> Result<(), ValidationError> {
        if self.unit_id != unit_id {
            return Err(ValidationError::UnitMismatch {
                expected: unit_id,
                found: self.unit_id,
            });
        }
        if self.period != period {
            return Err(ValidationError::PeriodMismatch {
                expected: period,
                found: self.period,
            });
        }
        Ok(())
    }

    /// Turns the movement into its stored form.
    #[must_use]
    pub fn into_stored(
        self,
        id: MovementId,
        sequence: i64,
        created_at: DateTime<Utc>,
    ) -> StoredMovement {
        StoredMovement {
            id,
            unit_id: self.unit_id,
            period: self.period,
            day: self.day,
            description: self.description,
            flow: self.flow,
            recorded_by: self.recorded_by,
            created_at,
            sequence,
        }
    }
}

/// A movement as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMovement {
    /// Movement identifier.
    pub id: MovementId,
    /// Owning unit.
    pub unit_id: UnitId,
    /// Period the movement is dated in.
    pub period: Period,
    /// Day of month.
    pub day: u8,
    /// Free-text annotation.
    pub description: String,
    /// Direction, category and amount.
    #[serde(flatten)]
    pub flow: Flow,
    /// Operator who recorded it.
    pub recorded_by: UserId,
    /// Assigned at insertion; immutable.
    pub created_at: DateTime<Utc>,
    /// Insertion order, used to break ties between movements on the same day.
    pub sequence: i64,
}

impl StoredMovement {
    /// Identity used to detect the same real-world transaction.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            unit_id: self.unit_id,
            period: self.period,
            day: self.day,
            description: self.description.clone(),
            amount: self.flow.amount(),
        }
    }

    /// Store ordering: period, then day, then insertion order.
    #[must_use]
    pub fn order_key(&self) -> (Period, u8, i64) {
        (self.period, self.day, self.sequence)
    }
}

/// Fields that identify the same real-world transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    /// Owning unit.
    pub unit_id: UnitId,
    /// Period.
    pub period: Period,
    /// Day of month.
    pub day: u8,
    /// Description, compared byte for byte.
    pub description: String,
    /// Amount.
    pub amount: Money,
}

/// Within-period identity used by the importer under a [`MatchStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    day: u8,
    amount: Money,
    description: String,
}

impl MatchKey {
    /// Builds the key for a movement with the given fields.
    #[must_use]
    pub fn new(strategy: MatchStrategy, day: u8, description: &str, amount: Money) -> Self {
        Self {
            day,
            amount,
            description: strategy.description_key(description.trim()).into_owned(),
        }
    }

    /// Key of a stored movement.
    #[must_use]
    pub fn of_stored(strategy: MatchStrategy, movement: &StoredMovement) -> Self {
        Self::new(strategy, movement.day, &movement.description, movement.flow.amount())
    }

    /// Key of a candidate draft.
    #[must_use]
    pub fn of_draft(strategy: MatchStrategy, draft: &MovementDraft) -> Self {
        Self::new(strategy, draft.day, &draft.description, draft.amount)
    }
}

/// Period filter for listing movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFilter {
    /// Restrict to this month number.
    pub month: Option<u8>,
    /// Restrict to this year.
    pub year: Option<i32>,
}

impl MovementFilter {
    /// Every movement of the unit.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            month: None,
            year: None,
        }
    }

    /// Movements of one period.
    #[must_use]
    pub const fn period(period: Period) -> Self {
        Self {
            month: Some(period.month()),
            year: Some(period.year()),
        }
    }

    /// Movements of one year.
    #[must_use]
    pub const fn year(year: i32) -> Self {
        Self {
            month: None,
            year: Some(year),
        }
    }

    /// Returns true if `period` passes the filter.
    #[must_use]
    pub fn matches(&self, period: Period) -> bool {
        self.month.is_none_or(|month| month == period.month())
            && self.year.is_none_or(|year| year == period.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(direction: Direction, category: Option<InflowCategory>, cents: i64) -> MovementDraft {
        MovementDraft {
            day: 2,
            month: 11,
            year: 2025,
            description: "Culto de Adoração - Ofertas".to_string(),
            direction,
            inflow_category: category,
            amount: Money::from_cents(cents),
        }
    }

    #[rstest]
    #[case(Direction::Inflow, None, ValidationError::MissingCategory)]
    #[case(
        Direction::Outflow,
        Some(InflowCategory::Other),
        ValidationError::UnexpectedCategory(InflowCategory::Other)
    )]
    fn test_flow_rejects_broken_coupling(
        #[case] direction: Direction,
        #[case] category: Option<InflowCategory>,
        #[case] expected: ValidationError,
    ) {
        assert_eq!(
            Flow::from_parts(direction, category, Money::from_cents(100)),
            Err(expected)
        );
    }

    #[test]
    fn test_flow_rejects_negative_amount() {
        let amount = Money::from_cents(-1);
        assert_eq!(
            Flow::from_parts(Direction::Outflow, None, amount),
            Err(ValidationError::NegativeAmount(amount))
        );
    }

    #[test]
    fn test_flow_balance_effect() {
        let inflow = Flow::from_parts(
            Direction::Inflow,
            Some(InflowCategory::Tithe),
            Money::from_cents(14000),
        )
        .unwrap();
        let outflow = Flow::from_parts(Direction::Outflow, None, Money::from_cents(5289)).unwrap();

        assert_eq!(inflow.balance_effect(), Money::from_cents(14000));
        assert_eq!(outflow.balance_effect(), Money::from_cents(-5289));
        assert_eq!(inflow.category(), Some(InflowCategory::Tithe));
        assert_eq!(outflow.category(), None);
        assert_eq!(outflow.direction(), Direction::Outflow);
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        assert!(Flow::from_parts(Direction::Outflow, None, Money::ZERO).is_ok());
    }

    #[test]
    fn test_new_movement_from_draft() {
        let unit_id = UnitId::new();
        let movement = NewMovement::from_draft(
            unit_id,
            UserId::new(),
            &draft(Direction::Inflow, Some(InflowCategory::Offering), 300),
        )
        .unwrap();

        assert_eq!(movement.unit_id(), unit_id);
        assert_eq!(movement.period(), Period::new(11, 2025).unwrap());
        assert_eq!(movement.day(), 2);
        assert_eq!(movement.flow().amount(), Money::from_cents(300));
        assert_eq!(movement.natural_key().description, "Culto de Adoração - Ofertas");
    }

    #[rstest]
    #[case(0, 11, ValidationError::InvalidDay(0))]
    #[case(32, 11, ValidationError::InvalidDay(32))]
    #[case(5, 13, ValidationError::InvalidPeriod(caixa_shared::types::PeriodError::InvalidMonth(13)))]
    fn test_new_movement_rejects_dates(
        #[case] day: u8,
        #[case] month: u8,
        #[case] expected: ValidationError,
    ) {
        let mut candidate = draft(Direction::Outflow, None, 100);
        candidate.day = day;
        candidate.month = month;
        assert_eq!(
            NewMovement::from_draft(UnitId::new(), UserId::new(), &candidate),
            Err(expected)
        );
    }

    #[test]
    fn test_new_movement_rejects_blank_description() {
        let mut candidate = draft(Direction::Outflow, None, 100);
        candidate.description = "   ".to_string();
        assert_eq!(
            NewMovement::from_draft(UnitId::new(), UserId::new(), &candidate),
            Err(ValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_draft_accepts_portuguese_aliases() {
        let json = r#"{
            "day": 30, "month": 11, "year": 2025,
            "description": "Dízimo",
            "direction": "entrada",
            "category": "dizimo",
            "amount": "140,00"
        }"#;
        let parsed: MovementDraft = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.direction, Direction::Inflow);
        assert_eq!(parsed.inflow_category, Some(InflowCategory::Tithe));
        assert_eq!(parsed.amount, Money::from_cents(14000));
    }

    #[test]
    fn test_draft_outflow_without_category() {
        let json = r#"{"day": 20, "month": 11, "year": 2025,
            "description": "Conta de luz", "direction": "outflow", "amount": 52.89}"#;
        let parsed: MovementDraft = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.inflow_category, None);
        assert_eq!(parsed.amount, Money::from_cents(5289));
    }

    fn raw(direction: &str, category: Option<&str>, amount: RawAmount) -> RawMovement {
        RawMovement {
            day: 2,
            month: 11,
            year: 2025,
            description: "Oferta".to_string(),
            direction: direction.to_string(),
            inflow_category: category.map(str::to_string),
            amount,
        }
    }

    #[test]
    fn test_raw_movement_types_loose_text() {
        let record = raw(" Entrada ", Some("OFERTAS"), RawAmount::Text("3,00".to_string()));
        let typed = record.into_draft().unwrap();
        assert_eq!(typed.direction, Direction::Inflow);
        assert_eq!(typed.inflow_category, Some(InflowCategory::Offering));
        assert_eq!(typed.amount, Money::from_cents(300));

        let amount = RawAmount::Number(Money::from_cents(5289).amount());
        let blank_category = raw("saida", Some("  "), amount);
        assert_eq!(blank_category.into_draft().unwrap().inflow_category, None);
    }

    #[rstest]
    #[case(
        raw("saidas", None, RawAmount::Text("1,00".to_string())),
        ValidationError::UnknownDirection("saidas".to_string())
    )]
    #[case(
        raw("entrada", Some("doacao"), RawAmount::Text("1,00".to_string())),
        ValidationError::UnknownCategory("doacao".to_string())
    )]
    #[case(
        raw("entrada", Some("dizimo"), RawAmount::Text("14O,00".to_string())),
        ValidationError::InvalidAmount(
            caixa_shared::types::MoneyParseError::Invalid("14O,00".to_string())
        )
    )]
    #[case(
        RawMovement {
            day: 300,
            ..raw("saida", None, RawAmount::Text("1,00".to_string()))
        },
        ValidationError::OutOfRange { field: "day", value: 300 }
    )]
    #[case(
        RawMovement {
            year: 5_000_000_000,
            ..raw("saida", None, RawAmount::Text("1,00".to_string()))
        },
        ValidationError::OutOfRange { field: "year", value: 5_000_000_000 }
    )]
    fn test_raw_movement_rejects_typos(
        #[case] record: RawMovement,
        #[case] expected: ValidationError,
    ) {
        assert_eq!(record.into_draft(), Err(expected));
    }

    #[test]
    fn test_batch_record_keeps_description_of_rejected() {
        let record = BatchRecord::from(raw("sideways", None, RawAmount::Text("1,00".to_string())));
        assert_eq!(
            record,
            BatchRecord::Rejected {
                description: "Oferta".to_string(),
                reason: ValidationError::UnknownDirection("sideways".to_string()),
            }
        );
    }

    #[test]
    fn test_raw_movement_reads_json_shapes() {
        let json = r#"{"day": 20, "month": 11, "year": 2025,
            "description": "Conta de luz", "direction": "saida", "amount": 52.89}"#;
        let parsed: RawMovement = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed.amount, RawAmount::Number(_)));
        assert_eq!(parsed.into_draft().unwrap().amount, Money::from_cents(5289));
    }

    #[rstest]
    #[case("inflow", Direction::Inflow)]
    #[case("saida", Direction::Outflow)]
    fn test_direction_parse(#[case] text: &str, #[case] expected: Direction) {
        assert_eq!(text.parse::<Direction>(), Ok(expected));
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(
            "gift".parse::<InflowCategory>(),
            Err(ValidationError::UnknownCategory("gift".to_string()))
        );
    }

    #[test]
    fn test_match_key_strategies() {
        let stored = draft(Direction::Inflow, Some(InflowCategory::Offering), 300);
        let mut variant = stored.clone();
        variant.description = "culto de adoracao- ofertas".to_string();

        assert_ne!(
            MatchKey::of_draft(MatchStrategy::Exact, &stored),
            MatchKey::of_draft(MatchStrategy::Exact, &variant)
        );
        assert_eq!(
            MatchKey::of_draft(MatchStrategy::Normalized, &stored),
            MatchKey::of_draft(MatchStrategy::Normalized, &variant)
        );
    }

    #[test]
    fn test_filter_matches() {
        let november = Period::new(11, 2025).unwrap();
        assert!(MovementFilter::all().matches(november));
        assert!(MovementFilter::period(november).matches(november));
        assert!(!MovementFilter::period(november).matches(november.next().unwrap()));
        assert!(MovementFilter::year(2025).matches(november));
        assert!(!MovementFilter::year(2026).matches(november));
    }

    #[test]
    fn test_new_unit_trims_and_rejects_blank() {
        let unit = NewUnit::new("  Sede ", " Campo Central ").unwrap();
        assert_eq!(unit.name(), "Sede");
        assert_eq!(unit.field(), "Campo Central");
        assert_eq!(NewUnit::new(" ", "x"), Err(ValidationError::EmptyUnitName));
    }
}
