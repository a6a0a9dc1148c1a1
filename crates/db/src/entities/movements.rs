//! `SeaORM` Entity for movements table.

use caixa_core::ledger::{Direction, Flow, InflowCategory, StoredMovement, ValidationError};
use caixa_shared::types::{Money, MovementId, Period, UnitId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::CorruptRow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub sequence: i64,
    pub year: i32,
    pub month: i16,
    pub day: i16,
    pub description: String,
    pub direction: String,
    pub inflow_category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub recorded_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id"
    )]
    Units,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a stored movement, re-checking the domain rules.
    ///
    /// # Errors
    ///
    /// Returns [`CorruptRow`] if a column is out of range or the
    /// direction/category coupling does not hold.
    pub fn into_domain(self) -> Result<StoredMovement, CorruptRow> {
        let id = self.id;
        let narrow = |column: &'static str, value: i16| {
            u8::try_from(value).map_err(|_| CorruptRow::OutOfRange {
                table: "movements",
                id,
                column,
                value: i64::from(value),
            })
        };
        let invalid = |source: ValidationError| CorruptRow::Invalid {
            table: "movements",
            id,
            source,
        };

        let month = narrow("month", self.month)?;
        let day = narrow("day", self.day)?;
        if !(1..=31).contains(&day) {
            return Err(invalid(ValidationError::InvalidDay(day)));
        }
        let period = Period::new(month, self.year).map_err(|err| invalid(err.into()))?;

        let direction: Direction = self.direction.parse().map_err(invalid)?;
        let category = self
            .inflow_category
            .as_deref()
            .map(str::parse::<InflowCategory>)
            .transpose()
            .map_err(invalid)?;
        let flow = Flow::from_parts(direction, category, Money::from_decimal(self.amount))
            .map_err(invalid)?;

        Ok(StoredMovement {
            id: MovementId::from_uuid(self.id),
            unit_id: UnitId::from_uuid(self.unit_id),
            period,
            day,
            description: self.description,
            flow,
            recorded_by: UserId::from_uuid(self.recorded_by),
            created_at: self.created_at.to_utc(),
            sequence: self.sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn row() -> Model {
        Model {
            id: Uuid::now_v7(),
            unit_id: Uuid::now_v7(),
            sequence: 7,
            year: 2025,
            month: 11,
            day: 2,
            description: "Culto de Adoração - Ofertas".to_string(),
            direction: "inflow".to_string(),
            inflow_category: Some("offering".to_string()),
            amount: dec!(111.50),
            recorded_by: Uuid::now_v7(),
            created_at: FixedOffset::west_opt(3 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 11, 2, 20, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_row_converts_to_movement() {
        let model = row();
        let movement = model.clone().into_domain().unwrap();

        assert_eq!(movement.id.into_inner(), model.id);
        assert_eq!(movement.period, Period::new(11, 2025).unwrap());
        assert_eq!(movement.day, 2);
        assert_eq!(movement.sequence, 7);
        assert_eq!(
            movement.flow,
            Flow::Inflow {
                category: InflowCategory::Offering,
                amount: Money::from_cents(11_150),
            }
        );
        assert_eq!(movement.created_at.to_rfc3339(), "2025-11-02T23:00:00+00:00");
    }

    #[test]
    fn test_outflow_row_without_category() {
        let model = Model {
            direction: "outflow".to_string(),
            inflow_category: None,
            amount: dec!(92.41),
            ..row()
        };
        let movement = model.into_domain().unwrap();
        assert_eq!(movement.flow.balance_effect(), Money::from_cents(-9241));
    }

    #[test]
    fn test_inflow_row_without_category_is_corrupt() {
        let model = Model {
            inflow_category: None,
            ..row()
        };
        let err = model.into_domain().unwrap_err();
        assert!(matches!(
            err,
            CorruptRow::Invalid {
                source: ValidationError::MissingCategory,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_month_is_out_of_range() {
        let model = Model { month: -1, ..row() };
        let err = model.into_domain().unwrap_err();
        assert!(matches!(
            err,
            CorruptRow::OutOfRange {
                column: "month",
                value: -1,
                ..
            }
        ));
    }

    #[test]
    fn test_month_thirteen_is_corrupt() {
        let model = Model { month: 13, ..row() };
        assert!(matches!(
            model.into_domain().unwrap_err(),
            CorruptRow::Invalid {
                source: ValidationError::InvalidPeriod(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_direction_is_corrupt() {
        let model = Model {
            direction: "sideways".to_string(),
            ..row()
        };
        assert!(model.into_domain().is_err());
    }
}
