//! `SeaORM` Entity for units table.

use caixa_core::ledger::Unit;
use caixa_shared::types::UnitId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub field: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
    #[sea_orm(has_many = "super::opening_balances::Entity")]
    OpeningBalances,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl Related<super::opening_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into the domain unit.
    #[must_use]
    pub fn into_domain(self) -> Unit {
        Unit {
            id: UnitId::from_uuid(self.id),
            name: self.name,
            field: self.field,
            created_at: self.created_at.to_utc(),
        }
    }
}
