//! Unit registry backed by the `units` table.

use async_trait::async_trait;
use caixa_core::ledger::{LedgerError, NewUnit, Unit, UnitStore};
use caixa_shared::types::UnitId;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::store_error;
use crate::entities::{movements, units};

/// Unit repository.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    db: DatabaseConnection,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn movement_count(&self, id: UnitId) -> Result<u64, LedgerError> {
        movements::Entity::find()
            .filter(movements::Column::UnitId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl UnitStore for UnitRepository {
    async fn register_unit(&self, unit: NewUnit) -> Result<Unit, LedgerError> {
        let model = units::ActiveModel {
            id: Set(UnitId::new().into_inner()),
            name: Set(unit.name().to_string()),
            field: Set(unit.field().to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        tracing::info!(unit = %model.id, name = %model.name, field = %model.field, "unit registered");
        Ok(model.into_domain())
    }

    async fn find_unit(&self, id: UnitId) -> Result<Option<Unit>, LedgerError> {
        let row = units::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(row.map(units::Model::into_domain))
    }

    async fn list_units(&self) -> Result<Vec<Unit>, LedgerError> {
        let rows = units::Entity::find()
            .order_by_asc(units::Column::Name)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(units::Model::into_domain).collect())
    }

    async fn remove_unit(&self, id: UnitId) -> Result<(), LedgerError> {
        let movements = self.movement_count(id).await?;
        if movements > 0 {
            return Err(LedgerError::UnitInUse {
                unit_id: id,
                movements,
            });
        }

        let result = match units::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
        {
            Ok(result) => result,
            // A movement was added between the count and the delete.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                return Err(LedgerError::UnitInUse {
                    unit_id: id,
                    movements: self.movement_count(id).await?,
                });
            }
            Err(err) => return Err(store_error(err)),
        };

        if result.rows_affected == 0 {
            return Err(LedgerError::UnitNotFound(id));
        }
        tracing::info!(unit = %id, "unit removed");
        Ok(())
    }
}
