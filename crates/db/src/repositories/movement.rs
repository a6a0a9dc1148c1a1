//! Movement store backed by the `movements` table.

use async_trait::async_trait;
use caixa_core::ledger::{
    LedgerError, MovementFilter, MovementStore, NewMovement, StoredMovement,
};
use caixa_shared::types::{MovementId, Period, UnitId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, SqlErr, TransactionTrait,
};

use super::store_error;
use crate::entities::{movements, units};

/// Movement repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filtered(unit_id: UnitId, filter: MovementFilter) -> Select<movements::Entity> {
    let mut query =
        movements::Entity::find().filter(movements::Column::UnitId.eq(unit_id.into_inner()));
    if let Some(month) = filter.month {
        query = query.filter(movements::Column::Month.eq(i16::from(month)));
    }
    if let Some(year) = filter.year {
        query = query.filter(movements::Column::Year.eq(year));
    }
    query
}

fn active_model(movement: &NewMovement) -> movements::ActiveModel {
    let flow = movement.flow();
    let period = movement.period();
    movements::ActiveModel {
        id: Set(MovementId::new().into_inner()),
        unit_id: Set(movement.unit_id().into_inner()),
        year: Set(period.year()),
        month: Set(i16::from(period.month())),
        day: Set(i16::from(movement.day())),
        description: Set(movement.description().to_string()),
        direction: Set(flow.direction().as_str().to_string()),
        inflow_category: Set(flow.category().map(|c| c.as_str().to_string())),
        amount: Set(flow.amount().amount()),
        recorded_by: Set(movement.recorded_by().into_inner()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
}

/// Inserts one movement on `conn`, translating constraint violations.
async fn insert<C: ConnectionTrait>(
    conn: &C,
    movement: NewMovement,
) -> Result<StoredMovement, LedgerError> {
    match active_model(&movement).insert(conn).await {
        Ok(row) => Ok(movement.into_stored(
            MovementId::from_uuid(row.id),
            row.sequence,
            row.created_at.to_utc(),
        )),
        Err(err) => Err(match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => movement.natural_key().into(),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                LedgerError::UnitNotFound(movement.unit_id())
            }
            _ => store_error(err),
        }),
    }
}

#[async_trait]
impl MovementStore for MovementRepository {
    async fn add(&self, movement: NewMovement) -> Result<StoredMovement, LedgerError> {
        insert(&self.db, movement).await
    }

    async fn list(
        &self,
        unit_id: UnitId,
        filter: MovementFilter,
    ) -> Result<Vec<StoredMovement>, LedgerError> {
        let rows = filtered(unit_id, filter)
            .order_by_asc(movements::Column::Year)
            .order_by_asc(movements::Column::Month)
            .order_by_asc(movements::Column::Day)
            .order_by_asc(movements::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(LedgerError::from))
            .collect()
    }

    async fn remove(&self, id: MovementId) -> Result<(), LedgerError> {
        let result = movements::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::MovementNotFound(id));
        }
        Ok(())
    }

    async fn replace_period(
        &self,
        unit_id: UnitId,
        period: Period,
        replacements: Vec<NewMovement>,
    ) -> Result<(u64, Vec<StoredMovement>), LedgerError> {
        for movement in &replacements {
            movement.ensure_in(unit_id, period)?;
        }

        // Dropping `txn` on an early return rolls everything back.
        let txn = self.db.begin().await.map_err(store_error)?;

        units::Entity::find_by_id(unit_id.into_inner())
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or(LedgerError::UnitNotFound(unit_id))?;

        let removed = movements::Entity::delete_many()
            .filter(movements::Column::UnitId.eq(unit_id.into_inner()))
            .filter(movements::Column::Year.eq(period.year()))
            .filter(movements::Column::Month.eq(i16::from(period.month())))
            .exec(&txn)
            .await
            .map_err(store_error)?
            .rows_affected;

        let mut stored = Vec::with_capacity(replacements.len());
        for movement in replacements {
            stored.push(insert(&txn, movement).await?);
        }

        txn.commit().await.map_err(store_error)?;
        Ok((removed, stored))
    }
}
