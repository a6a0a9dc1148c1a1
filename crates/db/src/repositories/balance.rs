//! Opening balances backed by the `opening_balances` table.

use async_trait::async_trait;
use caixa_core::ledger::{BalanceStore, LedgerError};
use caixa_shared::types::{Money, Period, UnitId};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, SqlErr, sea_query::OnConflict};

use super::store_error;
use crate::entities::opening_balances;

/// Opening balance repository.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BalanceStore for BalanceRepository {
    async fn opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
    ) -> Result<Option<Money>, LedgerError> {
        let row = opening_balances::Entity::find_by_id((
            unit_id.into_inner(),
            period.year(),
            i16::from(period.month()),
        ))
        .one(&self.db)
        .await
        .map_err(store_error)?;
        Ok(row.as_ref().map(opening_balances::Model::money))
    }

    async fn set_opening_balance(
        &self,
        unit_id: UnitId,
        period: Period,
        value: Money,
    ) -> Result<(), LedgerError> {
        let model = opening_balances::ActiveModel {
            unit_id: Set(unit_id.into_inner()),
            year: Set(period.year()),
            month: Set(i16::from(period.month())),
            amount: Set(value.amount()),
            updated_at: Set(Utc::now().into()),
        };

        opening_balances::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    opening_balances::Column::UnitId,
                    opening_balances::Column::Year,
                    opening_balances::Column::Month,
                ])
                .update_columns([
                    opening_balances::Column::Amount,
                    opening_balances::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => LedgerError::UnitNotFound(unit_id),
                _ => store_error(err),
            })?;
        Ok(())
    }
}
