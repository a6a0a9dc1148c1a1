//! Initial ledger schema.
//!
//! Creates the unit registry, the movements table with its natural-key
//! uniqueness, and the opening balances keyed by unit and period.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(UNITS_SQL).await?;
        db.execute_unprepared(MOVEMENTS_SQL).await?;
        db.execute_unprepared(OPENING_BALANCES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const UNITS_SQL: &str = r"
-- Congregations tracked independently under a field
CREATE TABLE units (
    id UUID PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    field VARCHAR(200) NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_unit_name_not_blank CHECK (btrim(name) <> '')
);

CREATE INDEX idx_units_name ON units(name);
CREATE INDEX idx_units_field ON units(field);
";

const MOVEMENTS_SQL: &str = r"
-- Dated cash movements; amounts are unsigned, direction carries the sign
CREATE TABLE movements (
    id UUID PRIMARY KEY,
    unit_id UUID NOT NULL REFERENCES units(id) ON DELETE RESTRICT,
    sequence BIGSERIAL NOT NULL,
    year INTEGER NOT NULL,
    month SMALLINT NOT NULL,
    day SMALLINT NOT NULL,
    description TEXT NOT NULL,
    direction VARCHAR(10) NOT NULL,
    inflow_category VARCHAR(10),
    amount NUMERIC(14, 2) NOT NULL,
    recorded_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_movement_year CHECK (year BETWEEN 1900 AND 9999),
    CONSTRAINT chk_movement_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_movement_day CHECK (day BETWEEN 1 AND 31),
    CONSTRAINT chk_movement_description CHECK (btrim(description) <> ''),
    CONSTRAINT chk_movement_amount CHECK (amount >= 0),
    CONSTRAINT chk_movement_direction CHECK (direction IN ('inflow', 'outflow')),
    CONSTRAINT chk_movement_category CHECK (
        (direction = 'inflow' AND inflow_category IN ('tithe', 'offering', 'other'))
        OR (direction = 'outflow' AND inflow_category IS NULL)
    )
);

-- Natural key: the same real-world transaction is stored once
CREATE UNIQUE INDEX uq_movements_natural_key
    ON movements(unit_id, year, month, day, description, amount);

-- Store ordering for period listings
CREATE INDEX idx_movements_unit_period
    ON movements(unit_id, year, month, day, sequence);
";

const OPENING_BALANCES_SQL: &str = r"
-- Balance carried into a period; may be negative
CREATE TABLE opening_balances (
    unit_id UUID NOT NULL REFERENCES units(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    month SMALLINT NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    PRIMARY KEY (unit_id, year, month),
    CONSTRAINT chk_opening_year CHECK (year BETWEEN 1900 AND 9999),
    CONSTRAINT chk_opening_month CHECK (month BETWEEN 1 AND 12)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS opening_balances CASCADE;
DROP TABLE IF EXISTS movements CASCADE;
DROP TABLE IF EXISTS units CASCADE;
";
