//! Dining table queries

use chrono::{DateTime, Utc};
use shared::models::{ActiveStatus, DiningTable, TableFields, TableSort};
use sqlx::PgPool;
use uuid::Uuid;

use super::BoxError;
use crate::qr::store::TableTokenState;

const TABLE_COLUMNS: &str = "id, table_number, capacity, location, description, status, \
     qr_token, qr_token_created_at, created_at, updated_at";

// ── Admin CRUD ──

pub async fn list(
    pool: &PgPool,
    status: Option<&str>,
    location: Option<&str>,
    sort: TableSort,
    ascending: bool,
) -> Result<Vec<DiningTable>, BoxError> {
    let sql = format!(
        r#"
        SELECT {TABLE_COLUMNS}
        FROM tables
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR location = $2)
        ORDER BY {} {}
        "#,
        sort.column(),
        super::direction(ascending),
    );
    let rows: Vec<DiningTable> = sqlx::query_as(&sql)
        .bind(status)
        .bind(location)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<DiningTable>, BoxError> {
    let sql = format!("SELECT {TABLE_COLUMNS} FROM tables WHERE id = $1");
    let row: Option<DiningTable> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Whether `table_number` is used by a table other than `exclude`
pub async fn number_taken(
    pool: &PgPool,
    table_number: &str,
    exclude: Option<Uuid>,
) -> Result<bool, BoxError> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM tables WHERE table_number = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(table_number)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

/// New tables start without a QR token
pub async fn create(pool: &PgPool, data: &TableFields) -> Result<DiningTable, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO tables (table_number, capacity, location, description, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {TABLE_COLUMNS}
        "#
    );
    let row: DiningTable = sqlx::query_as(&sql)
        .bind(&data.table_number)
        .bind(data.capacity)
        .bind(&data.location)
        .bind(&data.description)
        .bind(data.status.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &TableFields,
) -> Result<Option<DiningTable>, BoxError> {
    let sql = format!(
        r#"
        UPDATE tables SET
            table_number = $1, capacity = $2, location = $3,
            description = $4, status = $5, updated_at = NOW()
        WHERE id = $6
        RETURNING {TABLE_COLUMNS}
        "#
    );
    let row: Option<DiningTable> = sqlx::query_as(&sql)
        .bind(&data.table_number)
        .bind(data.capacity)
        .bind(&data.location)
        .bind(&data.description)
        .bind(data.status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ActiveStatus,
) -> Result<Option<DiningTable>, BoxError> {
    let sql = format!(
        "UPDATE tables SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {TABLE_COLUMNS}"
    );
    let row: Option<DiningTable> = sqlx::query_as(&sql)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let rows = sqlx::query("DELETE FROM tables WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── QR token state ──

pub async fn find_token_state(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<TableTokenState>, BoxError> {
    let row: Option<TableTokenState> =
        sqlx::query_as("SELECT id, table_number, status, qr_token FROM tables WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Single-statement overwrite: the previous token stops matching immediately
pub async fn save_qr_token(
    pool: &PgPool,
    id: Uuid,
    token: &str,
    issued_at: DateTime<Utc>,
) -> Result<bool, BoxError> {
    let rows = sqlx::query(
        r#"
        UPDATE tables
        SET qr_token = $1, qr_token_created_at = $2, updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(token)
    .bind(issued_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn active_ids(pool: &PgPool) -> Result<Vec<Uuid>, BoxError> {
    let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tables WHERE status = 'active'")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}
