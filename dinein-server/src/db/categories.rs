//! Menu category queries (soft delete via `deleted_at`)

use shared::models::{ActiveStatus, CategoryFields, MenuCategory};
use sqlx::PgPool;
use uuid::Uuid;

use super::BoxError;

const CATEGORY_COLUMNS: &str =
    "id, name, description, image_url, status, sort_order, created_at, updated_at";

pub async fn list(pool: &PgPool) -> Result<Vec<MenuCategory>, BoxError> {
    let sql = format!(
        r#"
        SELECT {CATEGORY_COLUMNS}
        FROM menu_categories
        WHERE deleted_at IS NULL
        ORDER BY sort_order ASC, created_at DESC
        "#
    );
    let rows: Vec<MenuCategory> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM menu_categories WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Whether a live category other than `exclude` already uses `name`
pub async fn name_taken(
    pool: &PgPool,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, BoxError> {
    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM menu_categories
            WHERE name = $1 AND deleted_at IS NULL AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(name)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, data: &CategoryFields) -> Result<MenuCategory, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO menu_categories (name, description, image_url, status, sort_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CATEGORY_COLUMNS}
        "#
    );
    let row: MenuCategory = sqlx::query_as(&sql)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.status.as_str())
        .bind(data.sort_order)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &CategoryFields,
) -> Result<Option<MenuCategory>, BoxError> {
    let sql = format!(
        r#"
        UPDATE menu_categories SET
            name = $1, description = $2, image_url = $3,
            status = $4, sort_order = $5, updated_at = NOW()
        WHERE id = $6 AND deleted_at IS NULL
        RETURNING {CATEGORY_COLUMNS}
        "#
    );
    let row: Option<MenuCategory> = sqlx::query_as(&sql)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.status.as_str())
        .bind(data.sort_order)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ActiveStatus,
) -> Result<Option<MenuCategory>, BoxError> {
    let sql = format!(
        r#"
        UPDATE menu_categories SET status = $1, updated_at = NOW()
        WHERE id = $2 AND deleted_at IS NULL
        RETURNING {CATEGORY_COLUMNS}
        "#
    );
    let row: Option<MenuCategory> = sqlx::query_as(&sql)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let rows = sqlx::query(
        "UPDATE menu_categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
