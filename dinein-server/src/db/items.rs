//! Menu item queries (soft delete via `deleted_at`)

use std::collections::HashMap;

use shared::models::{ItemSort, ItemStatus, MenuItem, MenuItemPayload, NewMenuItem, PhotoRef};
use sqlx::PgPool;
use uuid::Uuid;

use super::BoxError;

const ITEM_SELECT: &str = r#"
    SELECT i.id, i.category_id, c.name AS category_name, i.name, i.description, i.price,
           i.status, i.is_chef_recommended, i.prep_time_minutes, i.order_count,
           i.created_at, i.updated_at
    FROM menu_items i
    LEFT JOIN menu_categories c ON c.id = i.category_id
"#;

const ITEM_FILTER: &str = r#"
    WHERE i.deleted_at IS NULL
      AND ($1::uuid IS NULL OR i.category_id = $1)
      AND ($2::text IS NULL OR i.name ILIKE '%' || $2 || '%')
      AND ($3::text IS NULL OR i.status = $3)
"#;

/// List filters
#[derive(Debug, Clone, Default)]
pub struct ItemFilter<'a> {
    pub category_id: Option<Uuid>,
    pub search: Option<&'a str>,
    pub status: Option<&'a str>,
}

/// One page of items plus the filtered total
pub async fn list(
    pool: &PgPool,
    filter: &ItemFilter<'_>,
    sort: ItemSort,
    ascending: bool,
    limit: i64,
    offset: i64,
) -> Result<(Vec<MenuItem>, i64), BoxError> {
    let sql = format!(
        "{ITEM_SELECT} {ITEM_FILTER} ORDER BY {} {}, i.id LIMIT $4 OFFSET $5",
        sort.expression(),
        super::direction(ascending),
    );
    let mut rows: Vec<MenuItem> = sqlx::query_as(&sql)
        .bind(filter.category_id)
        .bind(filter.search)
        .bind(filter.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM menu_items i {ITEM_FILTER}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(filter.category_id)
        .bind(filter.search)
        .bind(filter.status)
        .fetch_one(pool)
        .await?;

    attach_photos(pool, &mut rows).await?;
    Ok((rows, total))
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<MenuItem>, BoxError> {
    let sql = format!("{ITEM_SELECT} WHERE i.id = $1 AND i.deleted_at IS NULL");
    let row: Option<MenuItem> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(item) = row else {
        return Ok(None);
    };
    let mut items = vec![item];
    attach_photos(pool, &mut items).await?;
    Ok(items.pop())
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM menu_items WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create(pool: &PgPool, data: &NewMenuItem) -> Result<MenuItem, BoxError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO menu_items (
            category_id, name, description, price, status, prep_time_minutes, is_chef_recommended
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.status.as_str())
    .bind(data.prep_time_minutes)
    .bind(data.is_chef_recommended)
    .fetch_one(pool)
    .await?;

    find(pool, id)
        .await?
        .ok_or_else(|| "Menu item vanished after insert".into())
}

/// Partial update: absent fields keep their stored value
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &MenuItemPayload,
) -> Result<Option<MenuItem>, BoxError> {
    let updated: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE menu_items SET
            category_id = COALESCE($1, category_id),
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            status = COALESCE($5, status),
            prep_time_minutes = COALESCE($6, prep_time_minutes),
            is_chef_recommended = COALESCE($7, is_chef_recommended),
            updated_at = NOW()
        WHERE id = $8 AND deleted_at IS NULL
        RETURNING id
        "#,
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.status.map(|s| s.as_str()))
    .bind(data.prep_time_minutes)
    .bind(data.is_chef_recommended)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(id) => find(pool, id).await,
        None => Ok(None),
    }
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ItemStatus,
) -> Result<Option<MenuItem>, BoxError> {
    let updated: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE menu_items SET status = $1, updated_at = NOW()
        WHERE id = $2 AND deleted_at IS NULL
        RETURNING id
        "#,
    )
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(id) => find(pool, id).await,
        None => Ok(None),
    }
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let rows = sqlx::query(
        "UPDATE menu_items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Fill `photos` for every item with one query; primary photo first
async fn attach_photos(pool: &PgPool, items: &mut [MenuItem]) -> Result<(), BoxError> {
    if items.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let rows: Vec<(Uuid, Uuid, String, bool)> = sqlx::query_as(
        r#"
        SELECT menu_item_id, id, photo_url, is_primary
        FROM menu_item_photos
        WHERE menu_item_id = ANY($1)
        ORDER BY is_primary DESC, created_at ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_item: HashMap<Uuid, Vec<PhotoRef>> = HashMap::new();
    for (item_id, id, url, is_primary) in rows {
        by_item.entry(item_id).or_default().push(PhotoRef {
            id,
            url,
            is_primary,
        });
    }
    for item in items.iter_mut() {
        item.photos = by_item.remove(&item.id).unwrap_or_default();
    }
    Ok(())
}
