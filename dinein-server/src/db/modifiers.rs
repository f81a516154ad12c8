//! Modifier group / option queries

use std::collections::HashMap;

use shared::models::{
    ModifierGroup, ModifierGroupFields, ModifierGroupWithOptions, ModifierOption,
    ModifierOptionFields,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::BoxError;

const GROUP_COLUMNS: &str = "id, name, selection_type, is_required, min_selection, \
     max_selection, created_at, updated_at";
const OPTION_COLUMNS: &str = "id, group_id, name, price_adjustment, status, created_at";

// ── Groups ──

/// All groups, newest first, each with its options
pub async fn list_groups(pool: &PgPool) -> Result<Vec<ModifierGroupWithOptions>, BoxError> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM modifier_groups ORDER BY created_at DESC");
    let groups: Vec<ModifierGroup> = sqlx::query_as(&sql).fetch_all(pool).await?;

    let sql = format!("SELECT {OPTION_COLUMNS} FROM modifier_options ORDER BY created_at ASC");
    let options: Vec<ModifierOption> = sqlx::query_as(&sql).fetch_all(pool).await?;

    let mut by_group: HashMap<Uuid, Vec<ModifierOption>> = HashMap::new();
    for option in options {
        by_group.entry(option.group_id).or_default().push(option);
    }

    Ok(groups
        .into_iter()
        .map(|group| ModifierGroupWithOptions {
            options: by_group.remove(&group.id).unwrap_or_default(),
            group,
        })
        .collect())
}

pub async fn create_group(
    pool: &PgPool,
    data: &ModifierGroupFields,
) -> Result<ModifierGroup, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO modifier_groups (name, selection_type, is_required, min_selection, max_selection)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {GROUP_COLUMNS}
        "#
    );
    let row: ModifierGroup = sqlx::query_as(&sql)
        .bind(&data.name)
        .bind(data.selection_type.as_str())
        .bind(data.is_required)
        .bind(data.min_selection)
        .bind(data.max_selection)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update_group(
    pool: &PgPool,
    id: Uuid,
    data: &ModifierGroupFields,
) -> Result<Option<ModifierGroup>, BoxError> {
    let sql = format!(
        r#"
        UPDATE modifier_groups SET
            name = $1, selection_type = $2, is_required = $3,
            min_selection = $4, max_selection = $5, updated_at = NOW()
        WHERE id = $6
        RETURNING {GROUP_COLUMNS}
        "#
    );
    let row: Option<ModifierGroup> = sqlx::query_as(&sql)
        .bind(&data.name)
        .bind(data.selection_type.as_str())
        .bind(data.is_required)
        .bind(data.min_selection)
        .bind(data.max_selection)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Options and item links cascade
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<Option<ModifierGroup>, BoxError> {
    let sql = format!("DELETE FROM modifier_groups WHERE id = $1 RETURNING {GROUP_COLUMNS}");
    let row: Option<ModifierGroup> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn group_exists(pool: &PgPool, id: Uuid) -> Result<bool, BoxError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM modifier_groups WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

// ── Options ──

pub async fn create_option(
    pool: &PgPool,
    group_id: Uuid,
    data: &ModifierOptionFields,
) -> Result<ModifierOption, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO modifier_options (group_id, name, price_adjustment, status)
        VALUES ($1, $2, $3, $4)
        RETURNING {OPTION_COLUMNS}
        "#
    );
    let row: ModifierOption = sqlx::query_as(&sql)
        .bind(group_id)
        .bind(&data.name)
        .bind(data.price_adjustment)
        .bind(data.status.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn update_option(
    pool: &PgPool,
    id: Uuid,
    data: &ModifierOptionFields,
) -> Result<Option<ModifierOption>, BoxError> {
    let sql = format!(
        r#"
        UPDATE modifier_options SET name = $1, price_adjustment = $2, status = $3
        WHERE id = $4
        RETURNING {OPTION_COLUMNS}
        "#
    );
    let row: Option<ModifierOption> = sqlx::query_as(&sql)
        .bind(&data.name)
        .bind(data.price_adjustment)
        .bind(data.status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn delete_option(pool: &PgPool, id: Uuid) -> Result<Option<ModifierOption>, BoxError> {
    let sql = format!("DELETE FROM modifier_options WHERE id = $1 RETURNING {OPTION_COLUMNS}");
    let row: Option<ModifierOption> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

// ── Item links ──

/// Outcome of replacing an item's modifier groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceLinks {
    Replaced,
    /// At least one group id does not exist; nothing was changed
    UnknownGroup,
}

/// Replace every group link of `item_id` with `group_ids`, in order
///
/// Delete and re-insert run in one transaction; concurrent readers see
/// either the old set or the new one.
pub async fn replace_item_groups(
    pool: &PgPool,
    item_id: Uuid,
    group_ids: &[Uuid],
) -> Result<ReplaceLinks, BoxError> {
    let mut tx = pool.begin().await?;

    if !group_ids.is_empty() {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM modifier_groups WHERE id = ANY($1)")
                .bind(group_ids)
                .fetch_one(&mut *tx)
                .await?;
        if found != group_ids.len() as i64 {
            tx.rollback().await?;
            return Ok(ReplaceLinks::UnknownGroup);
        }
    }

    sqlx::query("DELETE FROM menu_item_modifier_groups WHERE menu_item_id = $1")
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

    for (sort_order, group_id) in group_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO menu_item_modifier_groups (menu_item_id, modifier_group_id, sort_order)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(item_id)
        .bind(group_id)
        .bind(sort_order as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(ReplaceLinks::Replaced)
}

/// Group ids linked to an item, in display order
pub async fn item_group_ids(pool: &PgPool, item_id: Uuid) -> Result<Vec<Uuid>, BoxError> {
    let ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT modifier_group_id FROM menu_item_modifier_groups
        WHERE menu_item_id = $1
        ORDER BY sort_order ASC
        "#,
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_item(pool: &PgPool) -> Uuid {
        sqlx::query_scalar("INSERT INTO menu_items (name, price) VALUES ('Bun', 7.00) RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_group(pool: &PgPool, name: &str) -> Uuid {
        sqlx::query_scalar("INSERT INTO modifier_groups (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn replace_keeps_requested_order(pool: PgPool) {
        let item = seed_item(&pool).await;
        let size = seed_group(&pool, "Size").await;
        let spice = seed_group(&pool, "Spice").await;

        let outcome = replace_item_groups(&pool, item, &[spice, size]).await.unwrap();
        assert_eq!(outcome, ReplaceLinks::Replaced);
        assert_eq!(item_group_ids(&pool, item).await.unwrap(), vec![spice, size]);

        replace_item_groups(&pool, item, &[]).await.unwrap();
        assert!(item_group_ids(&pool, item).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn unknown_group_keeps_previous_links(pool: PgPool) {
        let item = seed_item(&pool).await;
        let size = seed_group(&pool, "Size").await;
        let spice = seed_group(&pool, "Spice").await;
        replace_item_groups(&pool, item, &[size, spice]).await.unwrap();

        let outcome = replace_item_groups(&pool, item, &[spice, Uuid::new_v4()])
            .await
            .unwrap();

        assert_eq!(outcome, ReplaceLinks::UnknownGroup);
        assert_eq!(item_group_ids(&pool, item).await.unwrap(), vec![size, spice]);
    }
}
