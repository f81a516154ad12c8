//! Menu item photo queries

use shared::models::ItemPhoto;
use sqlx::PgPool;
use uuid::Uuid;

use super::BoxError;

/// Insert all URLs for one item in a single transaction
pub async fn insert_many(
    pool: &PgPool,
    item_id: Uuid,
    urls: &[String],
) -> Result<Vec<ItemPhoto>, BoxError> {
    let mut tx = pool.begin().await?;
    let mut photos = Vec::with_capacity(urls.len());
    for url in urls {
        let photo: ItemPhoto = sqlx::query_as(
            r#"
            INSERT INTO menu_item_photos (menu_item_id, photo_url)
            VALUES ($1, $2)
            RETURNING id, menu_item_id, photo_url, is_primary, created_at
            "#,
        )
        .bind(item_id)
        .bind(url)
        .fetch_one(&mut *tx)
        .await?;
        photos.push(photo);
    }
    tx.commit().await?;
    Ok(photos)
}

pub async fn find_for_item(
    pool: &PgPool,
    item_id: Uuid,
    photo_id: Uuid,
) -> Result<Option<ItemPhoto>, BoxError> {
    let row: Option<ItemPhoto> = sqlx::query_as(
        r#"
        SELECT id, menu_item_id, photo_url, is_primary, created_at
        FROM menu_item_photos
        WHERE id = $1 AND menu_item_id = $2
        "#,
    )
    .bind(photo_id)
    .bind(item_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, photo_id: Uuid) -> Result<bool, BoxError> {
    let rows = sqlx::query("DELETE FROM menu_item_photos WHERE id = $1")
        .bind(photo_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Make `photo_id` the only primary photo of `item_id`
///
/// Clear and set run in one transaction, so readers never observe an item
/// with zero primary photos. Returns `false` (nothing changed) when the
/// photo does not belong to the item.
pub async fn set_primary(pool: &PgPool, item_id: Uuid, photo_id: Uuid) -> Result<bool, BoxError> {
    let mut tx = pool.begin().await?;

    let locked: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM menu_item_photos WHERE id = $1 AND menu_item_id = $2 FOR UPDATE",
    )
    .bind(photo_id)
    .bind(item_id)
    .fetch_optional(&mut *tx)
    .await?;
    if locked.is_none() {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        "UPDATE menu_item_photos SET is_primary = FALSE WHERE menu_item_id = $1 AND id <> $2",
    )
    .bind(item_id)
    .bind(photo_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE menu_item_photos SET is_primary = TRUE WHERE id = $1")
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_item(pool: &PgPool) -> Uuid {
        sqlx::query_scalar("INSERT INTO menu_items (name, price) VALUES ('Pho', 9.50) RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn primaries(pool: &PgPool, item_id: Uuid) -> Vec<Uuid> {
        sqlx::query_scalar(
            "SELECT id FROM menu_item_photos WHERE menu_item_id = $1 AND is_primary",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn swap_leaves_exactly_one_primary(pool: PgPool) {
        let item = seed_item(&pool).await;
        let urls: Vec<String> = (0..3).map(|i| format!("/uploads/{i}.jpg")).collect();
        let photos = insert_many(&pool, item, &urls).await.unwrap();

        assert!(set_primary(&pool, item, photos[0].id).await.unwrap());
        assert_eq!(primaries(&pool, item).await, vec![photos[0].id]);

        assert!(set_primary(&pool, item, photos[2].id).await.unwrap());
        assert_eq!(primaries(&pool, item).await, vec![photos[2].id]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn photo_of_another_item_changes_nothing(pool: PgPool) {
        let item = seed_item(&pool).await;
        let other = seed_item(&pool).await;
        let mine = insert_many(&pool, item, &["/uploads/a.jpg".to_string()]).await.unwrap();
        let theirs = insert_many(&pool, other, &["/uploads/b.jpg".to_string()]).await.unwrap();
        assert!(set_primary(&pool, item, mine[0].id).await.unwrap());

        assert!(!set_primary(&pool, item, theirs[0].id).await.unwrap());
        assert_eq!(primaries(&pool, item).await, vec![mine[0].id]);
        assert!(primaries(&pool, other).await.is_empty());
    }
}
