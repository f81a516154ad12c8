//! Staff account queries

use shared::models::{User, UserRole};
use sqlx::PgPool;

use super::BoxError;

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, BoxError> {
    let row: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, role, status, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// New accounts are always created active
pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, BoxError> {
    let row: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, role, status)
        VALUES ($1, $2, $3, 'active')
        RETURNING id, email, password_hash, role, status, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}
