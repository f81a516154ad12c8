//! Database access layer

pub mod categories;
pub mod items;
pub mod modifiers;
pub mod photos;
pub mod tables;
pub mod users;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `ASC` / `DESC` for a whitelisted ORDER BY
pub(crate) const fn direction(ascending: bool) -> &'static str {
    if ascending { "ASC" } else { "DESC" }
}

/// True when `err` is a PostgreSQL unique-constraint violation
pub fn is_unique_violation(err: &BoxError) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
