//! Staff authentication and request guards

pub mod rate_limit;
pub mod staff_auth;

pub use staff_auth::{CurrentUser, require_admin, require_auth};
