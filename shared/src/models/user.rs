//! Staff User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActiveStatus, text_enum};

text_enum! {
    /// Staff role
    UserRole: "role" {
        Admin => "admin",
        Staff => "staff",
        Waiter => "waiter",
        Kitchen => "kitchen",
    }
}

impl UserRole {
    /// Roles that may be chosen at self-registration
    pub fn is_self_registrable(&self) -> bool {
        !matches!(self, Self::Admin)
    }
}

/// Staff account row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub role: UserRole,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
}

/// User as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cannot_self_register() {
        assert!(!UserRole::Admin.is_self_registrable());
        for role in ["staff", "waiter", "kitchen"] {
            assert!(UserRole::parse(role).unwrap().is_self_registrable());
        }
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::Staff,
            status: ActiveStatus::Active,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
