//! Menu Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActiveStatus;
use crate::error::{AppError, ErrorCode};

pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Menu category entity (soft-deleted rows are never returned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ActiveStatus,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ActiveStatus>,
    pub sort_order: Option<i32>,
}

/// Validated category fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: ActiveStatus,
    pub sort_order: i32,
}

impl CategoryPayload {
    pub fn validate(self) -> Result<CategoryFields, AppError> {
        let name = crate::util::non_blank(self.name).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Category name is required")
        })?;
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Category name is too long (max 100 characters)",
            ));
        }
        let sort_order = self.sort_order.unwrap_or(0);
        if sort_order < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Sort order must be >= 0",
            ));
        }
        Ok(CategoryFields {
            name,
            description: self.description,
            image_url: self.image_url,
            status: self.status.unwrap_or_default(),
            sort_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required_and_bounded() {
        let err = CategoryPayload::default().validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Category name is required");

        let long = CategoryPayload {
            name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert_eq!(long.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn negative_sort_order_rejected() {
        let p = CategoryPayload {
            name: Some("Drinks".into()),
            sort_order: Some(-1),
            ..Default::default()
        };
        let err = p.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.message, "Sort order must be >= 0");
    }

    #[test]
    fn defaults_applied() {
        let fields = CategoryPayload {
            name: Some("Drinks".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.sort_order, 0);
        assert_eq!(fields.status, ActiveStatus::Active);
    }
}
