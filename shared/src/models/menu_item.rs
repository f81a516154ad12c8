//! Menu Item Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PhotoRef, text_enum};
use crate::error::{AppError, ErrorCode};

pub const MAX_PREP_TIME_MINUTES: i32 = 240;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

text_enum! {
    /// Availability of a menu item
    ItemStatus: "item status" {
        Available => "available",
        Unavailable => "unavailable",
        SoldOut => "sold_out",
        Hidden => "hidden",
    }
}

/// Menu item entity with its category name (joined)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ItemStatus,
    pub is_chef_recommended: bool,
    pub prep_time_minutes: i32,
    pub order_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

/// Create / update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemPayload {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<ItemStatus>,
    pub prep_time_minutes: Option<i32>,
    pub is_chef_recommended: Option<bool>,
}

/// Validated fields for a new item
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub status: ItemStatus,
    pub prep_time_minutes: i32,
    pub is_chef_recommended: bool,
}

impl MenuItemPayload {
    fn check_common(&self) -> Result<String, AppError> {
        let name = crate::util::non_blank(self.name.clone()).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Item name is required")
        })?;
        if let Some(price) = self.price
            && price <= Decimal::ZERO
        {
            return Err(AppError::new(ErrorCode::MenuItemInvalidPrice));
        }
        if let Some(prep) = self.prep_time_minutes
            && !(0..=MAX_PREP_TIME_MINUTES).contains(&prep)
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Prep time must be 0-240 minutes",
            ));
        }
        Ok(name)
    }

    /// Validate for creation: name, category and price are mandatory
    pub fn validate_new(self) -> Result<NewMenuItem, AppError> {
        let name = self.check_common()?;
        let category_id = self.category_id.ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Category ID is required")
        })?;
        let price = self
            .price
            .ok_or_else(|| AppError::new(ErrorCode::MenuItemInvalidPrice))?;
        Ok(NewMenuItem {
            category_id,
            name,
            description: self.description,
            price,
            status: self.status.unwrap_or(ItemStatus::Available),
            prep_time_minutes: self.prep_time_minutes.unwrap_or(0),
            is_chef_recommended: self.is_chef_recommended.unwrap_or(false),
        })
    }

    /// Validate a partial update: only the name is mandatory
    pub fn validate_update(mut self) -> Result<Self, AppError> {
        self.name = Some(self.check_common()?);
        Ok(self)
    }
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusUpdate {
    pub status: String,
}

/// Sortable columns for the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSort {
    Price,
    Name,
    #[default]
    CreatedAt,
    Popularity,
}

impl ItemSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price") => Self::Price,
            Some("name") => Self::Name,
            Some("popularity") => Self::Popularity,
            _ => Self::CreatedAt,
        }
    }

    /// SQL expression used in ORDER BY
    pub const fn expression(&self) -> &'static str {
        match self {
            Self::Price => "i.price",
            Self::Name => "i.name",
            Self::CreatedAt => "i.created_at",
            Self::Popularity => "COALESCE(i.order_count, 0)",
        }
    }
}

/// Query string for `GET /items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListQuery {
    #[serde(rename = "categoryId", alias = "category_id")]
    pub category_id: Option<Uuid>,
    #[serde(alias = "search")]
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ItemListQuery {
    /// (page, limit) with page >= 1 and 1 <= limit <= MAX_PAGE_SIZE
    pub fn page_window(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    pub fn ascending(&self) -> bool {
        self.order.as_deref() == Some("asc")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPage {
    pub data: Vec<MenuItem>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> MenuItemPayload {
        MenuItemPayload {
            category_id: Some(Uuid::new_v4()),
            name: Some("Pho".into()),
            price: Some(Decimal::new(1250, 2)),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_category_and_positive_price() {
        let mut p = payload();
        p.category_id = None;
        let err = p.validate_new().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Category ID is required");

        let mut p = payload();
        p.price = Some(Decimal::ZERO);
        let err = p.validate_new().unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemInvalidPrice);
        assert_eq!(err.message, "Price must be greater than 0");

        let mut p = payload();
        p.price = None;
        assert_eq!(
            p.validate_new().unwrap_err().code,
            ErrorCode::MenuItemInvalidPrice
        );
    }

    #[test]
    fn prep_time_range() {
        let mut p = payload();
        p.prep_time_minutes = Some(241);
        assert_eq!(p.validate_new().unwrap_err().code, ErrorCode::ValueOutOfRange);

        let mut p = payload();
        p.prep_time_minutes = Some(240);
        assert_eq!(p.validate_new().unwrap().prep_time_minutes, 240);
    }

    #[test]
    fn update_only_needs_name() {
        let p = MenuItemPayload {
            name: Some(" Bun Cha ".into()),
            ..Default::default()
        };
        assert_eq!(p.validate_update().unwrap().name.as_deref(), Some("Bun Cha"));
    }

    #[test]
    fn page_window_is_clamped() {
        let q = ItemListQuery {
            page: Some(0),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(q.page_window(), (1, MAX_PAGE_SIZE));
        assert_eq!(ItemListQuery::default().page_window(), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(ItemStatus::parse("sold_out"), Some(ItemStatus::SoldOut));
        assert_eq!(ItemStatus::SoldOut.as_str(), "sold_out");
        let json = serde_json::to_string(&ItemStatus::SoldOut).unwrap();
        assert_eq!(json, "\"sold_out\"");
    }

    #[test]
    fn popularity_sort_uses_order_count() {
        assert_eq!(
            ItemSort::parse(Some("popularity")).expression(),
            "COALESCE(i.order_count, 0)"
        );
        assert_eq!(ItemSort::parse(Some("bogus")), ItemSort::CreatedAt);
    }
}
