//! Dining Table Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActiveStatus;
use crate::error::{AppError, ErrorCode};

/// Smallest and largest accepted seat count
pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 20;

/// Dining table entity
///
/// `qr_token` holds the single currently valid QR credential for the table.
/// It is `None` until the first generate call and overwritten on every
/// regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: Uuid,
    pub table_number: String,
    pub capacity: i32,
    pub location: Option<String>,
    pub description: Option<String>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ActiveStatus,
    pub qr_token: Option<String>,
    pub qr_token_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiningTable {
    /// Guest-facing display name
    pub fn display_name(&self) -> String {
        display_name(&self.table_number)
    }
}

/// "Table {number}"
pub fn display_name(table_number: &str) -> String {
    format!("Table {table_number}")
}

/// Create / full-update table payload
///
/// Required fields are optional here so that missing ones produce a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablePayload {
    pub table_number: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: Option<ActiveStatus>,
}

/// Validated table fields ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFields {
    pub table_number: String,
    pub capacity: i32,
    pub location: String,
    pub description: Option<String>,
    pub status: ActiveStatus,
}

impl TablePayload {
    /// Validate required fields and the capacity range
    pub fn validate(self) -> Result<TableFields, AppError> {
        let table_number = crate::util::non_blank(self.table_number);
        let location = crate::util::non_blank(self.location);
        let (Some(table_number), Some(capacity), Some(location)) =
            (table_number, self.capacity, location)
        else {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Missing required fields",
            ));
        };
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Capacity must be 1–20",
            ));
        }
        Ok(TableFields {
            table_number,
            capacity,
            location,
            description: crate::util::non_blank(self.description),
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: String,
}

/// Sortable columns for the table list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSort {
    TableNumber,
    Capacity,
    #[default]
    CreatedAt,
}

impl TableSort {
    /// Unknown values fall back to `created_at`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("table_number") => Self::TableNumber,
            Some("capacity") => Self::Capacity,
            _ => Self::CreatedAt,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::TableNumber => "table_number",
            Self::Capacity => "capacity",
            Self::CreatedAt => "created_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> TablePayload {
        TablePayload {
            table_number: Some("T1".into()),
            capacity: Some(4),
            location: Some("Patio".into()),
            description: None,
            status: None,
        }
    }

    #[test]
    fn valid_payload_defaults_to_active() {
        let fields = payload().validate().unwrap();
        assert_eq!(fields.table_number, "T1");
        assert_eq!(fields.status, ActiveStatus::Active);
    }

    #[test]
    fn missing_fields_rejected() {
        let mut p = payload();
        p.location = Some("   ".into());
        let err = p.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Missing required fields");

        let mut p = payload();
        p.capacity = None;
        assert_eq!(p.validate().unwrap_err().code, ErrorCode::RequiredField);
    }

    #[test]
    fn capacity_bounds() {
        for (capacity, ok) in [(0, false), (1, true), (20, true), (21, false)] {
            let mut p = payload();
            p.capacity = Some(capacity);
            match p.validate() {
                Ok(_) => assert!(ok, "capacity {capacity}"),
                Err(e) => {
                    assert!(!ok, "capacity {capacity}");
                    assert_eq!(e.code, ErrorCode::ValueOutOfRange);
                }
            }
        }
    }

    #[test]
    fn sort_falls_back_to_created_at() {
        assert_eq!(TableSort::parse(Some("capacity")), TableSort::Capacity);
        assert_eq!(TableSort::parse(Some("status; DROP")), TableSort::CreatedAt);
        assert_eq!(TableSort::parse(None).column(), "created_at");
    }
}
