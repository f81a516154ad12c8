//! Modifier Group / Option Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActiveStatus, text_enum};
use crate::error::{AppError, ErrorCode};

text_enum! {
    /// How many options a guest may pick from a group
    SelectionType: "selection type" {
        Single => "single",
        Multiple => "multiple",
    }
}

/// Modifier group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModifierGroup {
    pub id: Uuid,
    pub name: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub selection_type: SelectionType,
    pub is_required: bool,
    pub min_selection: i32,
    pub max_selection: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Modifier option entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModifierOption {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub price_adjustment: Decimal,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
}

/// Group with its options, as returned by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroupWithOptions {
    #[serde(flatten)]
    pub group: ModifierGroup,
    pub options: Vec<ModifierOption>,
}

/// Create / update group payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierGroupPayload {
    pub name: Option<String>,
    pub selection_type: Option<SelectionType>,
    #[serde(alias = "required")]
    pub is_required: Option<bool>,
    pub min_selection: Option<i32>,
    pub max_selection: Option<i32>,
}

/// Validated group fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierGroupFields {
    pub name: String,
    pub selection_type: SelectionType,
    pub is_required: bool,
    pub min_selection: i32,
    pub max_selection: i32,
}

impl ModifierGroupPayload {
    /// Single-choice groups are normalized to `0..=1` (`1..=1` when required).
    pub fn validate(self) -> Result<ModifierGroupFields, AppError> {
        let name = crate::util::non_blank(self.name).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Group name is required")
        })?;
        let selection_type = self.selection_type.unwrap_or(SelectionType::Single);
        let is_required = self.is_required.unwrap_or(false);

        let (min_selection, max_selection) = match selection_type {
            SelectionType::Single => (i32::from(is_required), 1),
            SelectionType::Multiple => {
                let min = self.min_selection.unwrap_or(0);
                let max = self.max_selection.unwrap_or(min.max(1));
                if min < 0 || max < 1 {
                    return Err(AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        "Selection limits must be non-negative",
                    ));
                }
                if min > max {
                    return Err(AppError::new(ErrorCode::InvalidSelectionRange));
                }
                (min, max)
            }
        };

        Ok(ModifierGroupFields {
            name,
            selection_type,
            is_required,
            min_selection,
            max_selection,
        })
    }
}

/// Create / update option payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierOptionPayload {
    pub name: Option<String>,
    pub price_adjustment: Option<Decimal>,
    pub status: Option<ActiveStatus>,
}

/// Validated option fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierOptionFields {
    pub name: String,
    pub price_adjustment: Decimal,
    pub status: ActiveStatus,
}

impl ModifierOptionPayload {
    pub fn validate(self) -> Result<ModifierOptionFields, AppError> {
        let name = crate::util::non_blank(self.name).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Option name is required")
        })?;
        let price_adjustment = self.price_adjustment.unwrap_or(Decimal::ZERO);
        if price_adjustment < Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Price adjustment must be >= 0",
            ));
        }
        Ok(ModifierOptionFields {
            name,
            price_adjustment,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// `POST /items/{id}/modifier-groups` body. Order defines `sort_order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachGroups {
    pub group_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(kind: SelectionType) -> ModifierGroupPayload {
        ModifierGroupPayload {
            name: Some("Size".into()),
            selection_type: Some(kind),
            ..Default::default()
        }
    }

    #[test]
    fn single_choice_is_normalized() {
        let mut p = group(SelectionType::Single);
        p.is_required = Some(true);
        p.min_selection = Some(3);
        p.max_selection = Some(7);
        let fields = p.validate().unwrap();
        assert_eq!((fields.min_selection, fields.max_selection), (1, 1));
    }

    #[test]
    fn multiple_choice_requires_min_le_max() {
        let mut p = group(SelectionType::Multiple);
        p.min_selection = Some(3);
        p.max_selection = Some(2);
        let err = p.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSelectionRange);
        assert_eq!(
            err.message,
            "Min selection cannot be greater than Max selection"
        );

        let mut p = group(SelectionType::Multiple);
        p.min_selection = Some(1);
        p.max_selection = Some(3);
        let fields = p.validate().unwrap();
        assert_eq!((fields.min_selection, fields.max_selection), (1, 3));
    }

    #[test]
    fn negative_price_adjustment_rejected() {
        let p = ModifierOptionPayload {
            name: Some("Extra shot".into()),
            price_adjustment: Some(Decimal::new(-50, 2)),
            status: None,
        };
        assert_eq!(p.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn attach_groups_reads_camel_case() {
        let id = Uuid::new_v4();
        let body: AttachGroups =
            serde_json::from_value(serde_json::json!({ "groupIds": [id] })).unwrap();
        assert_eq!(body.group_ids, vec![id]);
    }
}
