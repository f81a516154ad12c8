//! Menu Item Photo Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored photo row. At most one photo per item has `is_primary = true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemPhoto {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub photo_url: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Compact photo reference embedded in item listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: Uuid,
    pub url: String,
    pub is_primary: bool,
}

impl From<&ItemPhoto> for PhotoRef {
    fn from(photo: &ItemPhoto) -> Self {
        Self {
            id: photo.id,
            url: photo.photo_url.clone(),
            is_primary: photo.is_primary,
        }
    }
}

/// URL-based photo payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub urls: Option<Vec<String>>,
}
