//! Spark domain model: one inspiration image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spark {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// `None` while the spark is unfiled.
    pub palette_id: Option<Uuid>,
    pub image_url: String,
    pub caption: String,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpark {
    pub tenant_id: Uuid,
    pub palette_id: Option<Uuid>,
    pub image_url: String,
    pub caption: Option<String>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSpark {
    pub caption: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some(Some(id))` = file into palette, `Some(None)` = unfile, `None` = no change.
    pub palette_id: Option<Option<Uuid>>,
}
