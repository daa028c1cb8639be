//! Page domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Fields;

/// One section of a planner (budget, guest list, ...).
///
/// `fields` is free-form per template; views read it through the
/// lenient accessors in [`crate::fields`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    pub planner_id: Uuid,
    pub template_id: String,
    pub title: String,
    pub fields: Fields,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePage {
    pub planner_id: Uuid,
    pub template_id: String,
    pub title: String,
    pub fields: Fields,
    pub order: u32,
}
