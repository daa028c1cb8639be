//! Planner domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::page::Page;

/// A tenant's top-level planning document. Owns an ordered sequence
/// of pages; there is exactly one planner per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planner {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanner {
    pub tenant_id: Uuid,
    pub title: String,
}

/// A planner together with its pages sorted by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerWithPages {
    pub planner: Planner,
    pub pages: Vec<Page>,
}
