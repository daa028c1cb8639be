//! RSVP form domain model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question toggles a couple can enable on their public RSVP form.
pub const RSVP_QUESTIONS: &[&str] = &["email", "phone", "meal", "plusOne", "dietary", "message"];

/// Public RSVP form bound one-to-one to a guest-list page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpForm {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub page_id: Uuid,
    /// URL-safe random identifier used in the public link.
    pub slug: String,
    /// Which optional questions are asked.
    pub fields: BTreeMap<String, bool>,
    pub meal_options: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RsvpForm {
    pub fn asks(&self, question: &str) -> bool {
        self.fields.get(question).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRsvpForm {
    pub tenant_id: Uuid,
    pub page_id: Uuid,
    pub slug: String,
    pub fields: BTreeMap<String, bool>,
    pub meal_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRsvpForm {
    pub fields: Option<BTreeMap<String, bool>>,
    pub meal_options: Option<Vec<String>>,
}

/// A guest's answer submitted through the public form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RsvpResponse {
    pub name: String,
    pub attending: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub meal: Option<String>,
    pub plus_one: bool,
    pub dietary: Option<String>,
    pub message: Option<String>,
}

/// Unauthenticated description of a form, as shown to guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRsvpForm {
    pub slug: String,
    pub couple: Option<String>,
    pub wedding_date: Option<String>,
    pub questions: Vec<String>,
    pub meal_options: Vec<String>,
}
