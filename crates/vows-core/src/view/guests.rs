//! Guest list view and guest mutations.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{VowsError, VowsResult};
use crate::fields::{
    Fields, array_field, array_field_mut, bool_field, item_id, opt_str_field, str_field,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party: Option<String>,
    pub rsvp: bool,
    pub meal: Option<String>,
    pub plus_one: bool,
    pub dietary: Option<String>,
}

impl Guest {
    /// Seats this guest occupies, counting a plus-one.
    pub fn seats(&self) -> u32 {
        if self.plus_one { 2 } else { 1 }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuestListView {
    pub guests: Vec<Guest>,
    pub confirmed: u32,
    pub pending: u32,
    /// Confirmed guests plus their plus-ones.
    pub headcount: u32,
    pub meals: BTreeMap<String, u32>,
}

pub fn guests(fields: &Fields) -> Vec<Guest> {
    array_field(fields, "guests")
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.as_object().map(|item| (index, item)))
        .map(|(index, item)| Guest {
            id: item_id(item, index),
            name: str_field(item, "name").trim().to_string(),
            email: opt_str_field(item, "email"),
            phone: opt_str_field(item, "phone"),
            party: opt_str_field(item, "party"),
            rsvp: bool_field(item, "rsvp"),
            meal: opt_str_field(item, "meal"),
            plus_one: bool_field(item, "plusOne"),
            dietary: opt_str_field(item, "dietary"),
        })
        .collect()
}

pub fn render(fields: &Fields) -> GuestListView {
    let guests = guests(fields);
    let mut meals = BTreeMap::new();
    let mut confirmed = 0;
    let mut headcount = 0;

    for guest in guests.iter().filter(|g| g.rsvp) {
        confirmed += 1;
        headcount += guest.seats();
        if let Some(meal) = &guest.meal {
            *meals.entry(meal.clone()).or_insert(0) += 1;
        }
    }

    GuestListView {
        pending: guests.len() as u32 - confirmed,
        confirmed,
        headcount,
        meals,
        guests,
    }
}

fn position(items: &[Value], guest_id: &str) -> Option<usize> {
    items.iter().enumerate().position(|(index, value)| {
        value
            .as_object()
            .is_some_and(|item| item_id(item, index) == guest_id)
    })
}

/// Flip one guest's `rsvp` flag, returning the new value.
pub fn toggle_rsvp(fields: &mut Fields, guest_id: &str) -> VowsResult<bool> {
    let items = array_field_mut(fields, "guests");
    let index = position(items, guest_id).ok_or_else(|| VowsError::not_found("guest", guest_id))?;
    let Some(guest) = items[index].as_object_mut() else {
        return Err(VowsError::not_found("guest", guest_id));
    };

    let next = !bool_field(guest, "rsvp");
    guest.insert("rsvp".into(), Value::Bool(next));
    Ok(next)
}

/// Changes applied to a guest row by an RSVP or the scribe. `None`
/// leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct GuestPatch {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp: Option<bool>,
    pub meal: Option<String>,
    pub plus_one: Option<bool>,
    pub dietary: Option<String>,
    pub message: Option<String>,
}

/// Update the guest matching `patch.name` (case-insensitive) or
/// `patch.email`, or append a new guest. Unknown keys on an existing row
/// are preserved, and so is its id: a row without one keeps its
/// positional `#<index>` id, which seating may already reference.
/// Returns the guest's id.
pub fn upsert_guest(fields: &mut Fields, patch: GuestPatch) -> VowsResult<String> {
    let name = patch.name.trim();
    if name.is_empty() {
        return Err(VowsError::validation("guest name is required"));
    }
    let email = patch.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    let items = array_field_mut(fields, "guests");
    let existing = items.iter().position(|value| {
        value.as_object().is_some_and(|item| {
            str_field(item, "name").trim().eq_ignore_ascii_case(name)
                || email.is_some_and(|e| str_field(item, "email").trim().eq_ignore_ascii_case(e))
        })
    });

    let index = match existing {
        Some(index) => index,
        None => {
            items.push(json!({
                "id": Uuid::new_v4().to_string(),
                "name": name,
                "rsvp": false,
            }));
            items.len() - 1
        }
    };

    let Some(guest) = items[index].as_object_mut() else {
        return Err(VowsError::Internal("guest row is not an object".into()));
    };

    let mut set = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            guest.insert(key.into(), value);
        }
    };
    set("email", email.map(|e| Value::String(e.to_string())));
    set("phone", patch.phone.map(Value::String));
    set("rsvp", patch.rsvp.map(Value::Bool));
    set("meal", patch.meal.map(Value::String));
    set("plusOne", patch.plus_one.map(Value::Bool));
    set("dietary", patch.dietary.map(Value::String));
    set("message", patch.message.map(Value::String));

    Ok(item_id(guest, index))
}
