//! Field-map helpers.
//!
//! A page's `fields` is an untyped JSON object whose shape is only as
//! strong as the reader's casts. Everything here is lenient: a missing
//! key, a `null` or a value of the wrong type reads as the empty/zero
//! value instead of failing.

use serde_json::{Map, Value};

/// Free-form per-template field data.
pub type Fields = Map<String, Value>;

/// Merge one key into a page's field map, inserting or overwriting it.
///
/// This is the server-side half of the field-update protocol: renderers
/// send `(key, value)` and the stored object is updated in place while
/// every other key is left untouched.
pub fn merge_field(fields: &mut Fields, key: &str, value: Value) {
    fields.insert(key.to_string(), value);
}

/// Coerce a JSON object value into a field map. Anything that is not an
/// object yields an empty map.
pub fn as_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

pub fn str_field<'a>(fields: &'a Fields, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Like [`str_field`] but trims and maps blank strings to `None`.
pub fn opt_str_field(fields: &Fields, key: &str) -> Option<String> {
    let s = str_field(fields, key).trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub fn bool_field(fields: &Fields, key: &str) -> bool {
    fields.get(key).map(value_as_bool).unwrap_or(false)
}

pub fn number_field(fields: &Fields, key: &str) -> f64 {
    fields.get(key).map(value_as_number).unwrap_or(0.0)
}

/// The array stored under `key`, or an empty slice.
pub fn array_field<'a>(fields: &'a Fields, key: &str) -> &'a [Value] {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Mutable access to the array under `key`, replacing a missing or
/// mistyped value with an empty array first.
pub fn array_field_mut<'a>(fields: &'a mut Fields, key: &str) -> &'a mut Vec<Value> {
    let slot = fields.entry(key).or_insert(Value::Null);
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just made an array"),
    }
}

/// Identifier of a row object: its `id` (string or number), falling back
/// to the row's position for rows created before ids were assigned.
pub fn item_id(item: &Fields, index: usize) -> String {
    match item.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("#{index}"),
    }
}

/// Iterate the object entries of an array field, skipping non-objects.
pub fn object_items<'a>(fields: &'a Fields, key: &str) -> impl Iterator<Item = &'a Fields> {
    array_field(fields, key).iter().filter_map(Value::as_object)
}

/// Numbers arrive both as JSON numbers and as user-typed strings such
/// as `"$1,200.50"`.
pub fn value_as_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

pub fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
