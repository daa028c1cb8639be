//! Schema-driven view for templates without a specialised renderer.

use serde::Serialize;
use serde_json::Value;

use crate::fields::Fields;
use crate::template::{self, FieldKind};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenericField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub options: Vec<String>,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenericView {
    pub template_id: String,
    pub fields: Vec<GenericField>,
}

/// One entry per schema field, in schema order. Unknown templates have
/// an empty schema.
pub fn render(template_id: &str, fields: &Fields) -> GenericView {
    let schema = template::get(template_id).map(|t| t.fields).unwrap_or(&[]);
    GenericView {
        template_id: template_id.to_string(),
        fields: schema
            .iter()
            .map(|f| GenericField {
                key: f.key.to_string(),
                label: f.label.to_string(),
                kind: f.kind,
                options: f.options.iter().map(|o| o.to_string()).collect(),
                value: fields.get(f.key).cloned().unwrap_or(Value::Null),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::as_fields;

    #[test]
    fn lists_schema_fields_with_values() {
        let fields = as_fields(json!({"destination": "Lisbon", "extra": 1}));
        let view = render(template::HONEYMOON, &fields);
        assert_eq!(view.fields[0].key, "destination");
        assert_eq!(view.fields[0].value, json!("Lisbon"));
        assert_eq!(view.fields[1].value, Value::Null);
        assert!(view.fields.iter().all(|f| f.key != "extra"));
    }

    #[test]
    fn unknown_template_has_no_fields() {
        assert!(render("mystery", &Fields::new()).fields.is_empty());
    }
}
