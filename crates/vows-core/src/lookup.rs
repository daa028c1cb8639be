//! Cross-page lookups.
//!
//! Some views join data from sibling pages (vendor names from the
//! budget, guests for the seating chart). Planners hold tens of pages,
//! so a linear scan by `template_id` is all that is needed. A missing
//! sibling behaves like one with empty fields.

use std::sync::LazyLock;

use crate::fields::Fields;
use crate::models::page::Page;

static EMPTY: LazyLock<Fields> = LazyLock::new(Fields::new);

/// First page of the given template, in planner order.
pub fn find_page<'a>(pages: &'a [Page], template_id: &str) -> Option<&'a Page> {
    pages.iter().find(|p| p.template_id == template_id)
}

/// Fields of the first page of the given template, or an empty map.
pub fn find_fields<'a>(pages: &'a [Page], template_id: &str) -> &'a Fields {
    find_page(pages, template_id)
        .map(|p| &p.fields)
        .unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::fields::as_fields;

    fn page(template_id: &str, order: u32, fields: serde_json::Value) -> Page {
        Page {
            id: Uuid::new_v4(),
            planner_id: Uuid::nil(),
            template_id: template_id.into(),
            title: template_id.into(),
            fields: as_fields(fields),
            order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn finds_first_matching_page() {
        let pages = vec![
            page("notes", 0, json!({})),
            page("budget", 1, json!({"totalBudget": 1})),
            page("budget", 2, json!({"totalBudget": 2})),
        ];
        let found = find_page(&pages, "budget").unwrap();
        assert_eq!(found.order, 1);
        assert_eq!(find_fields(&pages, "budget").get("totalBudget"), Some(&json!(1)));
    }

    #[test]
    fn missing_sibling_yields_empty_fields() {
        let pages = vec![page("notes", 0, json!({"body": "x"}))];
        assert!(find_page(&pages, "budget").is_none());
        assert!(find_fields(&pages, "budget").is_empty());
    }
}
