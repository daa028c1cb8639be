//! Page views.
//!
//! A view is what a renderer shows for one page: the page's `fields`
//! read leniently and, for some templates, joined with sibling pages.
//! [`render`] dispatches on `template_id` and falls back to the generic
//! schema-driven view.

pub mod budget;
pub mod generic;
pub mod guests;
pub mod schedule;
pub mod seating;
pub mod tasks;
pub mod vendors;

use serde::Serialize;

use crate::lookup::find_fields;
use crate::models::page::Page;
use crate::template::{
    BUDGET, DAY_OF_SCHEDULE, GUEST_LIST, SEATING_CHART, TASK_BOARD, VENDOR_CONTACTS,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum PageView {
    Budget(budget::BudgetView),
    GuestList(guests::GuestListView),
    SeatingChart(seating::SeatingView),
    VendorContacts(vendors::VendorContactsView),
    TaskBoard(tasks::TaskBoardView),
    DayOfSchedule(schedule::DayOfScheduleView),
    Generic(generic::GenericView),
}

/// Render `page`, using `all_pages` (which may include `page` itself)
/// for cross-page joins.
pub fn render(page: &Page, all_pages: &[Page]) -> PageView {
    let fields = &page.fields;
    match page.template_id.as_str() {
        BUDGET => PageView::Budget(budget::render(fields)),
        GUEST_LIST => PageView::GuestList(guests::render(fields)),
        SEATING_CHART => {
            PageView::SeatingChart(seating::render(fields, find_fields(all_pages, GUEST_LIST)))
        }
        VENDOR_CONTACTS => {
            PageView::VendorContacts(vendors::render(fields, find_fields(all_pages, BUDGET)))
        }
        TASK_BOARD => PageView::TaskBoard(tasks::render(fields, vendors::vendor_options(all_pages))),
        DAY_OF_SCHEDULE => PageView::DayOfSchedule(schedule::render(
            fields,
            vendors::vendor_options(all_pages),
        )),
        other => PageView::Generic(generic::render(other, fields)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::fields::as_fields;
    use crate::template::{CEREMONY_SCRIPT, OVERVIEW};

    fn page(template_id: &str, fields: serde_json::Value) -> Page {
        Page {
            id: Uuid::new_v4(),
            planner_id: Uuid::nil(),
            template_id: template_id.into(),
            title: template_id.into(),
            fields: as_fields(fields),
            order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn dispatches_specialised_templates() {
        let budget = page(BUDGET, json!({"items": [{"vendor": "DJ Sol", "cost": 10}]}));
        let tasks = page(TASK_BOARD, json!({"tasks": []}));
        let pages = vec![budget.clone(), tasks.clone()];

        assert!(matches!(render(&budget, &pages), PageView::Budget(_)));
        match render(&tasks, &pages) {
            PageView::TaskBoard(view) => assert_eq!(view.vendor_options, vec!["DJ Sol"]),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn seating_chart_reads_guest_list_sibling() {
        let guests = page(GUEST_LIST, json!({"guests": [{"id": "g", "name": "Gil"}]}));
        let chart = page(SEATING_CHART, json!({"tables": []}));
        let pages = vec![guests, chart.clone()];
        match render(&chart, &pages) {
            PageView::SeatingChart(view) => assert_eq!(view.unassigned.len(), 1),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn other_templates_render_generically() {
        let script = page(CEREMONY_SCRIPT, json!({"officiant": "Rev. Lee"}));
        assert!(matches!(render(&script, &[]), PageView::Generic(_)));
        let overview = page(OVERVIEW, json!({}));
        let json = serde_json::to_value(render(&overview, &[])).unwrap();
        assert_eq!(json["view"], "generic");
        assert_eq!(json["templateId"], OVERVIEW);
    }
}
