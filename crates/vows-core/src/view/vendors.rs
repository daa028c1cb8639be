//! Vendor contacts view.
//!
//! Vendors come from two places: rows entered on the contacts page
//! itself and vendor names typed into budget items. Budget-only vendors
//! are listed with empty contact details so nothing paid for is missing
//! from the phone list.

use serde::Serialize;

use super::budget;
use crate::fields::{Fields, object_items, opt_str_field};
use crate::lookup::find_fields;
use crate::models::page::Page;
use crate::template::{BUDGET, VENDOR_CONTACTS};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub name: String,
    pub category: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub from_budget: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorContactsView {
    pub vendors: Vec<Vendor>,
}

pub fn render(fields: &Fields, budget_fields: &Fields) -> VendorContactsView {
    let mut vendors: Vec<Vendor> = object_items(fields, "vendors")
        .filter_map(|item| {
            Some(Vendor {
                name: opt_str_field(item, "name")?,
                category: opt_str_field(item, "category"),
                contact: opt_str_field(item, "contact"),
                email: opt_str_field(item, "email"),
                phone: opt_str_field(item, "phone"),
                from_budget: false,
            })
        })
        .collect();

    for item in budget::items(budget_fields) {
        let Some(name) = item.vendor else { continue };
        if vendors.iter().any(|v| v.name.eq_ignore_ascii_case(&name)) {
            continue;
        }
        vendors.push(Vendor {
            name,
            category: Some(item.category),
            contact: None,
            email: None,
            phone: None,
            from_budget: true,
        });
    }

    VendorContactsView { vendors }
}

/// Vendor names known anywhere in the planner, deduplicated
/// case-insensitively, contacts first.
pub fn vendor_options(pages: &[Page]) -> Vec<String> {
    render(
        find_fields(pages, VENDOR_CONTACTS),
        find_fields(pages, BUDGET),
    )
    .vendors
    .into_iter()
    .map(|v| v.name)
    .collect()
}
