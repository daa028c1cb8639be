//! Budget view.

use serde::Serialize;

use crate::fields::{Fields, number_field, object_items, opt_str_field};

const UNCATEGORISED: &str = "Other";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub category: String,
    pub vendor: Option<String>,
    pub cost: f64,
    pub paid: f64,
    pub due_date: Option<String>,
    /// Outstanding amount for this line; overpayment does not offset
    /// other lines.
    pub owed: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub cost: f64,
    pub paid: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    pub total_budget: f64,
    pub items: Vec<BudgetItem>,
    pub total_cost: f64,
    pub total_paid: f64,
    pub still_owed: f64,
    /// Budget left after all committed costs; negative when over budget.
    pub remaining: f64,
    pub categories: Vec<CategoryTotal>,
}

pub fn items(fields: &Fields) -> Vec<BudgetItem> {
    object_items(fields, "items")
        .map(|item| {
            let cost = number_field(item, "cost");
            let paid = number_field(item, "paid");
            BudgetItem {
                category: opt_str_field(item, "category").unwrap_or_else(|| UNCATEGORISED.into()),
                vendor: opt_str_field(item, "vendor"),
                cost,
                paid,
                due_date: opt_str_field(item, "dueDate"),
                owed: (cost - paid).max(0.0),
            }
        })
        .collect()
}

pub fn render(fields: &Fields) -> BudgetView {
    let items = items(fields);
    let total_budget = number_field(fields, "totalBudget");
    let total_cost: f64 = items.iter().map(|i| i.cost).sum();
    let total_paid: f64 = items.iter().map(|i| i.paid).sum();
    let still_owed: f64 = items.iter().map(|i| i.owed).sum();

    let mut categories: Vec<CategoryTotal> = Vec::new();
    for item in &items {
        match categories.iter_mut().find(|c| c.category == item.category) {
            Some(total) => {
                total.cost += item.cost;
                total.paid += item.paid;
            }
            None => categories.push(CategoryTotal {
                category: item.category.clone(),
                cost: item.cost,
                paid: item.paid,
            }),
        }
    }

    BudgetView {
        total_budget,
        total_cost,
        total_paid,
        still_owed,
        remaining: total_budget - total_cost,
        categories,
        items,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::as_fields;

    #[test]
    fn still_owed_sums_outstanding_lines() {
        let fields = as_fields(json!({
            "totalBudget": 5000,
            "items": [
                {"category": "Venue", "cost": 1000, "paid": 500},
                {"category": "Catering", "cost": 2000, "paid": 2000},
            ]
        }));
        let view = render(&fields);
        assert_eq!(view.total_cost, 3000.0);
        assert_eq!(view.total_paid, 2500.0);
        assert_eq!(view.still_owed, 500.0);
        assert_eq!(view.remaining, 2000.0);
    }

    #[test]
    fn overpayment_does_not_reduce_other_lines() {
        let fields = as_fields(json!({
            "items": [
                {"cost": 100, "paid": 300},
                {"cost": 200, "paid": 0},
            ]
        }));
        assert_eq!(render(&fields).still_owed, 200.0);
    }

    #[test]
    fn categories_accumulate_and_default() {
        let fields = as_fields(json!({
            "items": [
                {"category": "Flowers", "cost": "$150", "paid": "50"},
                {"category": "Flowers", "cost": 50},
                {"cost": 10},
            ]
        }));
        let view = render(&fields);
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.categories[0].cost, 200.0);
        assert_eq!(view.categories[0].paid, 50.0);
        assert_eq!(view.categories[1].category, "Other");
    }

    #[test]
    fn empty_fields_render_zeroes() {
        let view = render(&Fields::new());
        assert!(view.items.is_empty());
        assert_eq!(view.still_owed, 0.0);
    }
}
