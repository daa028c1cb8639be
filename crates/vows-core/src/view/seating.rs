//! Seating chart view and seat assignment.
//!
//! Tables live on the seating-chart page as
//! `{ id, name, capacity, guestIds }`; the guests themselves come from
//! the guest-list page. A plus-one takes a second seat at the same table.

use serde::Serialize;
use serde_json::Value;

use super::guests::{self, Guest};
use crate::error::{VowsError, VowsResult};
use crate::fields::{Fields, array_field, array_field_mut, item_id, number_field, str_field};

pub const DEFAULT_CAPACITY: u32 = 8;
/// Upper bound on a single table's capacity.
pub const MAX_CAPACITY: u32 = 1_000;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatedGuest {
    pub id: String,
    pub name: String,
    pub seats: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub guests: Vec<SeatedGuest>,
    pub open_seats: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatingView {
    pub tables: Vec<TableView>,
    pub unassigned: Vec<SeatedGuest>,
    pub total_seats: u32,
    pub seated: u32,
}

struct Table {
    id: String,
    name: String,
    capacity: u32,
    guest_ids: Vec<String>,
}

fn parse_capacity(n: f64) -> Option<u32> {
    (n >= 1.0).then(|| n.min(f64::from(MAX_CAPACITY)) as u32)
}

fn default_capacity(fields: &Fields) -> u32 {
    parse_capacity(number_field(fields, "defaultCapacity")).unwrap_or(DEFAULT_CAPACITY)
}

fn total(seats: impl Iterator<Item = u32>) -> u32 {
    seats.fold(0, u32::saturating_add)
}

fn tables(fields: &Fields) -> Vec<Table> {
    let fallback = default_capacity(fields);
    array_field(fields, "tables")
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.as_object().map(|item| (index, item)))
        .map(|(index, item)| {
            let id = item_id(item, index);
            let name = match str_field(item, "name").trim() {
                "" => format!("Table {}", index + 1),
                name => name.to_string(),
            };
            let capacity = parse_capacity(number_field(item, "capacity")).unwrap_or(fallback);
            let guest_ids = array_field(item, "guestIds")
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            Table {
                id,
                name,
                capacity,
                guest_ids,
            }
        })
        .collect()
}

fn seated(guest: &Guest) -> SeatedGuest {
    SeatedGuest {
        id: guest.id.clone(),
        name: guest.name.clone(),
        seats: guest.seats(),
    }
}

/// Join the chart's tables with the guest list. Ids on a table that no
/// longer match a guest are ignored.
pub fn render(fields: &Fields, guest_list: &Fields) -> SeatingView {
    let all_guests = guests::guests(guest_list);
    let tables = tables(fields);

    let mut view_tables = Vec::with_capacity(tables.len());
    for table in &tables {
        let guests: Vec<SeatedGuest> = table
            .guest_ids
            .iter()
            .filter_map(|id| all_guests.iter().find(|g| &g.id == id))
            .map(seated)
            .collect();
        let used = total(guests.iter().map(|g| g.seats));
        view_tables.push(TableView {
            id: table.id.clone(),
            name: table.name.clone(),
            capacity: table.capacity,
            open_seats: table.capacity.saturating_sub(used),
            guests,
        });
    }

    let unassigned = all_guests
        .iter()
        .filter(|g| !view_tables.iter().any(|t| t.guests.iter().any(|s| s.id == g.id)))
        .map(seated)
        .collect();

    SeatingView {
        total_seats: total(view_tables.iter().map(|t| t.capacity)),
        seated: total(
            view_tables
                .iter()
                .flat_map(|t| t.guests.iter())
                .map(|g| g.seats),
        ),
        tables: view_tables,
        unassigned,
    }
}

/// Remove `guest_id` from every table. Returns whether it was seated.
pub fn unassign_guest(fields: &mut Fields, guest_id: &str) -> bool {
    let mut removed = false;
    for table in array_field_mut(fields, "tables") {
        let Some(table) = table.as_object_mut() else {
            continue;
        };
        let ids = array_field_mut(table, "guestIds");
        let before = ids.len();
        ids.retain(|id| id.as_str() != Some(guest_id));
        removed |= ids.len() != before;
    }
    removed
}

/// Seat a guest at a table, moving them from any other table.
///
/// Rejects unknown tables, guests missing from the guest list, and
/// tables without enough open seats (a plus-one needs two).
pub fn assign_guest(
    fields: &mut Fields,
    guest_list: &Fields,
    table_id: &str,
    guest_id: &str,
) -> VowsResult<()> {
    let guest = guests::guests(guest_list)
        .into_iter()
        .find(|g| g.id == guest_id)
        .ok_or_else(|| VowsError::not_found("guest", guest_id))?;

    let current = render(fields, guest_list);
    let table = current
        .tables
        .iter()
        .find(|t| t.id == table_id)
        .ok_or_else(|| VowsError::not_found("table", table_id))?;

    if table.guests.iter().any(|g| g.id == guest_id) {
        return Ok(());
    }
    if table.open_seats < guest.seats() {
        return Err(VowsError::validation(format!(
            "{} is full ({} of {} seats taken)",
            table.name,
            table.capacity - table.open_seats,
            table.capacity
        )));
    }

    unassign_guest(fields, guest_id);

    for (index, value) in array_field_mut(fields, "tables").iter_mut().enumerate() {
        let Some(table) = value.as_object_mut() else {
            continue;
        };
        if item_id(table, index) == table_id {
            array_field_mut(table, "guestIds").push(Value::String(guest_id.to_string()));
            return Ok(());
        }
    }
    Err(VowsError::not_found("table", table_id))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::as_fields;

    fn guest_list() -> Fields {
        as_fields(json!({
            "guests": [
                {"id": "a", "name": "Ana", "plusOne": true},
                {"id": "b", "name": "Ben"},
                {"id": "c", "name": "Cy"},
            ]
        }))
    }

    fn chart() -> Fields {
        as_fields(json!({
            "tables": [
                {"id": "t1", "name": "Head", "capacity": 2, "guestIds": ["b"]},
                {"id": "t2", "capacity": 4, "guestIds": ["ghost"]},
            ]
        }))
    }

    #[test]
    fn render_joins_guests_and_drops_unknown_ids() {
        let view = render(&chart(), &guest_list());
        assert_eq!(view.tables[0].guests.len(), 1);
        assert_eq!(view.tables[0].open_seats, 1);
        assert!(view.tables[1].guests.is_empty());
        assert_eq!(view.tables[1].name, "Table 2");
        assert_eq!(view.unassigned.len(), 2);
        assert_eq!(view.total_seats, 6);
        assert_eq!(view.seated, 1);
    }

    #[test]
    fn assign_rejects_full_table() {
        let mut fields = chart();
        // Ana brings a plus-one; only one seat is open at the head table.
        let err = assign_guest(&mut fields, &guest_list(), "t1", "a").unwrap_err();
        assert!(matches!(err, VowsError::Validation { .. }));
        assert_eq!(fields, chart());
    }

    #[test]
    fn assign_moves_guest_between_tables() {
        let mut fields = chart();
        assign_guest(&mut fields, &guest_list(), "t2", "b").unwrap();

        let view = render(&fields, &guest_list());
        assert!(view.tables[0].guests.is_empty());
        assert_eq!(view.tables[1].guests[0].id, "b");
    }

    #[test]
    fn assign_unknown_table_or_guest_fails() {
        let mut fields = chart();
        assert!(assign_guest(&mut fields, &guest_list(), "t9", "c").is_err());
        assert!(assign_guest(&mut fields, &guest_list(), "t1", "zed").is_err());
    }

    #[test]
    fn unassign_reports_removal() {
        let mut fields = chart();
        assert!(unassign_guest(&mut fields, "b"));
        assert!(!unassign_guest(&mut fields, "b"));
    }

    #[test]
    fn default_capacity_applies() {
        let fields = as_fields(json!({"defaultCapacity": 10, "tables": [{"id": "t"}]}));
        assert_eq!(render(&fields, &Fields::new()).tables[0].capacity, 10);
        let fields = as_fields(json!({"tables": [{"id": "t"}]}));
        assert_eq!(render(&fields, &Fields::new()).tables[0].capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn huge_capacities_are_clamped() {
        let fields = as_fields(json!({
            "tables": [
                {"id": "a", "capacity": 4_000_000_000u64},
                {"id": "b", "capacity": 4_000_000_000u64},
            ]
        }));
        let view = render(&fields, &Fields::new());
        assert_eq!(view.tables[0].capacity, MAX_CAPACITY);
        assert_eq!(view.total_seats, 2 * MAX_CAPACITY);

        let mut fields = fields;
        assign_guest(&mut fields, &guest_list(), "a", "a").unwrap();
        assert_eq!(render(&fields, &guest_list()).seated, 2);
    }

    #[test]
    fn rsvp_keeps_positional_guest_seated() {
        let mut guest_list = as_fields(json!({"guests": [{"name": "Dee"}]}));
        let mut chart = as_fields(json!({"tables": [{"id": "t1", "capacity": 4}]}));
        assign_guest(&mut chart, &guest_list, "t1", "#0").unwrap();

        let id = guests::upsert_guest(
            &mut guest_list,
            guests::GuestPatch {
                name: "dee".into(),
                rsvp: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(id, "#0");
        let view = render(&chart, &guest_list);
        assert_eq!(view.tables[0].guests.len(), 1);
        assert!(view.unassigned.is_empty());
    }
}
