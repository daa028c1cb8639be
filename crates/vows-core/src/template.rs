//! Template registry.
//!
//! A template is the static schema of one page type: its title, icon and
//! the fields a generic form would show. Templates are compiled in and
//! never persisted; a page refers to one by `template_id`.

use serde::Serialize;
use serde_json::Value;

use uuid::Uuid;

use crate::fields::Fields;
use crate::models::page::CreatePage;

pub const OVERVIEW: &str = "overview";
pub const BUDGET: &str = "budget";
pub const GUEST_LIST: &str = "guest-list";
pub const SEATING_CHART: &str = "seating-chart";
pub const VENDOR_CONTACTS: &str = "vendor-contacts";
pub const TASK_BOARD: &str = "task-board";
pub const DAY_OF_SCHEDULE: &str = "day-of-schedule";
pub const CEREMONY_SCRIPT: &str = "ceremony-script";
pub const WEDDING_PARTY: &str = "wedding-party";
pub const MUSIC: &str = "music";
pub const REGISTRY: &str = "registry";
pub const HONEYMOON: &str = "honeymoon";
pub const ACCOMMODATIONS: &str = "accommodations";
pub const NOTES: &str = "notes";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Currency,
    Date,
    Time,
    Toggle,
    Select,
    /// Array of row objects, edited by a specialised view.
    List,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub fields: &'static [FieldSchema],
    /// Whether new planners are seeded with a page of this template.
    pub seeded: bool,
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema {
        key,
        label,
        kind,
        options: &[],
    }
}

const fn select(
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSchema {
    FieldSchema {
        key,
        label,
        kind: FieldKind::Select,
        options,
    }
}

static TEMPLATES: &[Template] = &[
    Template {
        id: OVERVIEW,
        title: "Wedding Overview",
        icon: "heart",
        seeded: true,
        fields: &[
            field("partner1", "Partner 1", FieldKind::Text),
            field("partner2", "Partner 2", FieldKind::Text),
            field("weddingDate", "Wedding Date", FieldKind::Date),
            field("venue", "Venue", FieldKind::Text),
            field("guestCountEstimate", "Estimated Guests", FieldKind::Number),
            select(
                "style",
                "Style",
                &["Classic", "Rustic", "Modern", "Boho", "Beach", "Garden"],
            ),
            field("notes", "Notes", FieldKind::Textarea),
        ],
    },
    Template {
        id: BUDGET,
        title: "Budget",
        icon: "wallet",
        seeded: true,
        fields: &[
            field("totalBudget", "Total Budget", FieldKind::Currency),
            field("items", "Budget Items", FieldKind::List),
        ],
    },
    Template {
        id: GUEST_LIST,
        title: "Guest List",
        icon: "users",
        seeded: true,
        fields: &[field("guests", "Guests", FieldKind::List)],
    },
    Template {
        id: SEATING_CHART,
        title: "Seating Chart",
        icon: "armchair",
        seeded: false,
        fields: &[
            field("defaultCapacity", "Seats per Table", FieldKind::Number),
            field("tables", "Tables", FieldKind::List),
        ],
    },
    Template {
        id: VENDOR_CONTACTS,
        title: "Vendor Contacts",
        icon: "phone",
        seeded: true,
        fields: &[field("vendors", "Vendors", FieldKind::List)],
    },
    Template {
        id: TASK_BOARD,
        title: "Task Board",
        icon: "check-square",
        seeded: true,
        fields: &[field("tasks", "Tasks", FieldKind::List)],
    },
    Template {
        id: DAY_OF_SCHEDULE,
        title: "Day-Of Schedule",
        icon: "clock",
        seeded: false,
        fields: &[
            field("date", "Date", FieldKind::Date),
            field("events", "Events", FieldKind::List),
        ],
    },
    Template {
        id: CEREMONY_SCRIPT,
        title: "Ceremony Script",
        icon: "scroll",
        seeded: false,
        fields: &[
            field("officiant", "Officiant", FieldKind::Text),
            field("processional", "Processional", FieldKind::Textarea),
            field("welcome", "Welcome", FieldKind::Textarea),
            field("readings", "Readings", FieldKind::Textarea),
            field("vows", "Vows", FieldKind::Textarea),
            field("ringExchange", "Ring Exchange", FieldKind::Textarea),
            field("pronouncement", "Pronouncement", FieldKind::Textarea),
            field("recessional", "Recessional", FieldKind::Textarea),
        ],
    },
    Template {
        id: WEDDING_PARTY,
        title: "Wedding Party",
        icon: "sparkles",
        seeded: false,
        fields: &[
            field("members", "Members", FieldKind::List),
            field("attireNotes", "Attire Notes", FieldKind::Textarea),
        ],
    },
    Template {
        id: MUSIC,
        title: "Music",
        icon: "music",
        seeded: false,
        fields: &[
            field("processionalSong", "Processional Song", FieldKind::Text),
            field("recessionalSong", "Recessional Song", FieldKind::Text),
            field("firstDance", "First Dance", FieldKind::Text),
            field("mustPlay", "Must Play", FieldKind::Textarea),
            field("doNotPlay", "Do Not Play", FieldKind::Textarea),
        ],
    },
    Template {
        id: REGISTRY,
        title: "Registry",
        icon: "gift",
        seeded: false,
        fields: &[
            field("registries", "Registries", FieldKind::List),
            field("cashFund", "Cash Fund", FieldKind::Toggle),
            field("notes", "Notes", FieldKind::Textarea),
        ],
    },
    Template {
        id: HONEYMOON,
        title: "Honeymoon",
        icon: "plane",
        seeded: false,
        fields: &[
            field("destination", "Destination", FieldKind::Text),
            field("departureDate", "Departure", FieldKind::Date),
            field("returnDate", "Return", FieldKind::Date),
            field("budget", "Budget", FieldKind::Currency),
            field("passportsReady", "Passports Ready", FieldKind::Toggle),
            field("notes", "Notes", FieldKind::Textarea),
        ],
    },
    Template {
        id: ACCOMMODATIONS,
        title: "Accommodations",
        icon: "hotel",
        seeded: false,
        fields: &[
            field("hotel", "Hotel", FieldKind::Text),
            field("blockCode", "Block Code", FieldKind::Text),
            field("cutoffDate", "Booking Cutoff", FieldKind::Date),
            field("shuttle", "Shuttle Provided", FieldKind::Toggle),
        ],
    },
    Template {
        id: NOTES,
        title: "Notes",
        icon: "notebook",
        seeded: false,
        fields: &[field("body", "Notes", FieldKind::Textarea)],
    },
];

/// Every registered template.
pub fn all() -> &'static [Template] {
    TEMPLATES
}

pub fn get(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Templates a new planner starts with, in display order.
pub fn seeded() -> impl Iterator<Item = &'static Template> {
    TEMPLATES.iter().filter(|t| t.seeded)
}

impl Template {
    /// Initial `fields` for a new page of this template.
    pub fn default_fields(&self) -> Fields {
        let mut fields = Fields::new();
        for schema in self.fields {
            let value = match schema.kind {
                FieldKind::List => Value::Array(Vec::new()),
                FieldKind::Toggle => Value::Bool(false),
                FieldKind::Number | FieldKind::Currency => continue,
                _ => Value::String(String::new()),
            };
            fields.insert(schema.key.to_string(), value);
        }
        fields
    }

    /// A new page of this template at position `order`.
    pub fn new_page(&self, planner_id: Uuid, title: Option<String>, order: u32) -> CreatePage {
        CreatePage {
            planner_id,
            template_id: self.id.to_string(),
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| self.title.to_string()),
            fields: self.default_fields(),
            order,
        }
    }
}

/// Pages a freshly provisioned planner starts with.
pub fn seed_pages(planner_id: Uuid) -> Vec<CreatePage> {
    seeded()
        .enumerate()
        .map(|(order, template)| template.new_page(planner_id, None, order as u32))
        .collect()
}
