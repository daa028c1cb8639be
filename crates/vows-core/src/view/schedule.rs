//! Day-of schedule view.

use chrono::NaiveTime;
use serde::Serialize;

use crate::fields::{Fields, object_items, opt_str_field, str_field};

const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p"];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayOfScheduleView {
    pub date: Option<String>,
    pub entries: Vec<ScheduleEntry>,
    pub vendor_options: Vec<String>,
}

/// Parse the clock formats people actually type ("14:30", "2:30 PM").
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim().to_ascii_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&s, fmt).ok())
}

/// Entries sorted by time; unparseable times keep their relative order
/// at the end.
pub fn render(fields: &Fields, vendor_options: Vec<String>) -> DayOfScheduleView {
    let mut entries: Vec<ScheduleEntry> = object_items(fields, "events")
        .map(|item| ScheduleEntry {
            time: str_field(item, "time").trim().to_string(),
            title: str_field(item, "title").trim().to_string(),
            location: opt_str_field(item, "location"),
            vendor: opt_str_field(item, "vendor"),
        })
        .collect();
    entries.sort_by_key(|e| match parse_time(&e.time) {
        Some(t) => (0, Some(t)),
        None => (1, None),
    });

    DayOfScheduleView {
        date: opt_str_field(fields, "date"),
        entries,
        vendor_options,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::as_fields;

    #[test]
    fn parses_common_formats() {
        let two_thirty = NaiveTime::from_hms_opt(14, 30, 0);
        assert_eq!(parse_time("14:30"), two_thirty);
        assert_eq!(parse_time("2:30 pm"), two_thirty);
        assert_eq!(parse_time("2:30PM"), two_thirty);
        assert_eq!(parse_time("sunset"), None);
    }

    #[test]
    fn sorts_by_time_with_unknowns_last() {
        let fields = as_fields(json!({
            "date": "2027-06-12",
            "events": [
                {"time": "5:00 PM", "title": "Reception"},
                {"time": "whenever", "title": "Sparklers"},
                {"time": "15:00", "title": "Ceremony"},
                {"time": "9:00 AM", "title": "Hair & makeup"},
            ]
        }));
        let view = render(&fields, vec![]);
        let titles: Vec<_> = view.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Hair & makeup", "Ceremony", "Reception", "Sparklers"]
        );
        assert_eq!(view.date.as_deref(), Some("2027-06-12"));
    }
}
