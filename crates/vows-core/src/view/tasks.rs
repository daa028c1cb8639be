//! Task board view.

use serde::Serialize;
use serde_json::Value;

use crate::fields::{Fields, array_field, item_id, opt_str_field, str_field};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Lenient parse of the status strings the board has used over time.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "done" | "complete" | "completed" => TaskStatus::Done,
            "doing" | "in-progress" | "inprogress" | "in progress" | "started" => {
                TaskStatus::Doing
            }
            _ => TaskStatus::Todo,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<String>,
    pub assignee: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoardView {
    pub todo: Vec<Task>,
    pub doing: Vec<Task>,
    pub done: Vec<Task>,
    /// Whole percent of tasks done.
    pub progress: u32,
    pub vendor_options: Vec<String>,
}

pub fn tasks(fields: &Fields) -> Vec<Task> {
    array_field(fields, "tasks")
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.as_object().map(|item| (index, item)))
        .map(|(index, item)| {
            // Older boards stored a `done` checkbox instead of a status.
            let status = match item.get("done") {
                Some(Value::Bool(true)) => TaskStatus::Done,
                _ => TaskStatus::parse(str_field(item, "status")),
            };
            Task {
                id: item_id(item, index),
                title: str_field(item, "title").trim().to_string(),
                status,
                due_date: opt_str_field(item, "dueDate"),
                assignee: opt_str_field(item, "assignee"),
                vendor: opt_str_field(item, "vendor"),
            }
        })
        .collect()
}

pub fn render(fields: &Fields, vendor_options: Vec<String>) -> TaskBoardView {
    let all = tasks(fields);
    let total = all.len();
    let (mut todo, mut doing, mut done) = (Vec::new(), Vec::new(), Vec::new());
    for task in all {
        match task.status {
            TaskStatus::Todo => todo.push(task),
            TaskStatus::Doing => doing.push(task),
            TaskStatus::Done => done.push(task),
        }
    }
    let progress = if total == 0 {
        0
    } else {
        (done.len() * 100 / total) as u32
    };

    TaskBoardView {
        todo,
        doing,
        done,
        progress,
        vendor_options,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::as_fields;

    #[test]
    fn groups_by_status() {
        let fields = as_fields(json!({
            "tasks": [
                {"id": 1, "title": "Book venue", "status": "done"},
                {"title": "Order cake", "status": "In Progress"},
                {"title": "Send invites"},
                {"title": "Buy rings", "done": true},
            ]
        }));
        let view = render(&fields, vec!["Bloom".into()]);
        assert_eq!(view.done.len(), 2);
        assert_eq!(view.doing.len(), 1);
        assert_eq!(view.todo.len(), 1);
        assert_eq!(view.done[0].id, "1");
        assert_eq!(view.progress, 50);
        assert_eq!(view.vendor_options, vec!["Bloom".to_string()]);
    }

    #[test]
    fn empty_board_has_zero_progress() {
        assert_eq!(render(&Fields::new(), vec![]).progress, 0);
    }
}
