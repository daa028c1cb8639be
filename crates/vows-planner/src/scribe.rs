//! Scribe: the planner's chat assistant.
//!
//! The service stores the conversation and hands each message to an
//! [`Assistant`]. An assistant may answer with page edits; those are
//! persisted and announced with [`PlannerEventKind::DataChanged`] so
//! every open view refetches.

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use vows_core::error::{VowsError, VowsResult};
use vows_core::events::{PlannerEventBus, PlannerEventKind};
use vows_core::fields::{Fields, array_field_mut, merge_field, str_field};
use vows_core::lookup::find_page;
use vows_core::models::chat::{ChatMessage, ChatRole, CreateChatMessage};
use vows_core::models::page::Page;
use vows_core::repository::{ChatRepository, PageRepository, PlannerRepository};
use vows_core::template::{BUDGET, GUEST_LIST, TASK_BOARD, VENDOR_CONTACTS};
use vows_core::view::guests::{self, GuestPatch};
use vows_core::view::{budget, tasks};

/// Number of earlier messages handed to the assistant.
pub const DEFAULT_HISTORY: u64 = 20;
const MAX_MESSAGE_LEN: usize = 4000;

/// Replacement `fields` for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEdit {
    pub page_id: Uuid,
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: String,
    pub edits: Vec<PageEdit>,
}

impl AssistantReply {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            edits: Vec::new(),
        }
    }

    fn edit(content: impl Into<String>, page: &Page, fields: Fields) -> Self {
        Self {
            content: content.into(),
            edits: vec![PageEdit {
                page_id: page.id,
                fields,
            }],
        }
    }
}

/// Something that can answer a planner conversation.
pub trait Assistant: Send + Sync {
    /// `history` holds earlier messages oldest first, ending with
    /// `message` itself.
    fn respond(
        &self,
        history: &[ChatMessage],
        message: &str,
        pages: &[Page],
    ) -> impl Future<Output = VowsResult<AssistantReply>> + Send;
}

/// Rule-based assistant that understands a handful of short commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandAssistant;

const HELP: &str = "I can help with: \"add guest <name>\", \"add task <title>\", \
\"add vendor <name>\", \"set budget <amount>\" and \"summary\".";

/// Case-insensitive prefix strip that keeps the original casing of the rest.
fn strip_command<'a>(message: &'a str, command: &str) -> Option<&'a str> {
    let head = message.get(..command.len())?;
    if !head.eq_ignore_ascii_case(command) {
        return None;
    }
    let rest = &message[command.len()..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    let amount: f64 = cleaned.parse().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

impl CommandAssistant {
    fn answer(&self, message: &str, pages: &[Page]) -> VowsResult<AssistantReply> {
        let message = message.trim();

        if let Some(name) = strip_command(message, "add guest") {
            return self.add_guest(name, pages);
        }
        if let Some(title) = strip_command(message, "add task") {
            return self.add_task(title, pages);
        }
        if let Some(name) = strip_command(message, "add vendor") {
            return self.add_vendor(name, pages);
        }
        if let Some(amount) = strip_command(message, "set budget") {
            return self.set_budget(amount, pages);
        }
        if strip_command(message, "summary").is_some_and(str::is_empty) {
            return Ok(AssistantReply::text(self.summary(pages)));
        }
        Ok(AssistantReply::text(HELP))
    }

    fn add_guest(&self, name: &str, pages: &[Page]) -> VowsResult<AssistantReply> {
        if name.is_empty() {
            return Ok(AssistantReply::text("Who should I add? Try \"add guest Jane Doe\"."));
        }
        let Some(page) = find_page(pages, GUEST_LIST) else {
            return Ok(AssistantReply::text("Add a guest list page first."));
        };
        let mut fields = page.fields.clone();
        let before = guests::guests(&fields).len();
        upsert(&mut fields, name)?;
        let content = if guests::guests(&fields).len() > before {
            format!("Added {name} to your guest list.")
        } else {
            format!("{name} is already on your guest list.")
        };
        Ok(AssistantReply::edit(content, page, fields))
    }

    fn add_task(&self, title: &str, pages: &[Page]) -> VowsResult<AssistantReply> {
        if title.is_empty() {
            return Ok(AssistantReply::text("What's the task? Try \"add task book florist\"."));
        }
        let Some(page) = find_page(pages, TASK_BOARD) else {
            return Ok(AssistantReply::text("Add a task board page first."));
        };
        let mut fields = page.fields.clone();
        array_field_mut(&mut fields, "tasks").push(json!({
            "id": Uuid::new_v4().to_string(),
            "title": title,
            "status": "todo",
        }));
        Ok(AssistantReply::edit(
            format!("Added \"{title}\" to your to-do column."),
            page,
            fields,
        ))
    }

    fn add_vendor(&self, name: &str, pages: &[Page]) -> VowsResult<AssistantReply> {
        if name.is_empty() {
            return Ok(AssistantReply::text("Which vendor? Try \"add vendor Bloom & Co\"."));
        }
        let Some(page) = find_page(pages, VENDOR_CONTACTS) else {
            return Ok(AssistantReply::text("Add a vendor contacts page first."));
        };
        let mut fields = page.fields.clone();
        let vendors = array_field_mut(&mut fields, "vendors");
        let known = vendors.iter().any(|v| {
            v.as_object()
                .is_some_and(|v| str_field(v, "name").trim().eq_ignore_ascii_case(name))
        });
        if known {
            return Ok(AssistantReply::text(format!("{name} is already in your vendors.")));
        }
        vendors.push(json!({ "name": name }));
        Ok(AssistantReply::edit(
            format!("Added {name} to your vendor contacts."),
            page,
            fields,
        ))
    }

    fn set_budget(&self, amount: &str, pages: &[Page]) -> VowsResult<AssistantReply> {
        let Some(value) = parse_amount(amount) else {
            return Ok(AssistantReply::text(format!(
                "I couldn't read \"{amount}\" as an amount."
            )));
        };
        let Some(page) = find_page(pages, BUDGET) else {
            return Ok(AssistantReply::text("Add a budget page first."));
        };
        let mut fields = page.fields.clone();
        merge_field(&mut fields, "totalBudget", json!(value));
        Ok(AssistantReply::edit(
            format!("Set your total budget to {value:.2}."),
            page,
            fields,
        ))
    }

    fn summary(&self, pages: &[Page]) -> String {
        let mut lines = Vec::new();
        if let Some(page) = find_page(pages, GUEST_LIST) {
            let view = guests::render(&page.fields);
            lines.push(format!(
                "Guests: {} confirmed, {} pending, headcount {}.",
                view.confirmed, view.pending, view.headcount
            ));
        }
        if let Some(page) = find_page(pages, BUDGET) {
            let view = budget::render(&page.fields);
            lines.push(format!(
                "Budget: {:.2} planned of {:.2}, {:.2} still owed.",
                view.total_cost, view.total_budget, view.still_owed
            ));
        }
        if let Some(page) = find_page(pages, TASK_BOARD) {
            let all = tasks::tasks(&page.fields);
            let done = all
                .iter()
                .filter(|t| t.status == tasks::TaskStatus::Done)
                .count();
            lines.push(format!("Tasks: {done} of {} done.", all.len()));
        }
        if lines.is_empty() {
            "Your planner is empty so far.".into()
        } else {
            lines.join("\n")
        }
    }
}

fn upsert(fields: &mut Fields, name: &str) -> VowsResult<String> {
    guests::upsert_guest(
        fields,
        GuestPatch {
            name: name.to_string(),
            ..Default::default()
        },
    )
}

impl Assistant for CommandAssistant {
    async fn respond(
        &self,
        _history: &[ChatMessage],
        message: &str,
        pages: &[Page],
    ) -> VowsResult<AssistantReply> {
        self.answer(message, pages)
    }
}

/// Result of one scribe exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScribeReply {
    pub message: ChatMessage,
    /// True when the assistant edited the planner.
    pub planner_changed: bool,
}

pub struct ScribeService<P, G, C, A>
where
    P: PlannerRepository,
    G: PageRepository,
    C: ChatRepository,
    A: Assistant,
{
    planner_repo: P,
    page_repo: G,
    chat_repo: C,
    assistant: A,
    events: PlannerEventBus,
}

impl<P, G, C, A> ScribeService<P, G, C, A>
where
    P: PlannerRepository,
    G: PageRepository,
    C: ChatRepository,
    A: Assistant,
{
    pub fn new(
        planner_repo: P,
        page_repo: G,
        chat_repo: C,
        assistant: A,
        events: PlannerEventBus,
    ) -> Self {
        Self {
            planner_repo,
            page_repo,
            chat_repo,
            assistant,
            events,
        }
    }

    pub async fn send(&self, tenant_id: Uuid, text: &str) -> VowsResult<ScribeReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VowsError::validation("message is empty"));
        }
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(VowsError::validation(format!(
                "message is longer than {MAX_MESSAGE_LEN} characters"
            )));
        }

        self.chat_repo
            .append(CreateChatMessage {
                tenant_id,
                role: ChatRole::User,
                content: text.to_string(),
            })
            .await?;

        let planner = self.planner_repo.get_by_tenant(tenant_id).await?;
        let pages = self.page_repo.list_by_planner(planner.id).await?;
        let history = self.chat_repo.recent(tenant_id, DEFAULT_HISTORY).await?;

        let reply = self.assistant.respond(&history, text, &pages).await?;

        let mut changed = 0usize;
        for edit in reply.edits {
            if !pages.iter().any(|p| p.id == edit.page_id) {
                warn!(%tenant_id, page_id = %edit.page_id, "assistant edited an unknown page");
                continue;
            }
            self.page_repo
                .update_fields(planner.id, edit.page_id, edit.fields)
                .await?;
            changed += 1;
        }

        let message = self
            .chat_repo
            .append(CreateChatMessage {
                tenant_id,
                role: ChatRole::Assistant,
                content: reply.content,
            })
            .await?;

        let planner_changed = changed > 0;
        if planner_changed {
            self.planner_repo.touch(tenant_id, planner.id).await?;
            self.events.publish(tenant_id, PlannerEventKind::DataChanged);
            info!(%tenant_id, pages = changed, "scribe edited planner");
        }

        Ok(ScribeReply {
            message,
            planner_changed,
        })
    }

    pub async fn history(&self, tenant_id: Uuid, limit: u64) -> VowsResult<Vec<ChatMessage>> {
        self.chat_repo.recent(tenant_id, limit.clamp(1, 200)).await
    }
}
