//! SurrealDB implementation of [`ChatRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::chat::{ChatMessage, ChatRole, CreateChatMessage};
use vows_core::repository::ChatRepository;

use super::{first, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ChatRow {
    tenant_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ChatRowWithId {
    record_id: String,
    tenant_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<ChatRole, DbError> {
    ChatRole::parse(s).ok_or_else(|| DbError::Decode(format!("unknown chat role: {s}")))
}

impl ChatRow {
    fn into_message(self, id: Uuid) -> Result<ChatMessage, DbError> {
        Ok(ChatMessage {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            role: parse_role(&self.role)?,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

impl ChatRowWithId {
    fn try_into_message(self) -> Result<ChatMessage, DbError> {
        Ok(ChatMessage {
            id: parse_uuid(&self.record_id, "chat_message")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            role: parse_role(&self.role)?,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Scribe chat history.
#[derive(Clone)]
pub struct SurrealChatRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealChatRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChatRepository for SurrealChatRepository<C> {
    async fn append(&self, input: CreateChatMessage) -> VowsResult<ChatMessage> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('chat_message', $id) SET \
                 tenant_id = $tenant_id, role = $role, content = $content",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("content", input.content))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::query("chat_message", e))?;

        let rows: Vec<ChatRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "chat_message", id)?.into_message(id)?)
    }

    async fn recent(&self, tenant_id: Uuid, limit: u64) -> VowsResult<Vec<ChatMessage>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM chat_message \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ChatRowWithId> = result.take(0).map_err(DbError::from)?;
        let mut messages = rows
            .into_iter()
            .map(|row| row.try_into_message())
            .collect::<Result<Vec<_>, DbError>>()?;
        messages.reverse();
        Ok(messages)
    }
}
