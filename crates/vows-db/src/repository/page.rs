//! SurrealDB implementation of [`PageRepository`].
//!
//! The page's `order` is stored in a `position` column.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::fields::{Fields, as_fields};
use vows_core::models::page::{CreatePage, Page};
use vows_core::repository::PageRepository;

use super::{first, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PageRow {
    planner_id: String,
    template_id: String,
    title: String,
    fields: serde_json::Value,
    position: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PageRowWithId {
    record_id: String,
    planner_id: String,
    template_id: String,
    title: String,
    fields: serde_json::Value,
    position: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PageRow {
    fn into_page(self, id: Uuid) -> Result<Page, DbError> {
        Ok(Page {
            id,
            planner_id: parse_uuid(&self.planner_id, "planner")?,
            template_id: self.template_id,
            title: self.title,
            fields: as_fields(self.fields),
            order: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PageRowWithId {
    fn try_into_page(self) -> Result<Page, DbError> {
        let id = parse_uuid(&self.record_id, "page")?;
        PageRow {
            planner_id: self.planner_id,
            template_id: self.template_id,
            title: self.title,
            fields: self.fields,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_page(id)
    }
}

/// SurrealDB implementation of the Page repository.
#[derive(Clone)]
pub struct SurrealPageRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPageRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PageRepository for SurrealPageRepository<C> {
    async fn create(&self, input: CreatePage) -> VowsResult<Page> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('page', $id) SET \
                 planner_id = $planner_id, template_id = $template_id, \
                 title = $title, fields = $fields, position = $position",
            )
            .bind(("id", id.to_string()))
            .bind(("planner_id", input.planner_id.to_string()))
            .bind(("template_id", input.template_id))
            .bind(("title", input.title))
            .bind(("fields", serde_json::Value::Object(input.fields)))
            .bind(("position", input.order))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("page", e))?;

        let rows: Vec<PageRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "page", id)?.into_page(id)?)
    }

    async fn get_by_id(&self, planner_id: Uuid, id: Uuid) -> VowsResult<Page> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('page', $id) \
                 WHERE planner_id = $planner_id",
            )
            .bind(("id", id.to_string()))
            .bind(("planner_id", planner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PageRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "page", id)?.into_page(id)?)
    }

    async fn list_by_planner(&self, planner_id: Uuid) -> VowsResult<Vec<Page>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM page \
                 WHERE planner_id = $planner_id \
                 ORDER BY position ASC",
            )
            .bind(("planner_id", planner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PageRowWithId> = result.take(0).map_err(DbError::from)?;
        let pages = rows
            .into_iter()
            .map(|row| row.try_into_page())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(pages)
    }

    async fn update_fields(&self, planner_id: Uuid, id: Uuid, fields: Fields) -> VowsResult<Page> {
        let result = self
            .db
            .query(
                "UPDATE type::record('page', $id) SET \
                 fields = $fields, updated_at = time::now() \
                 WHERE planner_id = $planner_id",
            )
            .bind(("id", id.to_string()))
            .bind(("planner_id", planner_id.to_string()))
            .bind(("fields", serde_json::Value::Object(fields)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("page", e))?;

        let rows: Vec<PageRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "page", id)?.into_page(id)?)
    }

    async fn rename(&self, planner_id: Uuid, id: Uuid, title: String) -> VowsResult<Page> {
        let result = self
            .db
            .query(
                "UPDATE type::record('page', $id) SET \
                 title = $title, updated_at = time::now() \
                 WHERE planner_id = $planner_id",
            )
            .bind(("id", id.to_string()))
            .bind(("planner_id", planner_id.to_string()))
            .bind(("title", title))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("page", e))?;

        let rows: Vec<PageRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "page", id)?.into_page(id)?)
    }

    async fn set_order(&self, planner_id: Uuid, ordered_ids: &[Uuid]) -> VowsResult<()> {
        if ordered_ids.is_empty() {
            return Ok(());
        }

        // One statement per page inside a single transaction so that a
        // reorder is never half-applied.
        let mut query = String::from("BEGIN TRANSACTION;");
        for index in 0..ordered_ids.len() {
            query.push_str(&format!(
                " UPDATE type::record('page', $id{index}) SET position = {index} \
                 WHERE planner_id = $planner_id;"
            ));
        }
        query.push_str(" COMMIT TRANSACTION;");

        let mut builder = self
            .db
            .query(query)
            .bind(("planner_id", planner_id.to_string()));
        for (index, id) in ordered_ids.iter().enumerate() {
            builder = builder.bind((format!("id{index}"), id.to_string()));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("page", e))?;

        Ok(())
    }

    async fn delete(&self, planner_id: Uuid, id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "DELETE type::record('page', $id) \
                 WHERE planner_id = $planner_id",
            )
            .bind(("id", id.to_string()))
            .bind(("planner_id", planner_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("page", e))?;

        Ok(())
    }
}
