//! SurrealDB implementation of [`RsvpRepository`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::rsvp::{CreateRsvpForm, RsvpForm, UpdateRsvpForm};
use vows_core::repository::RsvpRepository;

use super::{first, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RsvpRow {
    tenant_id: String,
    page_id: String,
    slug: String,
    fields: serde_json::Value,
    meal_options: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RsvpRowWithId {
    record_id: String,
    tenant_id: String,
    page_id: String,
    slug: String,
    fields: serde_json::Value,
    meal_options: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn toggles_to_value(toggles: BTreeMap<String, bool>) -> serde_json::Value {
    serde_json::Value::Object(
        toggles
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::Bool(v)))
            .collect(),
    )
}

fn value_to_toggles(value: serde_json::Value) -> BTreeMap<String, bool> {
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

impl RsvpRow {
    fn into_form(self, id: Uuid) -> Result<RsvpForm, DbError> {
        Ok(RsvpForm {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            page_id: parse_uuid(&self.page_id, "page")?,
            slug: self.slug,
            fields: value_to_toggles(self.fields),
            meal_options: self.meal_options,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RsvpRowWithId {
    fn try_into_form(self) -> Result<RsvpForm, DbError> {
        let id = parse_uuid(&self.record_id, "rsvp_form")?;
        RsvpRow {
            tenant_id: self.tenant_id,
            page_id: self.page_id,
            slug: self.slug,
            fields: self.fields,
            meal_options: self.meal_options,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_form(id)
    }
}

/// SurrealDB implementation of the RSVP form repository.
#[derive(Clone)]
pub struct SurrealRsvpRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRsvpRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RsvpRepository for SurrealRsvpRepository<C> {
    async fn create(&self, input: CreateRsvpForm) -> VowsResult<RsvpForm> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('rsvp_form', $id) SET \
                 tenant_id = $tenant_id, page_id = $page_id, \
                 slug = $slug, fields = $fields, \
                 meal_options = $meal_options",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("page_id", input.page_id.to_string()))
            .bind(("slug", input.slug))
            .bind(("fields", toggles_to_value(input.fields)))
            .bind(("meal_options", input.meal_options))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::query("rsvp_form", e))?;

        let rows: Vec<RsvpRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "rsvp_form", id)?.into_form(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<RsvpForm> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('rsvp_form', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RsvpRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "rsvp_form", id)?.into_form(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> VowsResult<RsvpForm> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rsvp_form \
                 WHERE slug = $slug",
            )
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RsvpRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "rsvp_form", format!("slug={slug}"))?.try_into_form()?)
    }

    async fn get_by_page(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<Option<RsvpForm>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rsvp_form \
                 WHERE tenant_id = $tenant_id AND page_id = $page_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("page_id", page_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RsvpRowWithId> = result.take(0).map_err(DbError::from)?;
        let form = rows
            .into_iter()
            .next()
            .map(RsvpRowWithId::try_into_form)
            .transpose()?;
        Ok(form)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateRsvpForm,
    ) -> VowsResult<RsvpForm> {
        let mut sets = Vec::new();
        if input.fields.is_some() {
            sets.push("fields = $fields");
        }
        if input.meal_options.is_some() {
            sets.push("meal_options = $meal_options");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('rsvp_form', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(fields) = input.fields {
            builder = builder.bind(("fields", toggles_to_value(fields)));
        }
        if let Some(meal_options) = input.meal_options {
            builder = builder.bind(("meal_options", meal_options));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::query("rsvp_form", e))?;

        let rows: Vec<RsvpRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "rsvp_form", id)?.into_form(id)?)
    }

    async fn delete_by_page(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "DELETE rsvp_form \
                 WHERE tenant_id = $tenant_id AND page_id = $page_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("page_id", page_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("rsvp_form", e))?;

        Ok(())
    }
}
