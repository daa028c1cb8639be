//! SurrealDB implementation of [`PlannerRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::planner::{CreatePlanner, Planner};
use vows_core::repository::PlannerRepository;

use super::{first, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PlannerRow {
    tenant_id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PlannerRowWithId {
    record_id: String,
    tenant_id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlannerRow {
    fn into_planner(self, id: Uuid) -> Result<Planner, DbError> {
        Ok(Planner {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            title: self.title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PlannerRowWithId {
    fn try_into_planner(self) -> Result<Planner, DbError> {
        Ok(Planner {
            id: parse_uuid(&self.record_id, "planner")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            title: self.title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Planner repository.
#[derive(Clone)]
pub struct SurrealPlannerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPlannerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PlannerRepository for SurrealPlannerRepository<C> {
    async fn create(&self, input: CreatePlanner) -> VowsResult<Planner> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('planner', $id) SET \
                 tenant_id = $tenant_id, title = $title",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("title", input.title))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("planner", e))?;

        let rows: Vec<PlannerRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "planner", id)?.into_planner(id)?)
    }

    async fn get_by_tenant(&self, tenant_id: Uuid) -> VowsResult<Planner> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM planner \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PlannerRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "planner", format!("tenant={tenant_id}"))?.try_into_planner()?)
    }

    async fn touch(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "UPDATE type::record('planner', $id) SET updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("planner", e))?;

        Ok(())
    }
}
