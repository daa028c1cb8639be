//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::tenant::{CreateTenant, Tenant};
use vows_core::repository::TenantRepository;

use super::first;
use crate::error::DbError;

/// Removes a tenant and every record scoped to it. Pages hang off the
/// planner rather than the tenant.
const DELETE_TENANT: &str = "\
BEGIN TRANSACTION;
LET $planners = (SELECT VALUE meta::id(id) FROM planner WHERE tenant_id = $id);
DELETE page WHERE planner_id IN $planners;
DELETE planner WHERE tenant_id = $id;
DELETE rsvp_form WHERE tenant_id = $id;
DELETE chat_message WHERE tenant_id = $id;
DELETE spark WHERE tenant_id = $id;
DELETE palette WHERE tenant_id = $id;
DELETE user WHERE tenant_id = $id;
DELETE type::record('tenant', $id);
COMMIT TRANSACTION;
";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Tenant {
        Tenant {
            id,
            name: self.name,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> VowsResult<Tenant> {
        let id = Uuid::new_v4();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, metadata = $metadata",
            )
            .bind(("id", id.to_string()))
            .bind(("name", input.name))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("tenant", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "tenant", id)?.into_tenant(id))
    }

    async fn get_by_id(&self, id: Uuid) -> VowsResult<Tenant> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "tenant", id)?.into_tenant(id))
    }

    async fn delete(&self, id: Uuid) -> VowsResult<()> {
        self.db
            .query(DELETE_TENANT)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("tenant", e))?;

        Ok(())
    }
}
