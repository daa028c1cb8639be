//! SurrealDB implementation of [`PaletteRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::palette::{CreatePalette, Palette, UpdatePalette};
use vows_core::repository::PaletteRepository;

use super::{first, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PaletteRow {
    tenant_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PaletteRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaletteRow {
    fn into_palette(self, id: Uuid) -> Result<Palette, DbError> {
        Ok(Palette {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PaletteRowWithId {
    fn try_into_palette(self) -> Result<Palette, DbError> {
        Ok(Palette {
            id: parse_uuid(&self.record_id, "palette")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Palette repository.
#[derive(Clone)]
pub struct SurrealPaletteRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPaletteRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PaletteRepository for SurrealPaletteRepository<C> {
    async fn create(&self, input: CreatePalette) -> VowsResult<Palette> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('palette', $id) SET \
                 tenant_id = $tenant_id, name = $name, \
                 description = $description",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description.unwrap_or_default()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("palette", e))?;

        let rows: Vec<PaletteRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "palette", id)?.into_palette(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<Palette> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('palette', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PaletteRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "palette", id)?.into_palette(id)?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdatePalette) -> VowsResult<Palette> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('palette', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::query("palette", e))?;

        let rows: Vec<PaletteRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "palette", id)?.into_palette(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "DELETE type::record('palette', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("palette", e))?;

        Ok(())
    }

    async fn list(&self, tenant_id: Uuid) -> VowsResult<Vec<Palette>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM palette \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PaletteRowWithId> = result.take(0).map_err(DbError::from)?;
        let palettes = rows
            .into_iter()
            .map(|row| row.try_into_palette())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(palettes)
    }
}
