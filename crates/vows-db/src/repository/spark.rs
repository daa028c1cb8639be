//! SurrealDB implementation of [`SparkRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::spark::{CreateSpark, Spark, UpdateSpark};
use vows_core::repository::SparkRepository;

use super::{first, parse_opt_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SparkRow {
    tenant_id: String,
    palette_id: Option<String>,
    image_url: String,
    caption: String,
    source_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SparkRowWithId {
    record_id: String,
    tenant_id: String,
    palette_id: Option<String>,
    image_url: String,
    caption: String,
    source_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl SparkRow {
    fn into_spark(self, id: Uuid) -> Result<Spark, DbError> {
        Ok(Spark {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            palette_id: parse_opt_uuid(self.palette_id.as_deref(), "palette")?,
            image_url: self.image_url,
            caption: self.caption,
            source_url: self.source_url,
            tags: self.tags,
            created_at: self.created_at,
        })
    }
}

impl SparkRowWithId {
    fn try_into_spark(self) -> Result<Spark, DbError> {
        Ok(Spark {
            id: parse_uuid(&self.record_id, "spark")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            palette_id: parse_opt_uuid(self.palette_id.as_deref(), "palette")?,
            image_url: self.image_url,
            caption: self.caption,
            source_url: self.source_url,
            tags: self.tags,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Spark repository.
#[derive(Clone)]
pub struct SurrealSparkRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSparkRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SparkRepository for SurrealSparkRepository<C> {
    async fn create(&self, input: CreateSpark) -> VowsResult<Spark> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('spark', $id) SET \
                 tenant_id = $tenant_id, palette_id = $palette_id, \
                 image_url = $image_url, caption = $caption, \
                 source_url = $source_url, tags = $tags",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("palette_id", input.palette_id.map(|p| p.to_string())))
            .bind(("image_url", input.image_url))
            .bind(("caption", input.caption.unwrap_or_default()))
            .bind(("source_url", input.source_url))
            .bind(("tags", input.tags))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("spark", e))?;

        let rows: Vec<SparkRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "spark", id)?.into_spark(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<Spark> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('spark', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SparkRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "spark", id)?.into_spark(id)?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateSpark) -> VowsResult<Spark> {
        let mut sets = Vec::new();
        if input.caption.is_some() {
            sets.push("caption = $caption");
        }
        if input.tags.is_some() {
            sets.push("tags = $tags");
        }
        match input.palette_id {
            Some(Some(_)) => sets.push("palette_id = $palette_id"),
            Some(None) => sets.push("palette_id = NONE"),
            None => {}
        }

        if sets.is_empty() {
            return self.get_by_id(tenant_id, id).await;
        }

        let query = format!(
            "UPDATE type::record('spark', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(caption) = input.caption {
            builder = builder.bind(("caption", caption));
        }
        if let Some(tags) = input.tags {
            builder = builder.bind(("tags", tags));
        }
        if let Some(Some(palette_id)) = input.palette_id {
            builder = builder.bind(("palette_id", palette_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::query("spark", e))?;

        let rows: Vec<SparkRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "spark", id)?.into_spark(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "DELETE type::record('spark', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("spark", e))?;

        Ok(())
    }

    async fn list(&self, tenant_id: Uuid, palette_id: Option<Uuid>) -> VowsResult<Vec<Spark>> {
        let query = if palette_id.is_some() {
            "SELECT meta::id(id) AS record_id, * FROM spark \
             WHERE tenant_id = $tenant_id AND palette_id = $palette_id \
             ORDER BY created_at DESC"
        } else {
            "SELECT meta::id(id) AS record_id, * FROM spark \
             WHERE tenant_id = $tenant_id \
             ORDER BY created_at DESC"
        };

        let mut builder = self
            .db
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(palette_id) = palette_id {
            builder = builder.bind(("palette_id", palette_id.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<SparkRowWithId> = result.take(0).map_err(DbError::from)?;
        let sparks = rows
            .into_iter()
            .map(|row| row.try_into_spark())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(sparks)
    }

    async fn unfile_palette(&self, tenant_id: Uuid, palette_id: Uuid) -> VowsResult<()> {
        self.db
            .query(
                "UPDATE spark SET palette_id = NONE \
                 WHERE tenant_id = $tenant_id AND palette_id = $palette_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("palette_id", palette_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("spark", e))?;

        Ok(())
    }
}
