//! Database-specific error types and conversions.

use vows_core::error::VowsError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique constraint violated on {entity}")]
    Duplicate { entity: String },

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid stored value: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify an error returned by `Response::check` for `entity`.
    pub(crate) fn query(entity: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate {
                entity: entity.into(),
            }
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<DbError> for VowsError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => VowsError::NotFound { entity, id },
            DbError::Duplicate { entity } => VowsError::AlreadyExists { entity },
            other => VowsError::Database(other.to_string()),
        }
    }
}
