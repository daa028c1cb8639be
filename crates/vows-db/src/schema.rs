//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings. Enums are stored as strings with ASSERT constraints.
//! Free-form page data lives in FLEXIBLE object fields.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "inspiration_board",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: accounts, planners, pages, RSVP, scribe
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD metadata ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Users (global scope, each bound to one tenant)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Member', 'Admin'];
DEFINE FIELD is_test_account ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD email_opt_in ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD deleted_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_tenant ON TABLE user COLUMNS tenant_id;

-- =======================================================================
-- Planners (tenant scope, one per tenant)
-- =======================================================================
DEFINE TABLE planner SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE planner TYPE string;
DEFINE FIELD title ON TABLE planner TYPE string;
DEFINE FIELD created_at ON TABLE planner TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE planner TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_planner_tenant ON TABLE planner \
    COLUMNS tenant_id UNIQUE;

-- =======================================================================
-- Pages (planner scope)
-- =======================================================================
DEFINE TABLE page SCHEMAFULL;
DEFINE FIELD planner_id ON TABLE page TYPE string;
DEFINE FIELD template_id ON TABLE page TYPE string;
DEFINE FIELD title ON TABLE page TYPE string;
DEFINE FIELD fields ON TABLE page TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD position ON TABLE page TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE page TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE page TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_page_planner ON TABLE page COLUMNS planner_id;

-- =======================================================================
-- RSVP forms (tenant scope, one per guest-list page)
-- =======================================================================
DEFINE TABLE rsvp_form SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE rsvp_form TYPE string;
DEFINE FIELD page_id ON TABLE rsvp_form TYPE string;
DEFINE FIELD slug ON TABLE rsvp_form TYPE string;
DEFINE FIELD fields ON TABLE rsvp_form TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD meal_options ON TABLE rsvp_form TYPE array DEFAULT [];
DEFINE FIELD meal_options.* ON TABLE rsvp_form TYPE string;
DEFINE FIELD created_at ON TABLE rsvp_form TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE rsvp_form TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_rsvp_slug ON TABLE rsvp_form COLUMNS slug UNIQUE;
DEFINE INDEX idx_rsvp_page ON TABLE rsvp_form \
    COLUMNS tenant_id, page_id UNIQUE;

-- =======================================================================
-- Scribe chat history (tenant scope, append-only)
-- =======================================================================
DEFINE TABLE chat_message SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tenant_id ON TABLE chat_message TYPE string;
DEFINE FIELD role ON TABLE chat_message TYPE string \
    ASSERT $value IN ['User', 'Assistant'];
DEFINE FIELD content ON TABLE chat_message TYPE string;
DEFINE FIELD created_at ON TABLE chat_message TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_chat_tenant_time ON TABLE chat_message \
    COLUMNS tenant_id, created_at;
";

// -----------------------------------------------------------------------
// Schema v2: inspiration board
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE TABLE palette SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE palette TYPE string;
DEFINE FIELD name ON TABLE palette TYPE string;
DEFINE FIELD description ON TABLE palette TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE palette TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE palette TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_palette_tenant_name ON TABLE palette \
    COLUMNS tenant_id, name UNIQUE;

DEFINE TABLE spark SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE spark TYPE string;
DEFINE FIELD palette_id ON TABLE spark TYPE option<string>;
DEFINE FIELD image_url ON TABLE spark TYPE string;
DEFINE FIELD caption ON TABLE spark TYPE string DEFAULT '';
DEFINE FIELD source_url ON TABLE spark TYPE option<string>;
DEFINE FIELD tags ON TABLE spark TYPE array DEFAULT [];
DEFINE FIELD tags.* ON TABLE spark TYPE string;
DEFINE FIELD created_at ON TABLE spark TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_spark_tenant_palette ON TABLE spark \
    COLUMNS tenant_id, palette_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_nonempty() {
        for migration in MIGRATIONS {
            assert!(!migration.sql.is_empty(), "{} is empty", migration.name);
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
