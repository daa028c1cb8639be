//! SurrealDB implementation of [`UserRepository`].
//!
//! Emails are stored lowercased so that sign-in and the unique index
//! are case-insensitive.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vows_core::error::VowsResult;
use vows_core::models::user::{CreateUser, UpdateUser, User, UserFilter, UserRole};
use vows_core::repository::{PaginatedResult, Pagination, UserRepository};

use super::{CountRow, first, parse_uuid};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    tenant_id: String,
    email: String,
    name: String,
    role: String,
    is_test_account: bool,
    email_opt_in: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    tenant_id: String,
    email: String,
    name: String,
    role: String,
    is_test_account: bool,
    email_opt_in: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    UserRole::parse(s).ok_or_else(|| DbError::Decode(format!("unknown user role: {s}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            email: self.email,
            name: self.name,
            role: parse_role(&self.role)?,
            is_test_account: self.is_test_account,
            email_opt_in: self.email_opt_in,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = parse_uuid(&self.record_id, "user")?;
        UserRow {
            tenant_id: self.tenant_id,
            email: self.email,
            name: self.name,
            role: self.role,
            is_test_account: self.is_test_account,
            email_opt_in: self.email_opt_in,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_user(id)
    }
}

/// WHERE clause for an admin filter. Bind names match [`bind_filter`].
fn filter_clause(filter: &UserFilter) -> String {
    let mut conds = vec!["true"];
    if filter.email_contains.is_some() {
        conds.push("string::contains(email, $email_contains)");
    }
    if filter.role.is_some() {
        conds.push("role = $role");
    }
    if !filter.include_test_accounts {
        conds.push("is_test_account = false");
    }
    if !filter.include_deleted {
        conds.push("deleted_at = NONE");
    }
    conds.join(" AND ")
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<User, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id.to_string()))
            .await?;

        let rows: Vec<UserRow> = result.take(0)?;
        first(rows, "user", id)?.into_user(id)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> VowsResult<User> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 tenant_id = $tenant_id, \
                 email = $email, name = $name, \
                 role = $role, \
                 is_test_account = $is_test_account, \
                 email_opt_in = $email_opt_in, \
                 deleted_at = NONE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("email", input.email.trim().to_lowercase()))
            .bind(("name", input.name))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("is_test_account", input.is_test_account))
            .bind(("email_opt_in", input.email_opt_in))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::query("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "user", id)?.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VowsResult<User> {
        Ok(self.fetch(id).await?)
    }

    async fn get_by_email(&self, email: &str) -> VowsResult<User> {
        let email = email.trim().to_lowercase();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "user", format!("email={email}"))?.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> VowsResult<User> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.is_test_account.is_some() {
            sets.push("is_test_account = $is_test_account");
        }
        if input.email_opt_in.is_some() {
            sets.push("email_opt_in = $email_opt_in");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str().to_string()));
        }
        if let Some(is_test_account) = input.is_test_account {
            builder = builder.bind(("is_test_account", is_test_account));
        }
        if let Some(email_opt_in) = input.email_opt_in {
            builder = builder.bind(("email_opt_in", email_opt_in));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::query("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(first(rows, "user", id)?.into_user(id)?)
    }

    async fn soft_delete(&self, id: Uuid) -> VowsResult<User> {
        // Keep the original timestamp when deleting twice.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 deleted_at = time::now(), updated_at = time::now() \
                 WHERE deleted_at = NONE",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::query("user", e))?;

        Ok(self.fetch(id).await?)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> VowsResult<PaginatedResult<User>> {
        let clause = filter_clause(filter);
        let email_contains = filter
            .email_contains
            .as_deref()
            .map(|s| s.trim().to_lowercase());
        let role = filter.role.map(|r| r.as_str().to_string());

        let count_query = format!("SELECT count() AS total FROM user WHERE {clause} GROUP ALL");
        let mut count_builder = self.db.query(count_query);
        if let Some(ref needle) = email_contains {
            count_builder = count_builder.bind(("email_contains", needle.clone()));
        }
        if let Some(ref role) = role {
            count_builder = count_builder.bind(("role", role.clone()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM user \
             WHERE {clause} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(needle) = email_contains {
            builder = builder.bind(("email_contains", needle));
        }
        if let Some(role) = role {
            builder = builder.bind(("role", role));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
