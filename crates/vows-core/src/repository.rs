//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation; pages are
//! scoped through their owning planner.

use serde::Serialize;
use uuid::Uuid;

use crate::error::VowsResult;
use crate::fields::Fields;
use crate::models::{
    chat::{ChatMessage, CreateChatMessage},
    page::{CreatePage, Page},
    palette::{CreatePalette, Palette, UpdatePalette},
    planner::{CreatePlanner, Planner},
    rsvp::{CreateRsvpForm, RsvpForm, UpdateRsvpForm},
    spark::{CreateSpark, Spark, UpdateSpark},
    tenant::{CreateTenant, Tenant},
    user::{CreateUser, UpdateUser, User, UserFilter},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant & User (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = VowsResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VowsResult<Tenant>> + Send;
    /// Delete the tenant together with everything it owns, atomically.
    fn delete(&self, id: Uuid) -> impl Future<Output = VowsResult<()>> + Send;
}

/// Users are global so the admin console can list across tenants.
pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = VowsResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VowsResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = VowsResult<User>> + Send;
    fn update(&self, id: Uuid, input: UpdateUser)
    -> impl Future<Output = VowsResult<User>> + Send;
    /// Soft-delete: sets `deleted_at` if it is not already set.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = VowsResult<User>> + Send;
    /// Filtered listing, newest first.
    fn list(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> impl Future<Output = VowsResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Planner & Page
// ---------------------------------------------------------------------------

pub trait PlannerRepository: Send + Sync {
    fn create(&self, input: CreatePlanner) -> impl Future<Output = VowsResult<Planner>> + Send;
    fn get_by_tenant(&self, tenant_id: Uuid) -> impl Future<Output = VowsResult<Planner>> + Send;
    fn touch(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = VowsResult<()>> + Send;
}

pub trait PageRepository: Send + Sync {
    fn create(&self, input: CreatePage) -> impl Future<Output = VowsResult<Page>> + Send;
    fn get_by_id(
        &self,
        planner_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VowsResult<Page>> + Send;
    /// All pages of a planner sorted by `order`.
    fn list_by_planner(
        &self,
        planner_id: Uuid,
    ) -> impl Future<Output = VowsResult<Vec<Page>>> + Send;
    /// Replace the full `fields` object (last write wins).
    fn update_fields(
        &self,
        planner_id: Uuid,
        id: Uuid,
        fields: Fields,
    ) -> impl Future<Output = VowsResult<Page>> + Send;
    fn rename(
        &self,
        planner_id: Uuid,
        id: Uuid,
        title: String,
    ) -> impl Future<Output = VowsResult<Page>> + Send;
    /// Assign `order = index` for each id in `ordered_ids`.
    fn set_order(
        &self,
        planner_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> impl Future<Output = VowsResult<()>> + Send;
    fn delete(&self, planner_id: Uuid, id: Uuid) -> impl Future<Output = VowsResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// RSVP
// ---------------------------------------------------------------------------

pub trait RsvpRepository: Send + Sync {
    fn create(&self, input: CreateRsvpForm) -> impl Future<Output = VowsResult<RsvpForm>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VowsResult<RsvpForm>> + Send;
    /// Public lookup; slugs are globally unique.
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = VowsResult<RsvpForm>> + Send;
    fn get_by_page(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
    ) -> impl Future<Output = VowsResult<Option<RsvpForm>>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateRsvpForm,
    ) -> impl Future<Output = VowsResult<RsvpForm>> + Send;
    fn delete_by_page(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
    ) -> impl Future<Output = VowsResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Inspiration board
// ---------------------------------------------------------------------------

pub trait PaletteRepository: Send + Sync {
    fn create(&self, input: CreatePalette) -> impl Future<Output = VowsResult<Palette>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VowsResult<Palette>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdatePalette,
    ) -> impl Future<Output = VowsResult<Palette>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = VowsResult<()>> + Send;
    fn list(&self, tenant_id: Uuid) -> impl Future<Output = VowsResult<Vec<Palette>>> + Send;
}

pub trait SparkRepository: Send + Sync {
    fn create(&self, input: CreateSpark) -> impl Future<Output = VowsResult<Spark>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VowsResult<Spark>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateSpark,
    ) -> impl Future<Output = VowsResult<Spark>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = VowsResult<()>> + Send;
    /// All sparks of a tenant, or only those filed in `palette_id`.
    fn list(
        &self,
        tenant_id: Uuid,
        palette_id: Option<Uuid>,
    ) -> impl Future<Output = VowsResult<Vec<Spark>>> + Send;
    /// Move every spark of a palette back to unfiled.
    fn unfile_palette(
        &self,
        tenant_id: Uuid,
        palette_id: Uuid,
    ) -> impl Future<Output = VowsResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Scribe chat
// ---------------------------------------------------------------------------

pub trait ChatRepository: Send + Sync {
    fn append(
        &self,
        input: CreateChatMessage,
    ) -> impl Future<Output = VowsResult<ChatMessage>> + Send;
    /// The most recent `limit` messages in chronological order.
    fn recent(
        &self,
        tenant_id: Uuid,
        limit: u64,
    ) -> impl Future<Output = VowsResult<Vec<ChatMessage>>> + Send;
}
