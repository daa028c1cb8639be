//! SurrealDB repository implementations.

mod chat;
mod page;
mod palette;
mod planner;
mod rsvp;
mod spark;
mod tenant;
mod user;

pub use chat::SurrealChatRepository;
pub use page::SurrealPageRepository;
pub use palette::SurrealPaletteRepository;
pub use planner::SurrealPlannerRepository;
pub use rsvp::SurrealRsvpRepository;
pub use spark::SurrealSparkRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;

use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

fn parse_opt_uuid(value: Option<&str>, what: &str) -> Result<Option<Uuid>, DbError> {
    value.map(|v| parse_uuid(v, what)).transpose()
}

/// First row of a result set, or `NotFound` for `entity`/`id`.
fn first<T>(rows: Vec<T>, entity: &str, id: impl ToString) -> Result<T, DbError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DbError::not_found(entity, id))
}
