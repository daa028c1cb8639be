//! Admin console. Mounted under an unlisted prefix; every handler also
//! requires an `Admin` session.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;
use vows_core::models::user::{User, UserFilter, UserRole};
use vows_core::repository::{PaginatedResult, Pagination};

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

const PREFIX: &str = "/api/manage-x7k9/users";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListQuery {
    email: Option<String>,
    role: Option<UserRole>,
    include_test_accounts: bool,
    include_deleted: bool,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl ListQuery {
    fn filter(&self) -> UserFilter {
        UserFilter {
            email_contains: self.email.clone().filter(|e| !e.trim().is_empty()),
            role: self.role,
            include_test_accounts: self.include_test_accounts,
            include_deleted: self.include_deleted,
        }
    }

    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(default.offset),
            limit: self.limit.unwrap_or(default.limit),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPatch {
    is_test_account: bool,
}

async fn list_users(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PaginatedResult<User>>> {
    let users = state
        .admin
        .list_users(&session, &query.filter(), query.pagination())
        .await?;
    Ok(Json(users))
}

async fn export_users(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let csv = state.admin.export_csv(&session, &query.filter()).await?;
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"users.csv\""),
        ],
        csv,
    ))
}

async fn delete_user(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.admin.soft_delete(&session, user_id).await?))
}

async fn patch_user(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    let user = state
        .admin
        .set_test_account(&session, user_id, body.is_test_account)
        .await?;
    Ok(Json(user))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(PREFIX, get(list_users))
        .route(&format!("{PREFIX}/export"), get(export_users))
        .route(
            &format!("{PREFIX}/{{id}}"),
            delete(delete_user).patch(patch_user),
        )
}
