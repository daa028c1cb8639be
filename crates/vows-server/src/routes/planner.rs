use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{delete, get, post};
use axum::Router;
use futures::Stream;
use futures::stream;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use uuid::Uuid;
use vows_core::events::{PlannerEvent, PlannerEventKind};
use vows_core::fields::Fields;
use vows_core::models::page::Page;
use vows_core::models::planner::PlannerWithPages;
use vows_core::template::{self, Template};
use vows_core::view::PageView;

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPage {
    template_id: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagePatch {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    fields: Option<Fields>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldsUpdate {
    page_id: Uuid,
    fields: Fields,
}

#[derive(Deserialize)]
struct FieldUpdate {
    key: String,
    value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reorder {
    page_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeatAssignment {
    table_id: String,
    guest_id: String,
}

async fn get_planner(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<Json<PlannerWithPages>> {
    Ok(Json(state.planner.get_planner(session.tenant_id).await?))
}

async fn list_templates() -> Json<&'static [Template]> {
    Json(template::all())
}

async fn create_page(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<NewPage>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let page = state
        .planner
        .create_page(session.tenant_id, &body.template_id, body.title)
        .await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn get_page(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<Page>> {
    Ok(Json(state.planner.get_page(session.tenant_id, page_id).await?))
}

async fn view_page(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<PageView>> {
    Ok(Json(
        state.planner.render_page(session.tenant_id, page_id).await?,
    ))
}

/// Rename and/or replace fields in one request.
async fn patch_page(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
    Json(body): Json<PagePatch>,
) -> ApiResult<Json<Page>> {
    let tenant_id = session.tenant_id;
    let mut page = None;
    if let Some(title) = body.title {
        page = Some(state.planner.rename_page(tenant_id, page_id, &title).await?);
    }
    if let Some(fields) = body.fields {
        page = Some(state.planner.update_fields(tenant_id, page_id, fields).await?);
    }
    match page {
        Some(page) => Ok(Json(page)),
        None => Ok(Json(state.planner.get_page(tenant_id, page_id).await?)),
    }
}

async fn delete_page(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.planner.delete_page(session.tenant_id, page_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_fields(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<FieldsUpdate>,
) -> ApiResult<Json<Page>> {
    let page = state
        .planner
        .update_fields(session.tenant_id, body.page_id, body.fields)
        .await?;
    Ok(Json(page))
}

async fn update_field(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
    Json(body): Json<FieldUpdate>,
) -> ApiResult<Json<Page>> {
    let page = state
        .planner
        .update_field(session.tenant_id, page_id, &body.key, body.value)
        .await?;
    Ok(Json(page))
}

async fn reorder(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<Reorder>,
) -> ApiResult<Json<Vec<Page>>> {
    let pages = state
        .planner
        .reorder(session.tenant_id, &body.page_ids)
        .await?;
    Ok(Json(pages))
}

async fn toggle_rsvp(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path((page_id, guest_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Page>> {
    let page = state
        .planner
        .toggle_rsvp(session.tenant_id, page_id, &guest_id)
        .await?;
    Ok(Json(page))
}

async fn assign_seat(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
    Json(body): Json<SeatAssignment>,
) -> ApiResult<Json<Page>> {
    let page = state
        .planner
        .assign_seat(session.tenant_id, page_id, &body.table_id, &body.guest_id)
        .await?;
    Ok(Json(page))
}

async fn unassign_seat(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path((page_id, guest_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Page>> {
    let page = state
        .planner
        .unassign_seat(session.tenant_id, page_id, &guest_id)
        .await?;
    Ok(Json(page))
}

/// Server-sent planner events for the caller's tenant. A subscriber
/// that lags behind gets a single `dataChanged` so it refetches.
async fn events(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let tenant_id = session.tenant_id;
    let rx = state.events.subscribe();

    let stream = stream::unfold(rx, move |mut rx| async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) if event.tenant_id == tenant_id => event,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%tenant_id, skipped, "planner event subscriber lagged");
                    PlannerEvent {
                        tenant_id,
                        kind: PlannerEventKind::DataChanged,
                    }
                }
                Err(RecvError::Closed) => return None,
            };
            let sse = Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().comment("unserializable event"));
            return Some((Ok(sse), rx));
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/templates", get(list_templates))
        .route("/api/planner", get(get_planner))
        .route("/api/planner/events", get(events))
        .route("/api/planner/reorder", post(reorder))
        .route("/api/planner/pages", post(create_page))
        .route("/api/planner/pages/update", post(update_fields))
        .route(
            "/api/planner/pages/{id}",
            get(get_page).patch(patch_page).delete(delete_page),
        )
        .route("/api/planner/pages/{id}/view", get(view_page))
        .route("/api/planner/pages/{id}/field", post(update_field))
        .route(
            "/api/planner/pages/{id}/guests/{guest_id}/rsvp",
            post(toggle_rsvp),
        )
        .route("/api/planner/pages/{id}/seats", post(assign_seat))
        .route(
            "/api/planner/pages/{id}/seats/{guest_id}",
            delete(unassign_seat),
        )
}
