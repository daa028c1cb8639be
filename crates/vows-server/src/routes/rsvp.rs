use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vows_core::models::rsvp::{PublicRsvpForm, RsvpForm, RsvpResponse};
use vows_planner::rsvp::share_link;

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateForm {
    page_id: Uuid,
    #[serde(default)]
    fields: Option<BTreeMap<String, bool>>,
    #[serde(default)]
    meal_options: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormPatch {
    #[serde(default)]
    fields: Option<BTreeMap<String, bool>>,
    #[serde(default)]
    meal_options: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormResponse {
    form: RsvpForm,
    share_link: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    guest_id: String,
}

fn with_link(state: &AppState, form: RsvpForm) -> FormResponse {
    FormResponse {
        share_link: share_link(&state.public_base_url, &form.slug),
        form,
    }
}

async fn create_form(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<CreateForm>,
) -> ApiResult<Json<FormResponse>> {
    let form = state
        .rsvp
        .create_form(session.tenant_id, body.page_id, body.fields, body.meal_options)
        .await?;
    Ok(Json(with_link(&state, form)))
}

async fn get_form(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<FormResponse>> {
    let form = state.rsvp.get_form(session.tenant_id, page_id).await?;
    Ok(Json(with_link(&state, form)))
}

async fn update_form(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(form_id): Path<Uuid>,
    Json(body): Json<FormPatch>,
) -> ApiResult<Json<FormResponse>> {
    let form = state
        .rsvp
        .update_form(session.tenant_id, form_id, body.fields, body.meal_options)
        .await?;
    Ok(Json(with_link(&state, form)))
}

async fn public_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PublicRsvpForm>> {
    Ok(Json(state.rsvp.get_public_form(&slug).await?))
}

async fn submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<RsvpResponse>,
) -> ApiResult<Json<SubmitResponse>> {
    let guest_id = state.rsvp.submit(&slug, body).await?;
    Ok(Json(SubmitResponse { guest_id }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rsvp/create", post(create_form))
        .route("/api/rsvp/pages/{page_id}", get(get_form))
        .route("/api/rsvp/forms/{id}", patch(update_form))
        .route("/api/rsvp/{slug}", get(public_form).post(submit))
}
