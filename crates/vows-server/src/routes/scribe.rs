use axum::extract::{Query, State};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use vows_core::models::chat::ChatMessage;
use vows_planner::scribe::ScribeReply;

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

#[derive(Deserialize)]
struct SendMessage {
    message: String,
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    50
}

async fn send(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<SendMessage>,
) -> ApiResult<Json<ScribeReply>> {
    Ok(Json(
        state.scribe.send(session.tenant_id, &body.message).await?,
    ))
}

async fn history(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    Ok(Json(
        state.scribe.history(session.tenant_id, query.limit).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/scribe", post(send).get(history))
}
