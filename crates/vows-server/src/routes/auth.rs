use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use vows_auth::{Session, SignInInput};
use vows_core::models::user::User;

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

const PROVIDER_SECRET_HEADER: &str = "x-provider-secret";

#[derive(Deserialize)]
struct CallbackBody {
    email: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CallbackResponse {
    token: String,
    user: User,
    created: bool,
    expires_in: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session: Session,
    user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPatch {
    email_opt_in: bool,
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CallbackBody>,
) -> ApiResult<Json<CallbackResponse>> {
    let presented = headers
        .get(PROVIDER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    state.auth.check_provider_secret(presented)?;

    let out = state
        .auth
        .sign_in(SignInInput {
            email: body.email,
            name: body.name,
        })
        .await?;
    Ok(Json(CallbackResponse {
        token: out.token,
        user: out.user,
        created: out.created,
        expires_in: out.expires_in,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<Json<SessionResponse>> {
    let user = state.auth.current_user(&session).await?;
    Ok(Json(SessionResponse { session, user }))
}

async fn patch_session(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<SessionPatch>,
) -> ApiResult<Json<SessionResponse>> {
    let user = state
        .auth
        .set_email_opt_in(&session, body.email_opt_in)
        .await?;
    Ok(Json(SessionResponse { session, user }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/callback", post(callback))
        .route("/api/auth/session", get(get_session).patch(patch_session))
}
