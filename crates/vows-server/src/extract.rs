//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use vows_auth::Session;
use vows_core::error::VowsError;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, from `Authorization: Bearer <token>`.
///
/// The token is verified and the user is re-checked so soft-deleted
/// accounts lose access immediately.
#[derive(Debug, Clone, Copy)]
pub struct AuthSession(pub Session);

fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts).ok_or_else(|| VowsError::AuthenticationFailed {
            reason: "missing bearer token".into(),
        })?;
        let session = state.auth.authenticate(token)?;
        state.auth.current_user(&session).await?;
        Ok(AuthSession(session))
    }
}

/// JSON body extractor and response. A body that is missing, malformed
/// or of the wrong shape is rejected as a validation error, so it
/// renders like every other API error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <axum::Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(VowsError::validation(rejection.body_text()).into()),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
