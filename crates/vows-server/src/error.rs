//! Mapping of domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;
use vows_core::error::VowsError;

/// Error returned by every handler; renders as `{ "error": <message> }`.
#[derive(Debug)]
pub struct ApiError(pub VowsError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            VowsError::NotFound { .. } => StatusCode::NOT_FOUND,
            VowsError::Validation { .. } => StatusCode::BAD_REQUEST,
            VowsError::AlreadyExists { .. } => StatusCode::CONFLICT,
            VowsError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            VowsError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            VowsError::Database(_) | VowsError::Crypto(_) | VowsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<VowsError> for ApiError {
    fn from(err: VowsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
