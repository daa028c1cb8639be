//! Authentication error types.

use thiserror::Error;
use vows_core::error::VowsError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("account has been deleted")]
    AccountDeleted,

    #[error("invalid provider secret")]
    InvalidProviderSecret,

    #[error("missing email address")]
    MissingEmail,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for VowsError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountDeleted
            | AuthError::InvalidProviderSecret
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => VowsError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::MissingEmail => VowsError::validation(err.to_string()),
            AuthError::Crypto(msg) => VowsError::Crypto(msg),
        }
    }
}
