//! Vows Auth: session token issuance/validation and sign-in
//! orchestration for the third-party identity provider callback.

pub mod config;
pub mod error;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, SignInInput, SignInOutput};
pub use token::{Session, SessionClaims};
