//! Vows Server: axum HTTP API over the planner services.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
