//! HTTP routes. Each module contributes a `Router<AppState>`.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod admin;
mod auth;
mod board;
mod planner;
mod rsvp;
mod scribe;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(planner::router())
        .merge(rsvp::router())
        .merge(scribe::router())
        .merge(admin::router())
        .merge(board::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
