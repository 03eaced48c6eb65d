//! Page container for the profile form: configuration, HTTP routes and
//! HTML rendering.

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::page::router())
        .nest("/api/v1/forms", routes::forms::router())
        .with_state(state)
}
