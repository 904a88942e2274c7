//! Meridian Admin library.
//!
//! This crate provides the back-office functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate carries HIGH PRIVILEGE access: full product, order, user, and
//! review CRUD against the backend. Deploy it on an internal network only;
//! every route except login and health is admin-gated.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the admin application router.
///
/// The session layer wraps the guard so the guard can read the admin slice.
pub fn router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .layer(axum::middleware::from_fn(middleware::guard_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
