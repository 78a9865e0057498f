//! Web server module for the Slack endpoints.
//!
//! This module provides:
//! - `POST /croak`: the slash command, answered with a tip
//! - `GET|POST /install`: the OAuth redirect of the app install flow
//! - `GET /health`: liveness check

pub mod handlers;
pub mod reply;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{croak, health, install, install_form, AppState, HealthResponse, InstallParams};
pub use reply::{Attachment, Reply, ResponseType};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/croak", post(croak))
        .route("/install", get(install).post(install_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
