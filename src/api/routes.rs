//! Route configuration.

use crate::api::handlers;
use crate::api::middleware::{allow_headers_layer, allow_methods_layer, cors_layer};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Analytics
        .route("/api/", post(handlers::api_entry))
        .route("/api/{*route}", post(handlers::api_entry))
        // Answers every OPTIONS request with an empty 200
        .layer(cors_layer())
        .layer(allow_methods_layer())
        .layer(allow_headers_layer())
        .with_state(state)
}
