//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, items, karma, votes};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Items (user JWT auth)
/// - `POST /v1/items` - Submit a fact check or comment
/// - `GET /v1/items/{id}` - Get an item with its counters
///
/// ## Votes (user JWT auth)
/// - `POST /v1/items/{id}/vote` - Submit, change, or clear a vote
/// - `GET /v1/items/{id}/votes` - Vote counts (`?recount=true` audits)
/// - `GET /v1/votes?items=a,b,c` - The caller's votes over a batch of items
///
/// ## Karma (user JWT auth)
/// - `GET /v1/karma/me` - Own karma total
/// - `GET /v1/karma/me/history` - Own ledger entries, newest first
/// - `GET /v1/karma/{user_id}` - Any user's karma total
///
/// ## Moderation (moderator key auth)
/// - `POST /v1/items/{id}/status` - Set validation status
/// - `DELETE /v1/items/{id}` - Delete an item and its votes
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Items
        .route("/v1/items", post(items::create_item))
        .route("/v1/items/:id", get(items::get_item))
        .route("/v1/items/:id", delete(items::delete_item))
        .route("/v1/items/:id/status", post(items::set_status))
        // Votes
        .route("/v1/items/:id/vote", post(votes::submit_vote))
        .route("/v1/items/:id/votes", get(votes::get_vote_counts))
        .route("/v1/votes", get(votes::get_user_votes))
        // Karma
        .route("/v1/karma/me", get(karma::get_my_karma))
        .route("/v1/karma/me/history", get(karma::get_my_history))
        .route("/v1/karma/:user_id", get(karma::get_user_karma))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
