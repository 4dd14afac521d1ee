//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router allowing any CORS origin.
pub fn create_router(state: AppState) -> Router {
    create_router_with_origins(state, &[])
}

/// Create the router, restricting CORS to `origins` unless the list is empty.
pub fn create_router_with_origins(state: AppState, origins: &[String]) -> Router {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/init", post(handlers::init_store))
        // Users
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{id}",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/online-users", get(handlers::online_users))
        // Channels
        .route("/channels", get(handlers::list_channels))
        .route("/channels/{channel_id}", patch(handlers::update_channel_members))
        .route("/channels/{channel_id}/members", get(handlers::channel_members))
        .route("/channels/{channel_id}/activity", get(handlers::get_activity))
        .route(
            "/channels/{channel_id}/meeting-times",
            post(handlers::get_meeting_times),
        )
        // History
        .route(
            "/history/{channel_id}",
            get(handlers::get_history).post(handlers::post_history),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
