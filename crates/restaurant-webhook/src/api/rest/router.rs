//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the webhook router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        // Review endpoints
        .route("/convert/v1beta1/pizza", post(handlers::convert_review))
        .route("/admit/v1beta1/pizza", post(handlers::admit_review))
        .route("/validate/v1beta1/pizza", post(handlers::validate_review))
        // Health
        .route("/healthz", get(handlers::health_check))
        .route("/readyz", get(handlers::readiness))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
