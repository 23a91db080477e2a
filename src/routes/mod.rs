//! HTTP route handlers.
//!
//! Health routes carry `Cache-Control: no-store` so that no upstream cache can
//! answer a probe on the service's behalf. CORS is permissive because the
//! status page is served from a different origin than the API.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_HEALTH;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    // Health checks - never cached, always fresh for probes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/db", get(health::database))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    let home_routes = Router::new().route("/", get(home::index));

    Router::new()
        .merge(home_routes)
        .merge(health_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
