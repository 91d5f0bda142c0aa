//! HTTP API over the ASC 842 lease accounting engine.
//!
//! Every calculation is request-scoped and stateless, so the router carries
//! no shared state.

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::panic_response;

/// Creates the application router: `/health` plus the lease routes under `/api`.
pub fn create_router(config: &AppConfig) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
