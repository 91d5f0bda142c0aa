//! API route definitions.

use axum::Router;

pub mod export;
pub mod health;
pub mod lease;
pub mod treasury;

/// Lease accounting routes, mounted under `/api`.
pub fn api_routes() -> Router {
    Router::new()
        .merge(lease::routes())
        .merge(export::routes())
        .merge(treasury::routes())
}
