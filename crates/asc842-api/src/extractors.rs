//! Request extractors.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json<T>` whose rejection renders as an [`ApiError`], so malformed or
/// incomplete bodies get the same `400` shape as validation failures.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct LeaseJson<T>(pub T);
