//! API error type and its JSON rendering.
//!
//! Caller mistakes (validation failures and malformed bodies) are `400` with
//! `{"success": false, "errors": [...]}`; anything else is a `500` with
//! `{"success": false, "error": ..., "trace": ...}`. A panicking handler is
//! reported the same way as a computation failure.

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use asc842_core::LeaseAccountingError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request rejected: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{message}")]
    Computation { message: String, trace: String },
}

impl From<LeaseAccountingError> for ApiError {
    fn from(e: LeaseAccountingError) -> Self {
        if e.is_validation() {
            ApiError::Validation(e.violation_messages())
        } else {
            ApiError::Computation {
                message: e.to_string(),
                trace: format!("{e:?}"),
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                warn!(?errors, "request rejected");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "errors": errors })),
                )
                    .into_response()
            }
            ApiError::Computation { message, trace } => {
                error!(error = %message, "calculation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": message, "trace": trace })),
                )
                    .into_response()
            }
        }
    }
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Computation {
        message: "Internal calculation error".to_string(),
        trace: detail,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asc842_core::error::FieldViolation;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = LeaseAccountingError::Validation(vec![FieldViolation::new(
            "monthly_payment",
            "Monthly payment must be positive",
        )])
        .into();
        assert!(matches!(&err, ApiError::Validation(e) if e[0] == "Monthly payment must be positive"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_computation_maps_to_server_error() {
        let err: ApiError = LeaseAccountingError::DateError("out of range".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panic_becomes_json_server_error() {
        use axum::{body::Body, http::Request, routing::get, Router};
        use http_body_util::BodyExt;
        use tower::ServiceExt;
        use tower_http::catch_panic::CatchPanicLayer;

        let app = Router::new()
            .route("/fail", get(|| async { panic!("schedule row out of range") as () }))
            .layer(CatchPanicLayer::custom(panic_response));
        let response = app
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal calculation error");
        assert_eq!(body["trace"], "schedule row out of range");
    }
}
