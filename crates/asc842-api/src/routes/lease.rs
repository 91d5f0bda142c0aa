//! Calculation routes.
//!
//! Classification, initial recognition and amortization responses carry
//! display strings (`$1,234.56`, `6.00%`). The unified and remeasurement
//! responses carry raw decimals.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use asc842_core::format::{format_currency, format_percentage_opt};
use asc842_core::lease_accounting::amortization::{build_schedule, AmortizationRow, ScheduleRequest};
use asc842_core::lease_accounting::classification::{classify_lease, LeaseParameters};
use asc842_core::lease_accounting::recognition::{
    measure_initial_recognition, RecognitionAdjustments,
};
use asc842_core::lease_accounting::remeasurement::{calculate_remeasurement, RemeasurementInput};
use asc842_core::lease_accounting::unified::{run_unified_calculation, UnifiedRequest};

use crate::error::ApiError;
use crate::extractors::LeaseJson;

pub fn routes() -> Router {
    Router::new()
        .route("/classify", post(classify))
        .route("/initial-recognition", post(initial_recognition))
        .route("/amortization", post(amortization))
        .route("/unified-calculation", post(unified_calculation))
        .route("/remeasurement", post(remeasurement))
}

/// Body of `POST /initial-recognition`.
#[derive(Debug, Deserialize)]
pub struct RecognitionRequest {
    #[serde(flatten)]
    pub lease: LeaseParameters,
    #[serde(flatten)]
    pub adjustments: RecognitionAdjustments,
}

async fn classify(LeaseJson(params): LeaseJson<LeaseParameters>) -> Result<Json<Value>, ApiError> {
    let result = classify_lease(&params)?;

    info!(lease_type = %result.lease_type, "lease classified");

    Ok(Json(json!({
        "success": true,
        "lease_type": result.lease_type,
        "tests": result.tests,
        "calculations": {
            "pv_lease_payments": format_currency(result.calculations.pv_lease_payments),
            "lease_term_percentage": format_percentage_opt(result.calculations.lease_term_percentage),
            "pv_percentage": format_percentage_opt(result.calculations.pv_percentage),
        },
    })))
}

async fn initial_recognition(
    LeaseJson(request): LeaseJson<RecognitionRequest>,
) -> Result<Json<Value>, ApiError> {
    let recognition = measure_initial_recognition(&request.lease, &request.adjustments)?;
    let components = &recognition.components;

    Ok(Json(json!({
        "success": true,
        "lease_liability": format_currency(recognition.lease_liability),
        "rou_asset": format_currency(recognition.rou_asset),
        "components": {
            "lease_liability": format_currency(components.lease_liability),
            "prepaid_rent": format_currency(components.prepaid_rent),
            "initial_direct_costs": format_currency(components.initial_direct_costs),
            "lease_incentives": format_currency(components.lease_incentives),
        },
    })))
}

fn formatted_row(row: &AmortizationRow) -> Value {
    json!({
        "month": row.month,
        "begin_liability": format_currency(row.begin_liability),
        "begin_rou": format_currency(row.begin_rou),
        "payment": format_currency(row.payment),
        "interest_expense": format_currency(row.interest_expense),
        "principal_reduction": format_currency(row.principal_reduction),
        "rou_amortization": format_currency(row.rou_amortization),
        "total_expense": format_currency(row.total_expense),
        "end_liability": format_currency(row.end_liability),
        "end_rou": format_currency(row.end_rou),
    })
}

async fn amortization(
    LeaseJson(request): LeaseJson<ScheduleRequest>,
) -> Result<Json<Value>, ApiError> {
    let (input, schedule) = build_schedule(&request)?;

    Ok(Json(json!({
        "success": true,
        "lease_type": input.lease_type,
        "schedule": schedule.rows.iter().map(formatted_row).collect::<Vec<_>>(),
        "summary": {
            "initial_liability": format_currency(input.initial_liability),
            "initial_rou": format_currency(input.initial_rou_asset),
            "total_payments": format_currency(schedule.totals.total_payments),
        },
    })))
}

async fn unified_calculation(
    LeaseJson(request): LeaseJson<UnifiedRequest>,
) -> Result<Json<Value>, ApiError> {
    let output = run_unified_calculation(&request)?;

    info!(
        lease_type = %output.result.lease_type(),
        warnings = output.warnings.len(),
        micros = output.metadata.computation_time_us,
        "unified calculation served"
    );

    let mut body = serde_json::to_value(&output.result)
        .map_err(asc842_core::LeaseAccountingError::from)?;
    if let Value::Object(map) = &mut body {
        map.insert("success".into(), Value::Bool(true));
        map.insert("warnings".into(), json!(output.warnings));
    }
    Ok(Json(body))
}

async fn remeasurement(
    LeaseJson(input): LeaseJson<RemeasurementInput>,
) -> Result<Json<Value>, ApiError> {
    let result = calculate_remeasurement(&input)?;
    Ok(Json(json!({
        "success": true,
        "remeasurement": result,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = routes()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_classify_formats_calculations() {
        let (status, body) = post_json(
            "/classify",
            json!({
                "monthly_payment": 1000,
                "lease_term_months": 60,
                "discount_rate": 0.05,
                "fair_value": 50000,
                "asset_life_months": 60
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["lease_type"], "Finance");
        assert_eq!(body["calculations"]["lease_term_percentage"], "100.00%");
        assert!(body["calculations"]["pv_lease_payments"]
            .as_str()
            .unwrap()
            .starts_with("$52,"));
    }

    #[tokio::test]
    async fn test_classify_without_fair_value_reports_na() {
        let (_, body) = post_json(
            "/classify",
            json!({ "monthly_payment": 1000, "lease_term_months": 24, "discount_rate": 0.06 }),
        )
        .await;
        assert_eq!(body["lease_type"], "Operating");
        assert_eq!(body["calculations"]["pv_percentage"], "N/A");
    }

    #[tokio::test]
    async fn test_initial_recognition_components() {
        let (status, body) = post_json(
            "/initial-recognition",
            json!({
                "monthly_payment": 1000,
                "lease_term_months": 12,
                "discount_rate": 0,
                "prepaid_rent": 500,
                "lease_incentives": 2000
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lease_liability"], "$12,000.00");
        assert_eq!(body["rou_asset"], "$10,500.00");
        assert_eq!(body["components"]["lease_incentives"], "-$2,000.00");
    }

    #[tokio::test]
    async fn test_amortization_summary() {
        let (status, body) = post_json(
            "/amortization",
            json!({
                "lease_type": "FINANCE",
                "monthly_payment": 1000,
                "lease_term_months": 12,
                "discount_rate": 0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schedule"].as_array().unwrap().len(), 12);
        assert_eq!(body["schedule"][0]["payment"], "$1,000.00");
        assert_eq!(body["schedule"][11]["end_liability"], "$0.00");
        assert_eq!(body["summary"]["total_payments"], "$12,000.00");
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        let (status, body) = post_json(
            "/classify",
            json!({ "monthly_payment": -1, "lease_term_months": 0, "discount_rate": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (status, body) = post_json("/amortization", json!({ "monthly_payment": 1000 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["errors"][0].as_str().unwrap().contains("lease_term_months"));
    }

    #[tokio::test]
    async fn test_unified_calculation_raw_decimals() {
        let (status, body) = post_json(
            "/unified-calculation",
            json!({
                "monthly_payment": 1000,
                "lease_term_months": 12,
                "discount_rate": 0,
                "lease_commencement_date": "2024-01-01"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["summary"]["total_payments"], "12000");
        assert_eq!(body["amortization_schedule"].as_array().unwrap().len(), 12);
        assert_eq!(body["journal_entries"]["periodic"].as_array().unwrap().len(), 12);
        assert!(!body["warnings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remeasurement() {
        let (status, body) = post_json(
            "/remeasurement",
            json!({
                "current_liability": 50000,
                "current_rou": 50000,
                "new_payment": 2000,
                "remaining_term": 24,
                "new_rate": 0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["remeasurement"]["new_liability"], "48000");
        assert_eq!(body["remeasurement"]["liability_adjustment"], "-2000");
    }
}
