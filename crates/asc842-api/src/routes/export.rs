//! Spreadsheet download routes.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::post,
    Router,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use asc842_core::export::xlsx::{to_xlsx_bytes, XLSX_CONTENT_TYPE};
use asc842_core::export::{complete_workbook, schedule_workbook, Workbook};
use asc842_core::lease_accounting::amortization::{build_schedule, ScheduleRequest};
use asc842_core::lease_accounting::unified::{UnifiedOutput, UnifiedRequest};

use crate::error::ApiError;
use crate::extractors::LeaseJson;

pub fn routes() -> Router {
    Router::new()
        .route("/download-schedule", post(download_schedule))
        .route("/download-complete", post(download_complete))
}

/// Body of `POST /download-complete`: a unified request and its results.
#[derive(Debug, Deserialize)]
pub struct CompleteExportRequest {
    pub inputs: UnifiedRequest,
    pub results: UnifiedOutput,
}

fn attachment(workbook: &Workbook, filename: String) -> Result<impl IntoResponse, ApiError> {
    let bytes = to_xlsx_bytes(workbook)?;
    info!(%filename, size = bytes.len(), "workbook generated");
    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

async fn download_schedule(
    LeaseJson(request): LeaseJson<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (input, schedule) = build_schedule(&request)?;
    let filename = format!(
        "ASC842_Schedule_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    attachment(&schedule_workbook(&input, &schedule), filename)
}

async fn download_complete(
    LeaseJson(request): LeaseJson<CompleteExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workbook = complete_workbook(&request.inputs, &request.results);
    let filename = format!(
        "ASC842_Complete_Analysis_{}.xlsx",
        Local::now().format("%Y%m%d")
    );
    attachment(&workbook, filename)
}
