use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use serde_json::{json, Value};

use asc842_core::export::{self, xlsx, Workbook};
use asc842_core::lease_accounting::amortization::build_schedule;
use asc842_core::lease_accounting::unified;

use super::lease_accounting::{schedule_request, unified_request, AmortizationArgs, UnifiedArgs};

/// Arguments for the complete workbook export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub request: UnifiedArgs,

    /// Output path (default ASC842_Complete_Analysis_<date>.xlsx)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the schedule-only workbook export
#[derive(Args)]
pub struct ExportScheduleArgs {
    #[command(flatten)]
    pub request: AmortizationArgs,

    /// Output path (default ASC842_Schedule_<timestamp>.xlsx)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = unified_request(&args.request)?;
    let output = unified::run_unified_calculation(&request)?;
    let workbook = export::complete_workbook(&request, &output.result);

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "ASC842_Complete_Analysis_{}.xlsx",
            Local::now().format("%Y%m%d")
        ))
    });
    write_workbook(&workbook, path)
}

pub fn run_export_schedule(args: ExportScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = schedule_request(&args.request)?;
    let (input, schedule) = build_schedule(&request)?;
    let workbook = export::schedule_workbook(&input, &schedule);

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "ASC842_Schedule_{}.xlsx",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    write_workbook(&workbook, path)
}

fn write_workbook(workbook: &Workbook, path: PathBuf) -> Result<Value, Box<dyn std::error::Error>> {
    xlsx::write_xlsx(workbook, &path)?;
    Ok(json!({
        "path": path.display().to_string(),
        "sheets": workbook.sheet_names(),
    }))
}
