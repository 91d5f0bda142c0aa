use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use asc842_core::lease_accounting::treasury;

/// Arguments for the Treasury rate lookup
#[derive(Args)]
pub struct TreasuryRatesArgs {
    /// Return only the rate for the maturity closest to this lease term
    #[arg(long, conflicts_with = "term_years")]
    pub term_months: Option<u32>,
    /// Return only the rate for the first maturity at or beyond this many years
    #[arg(long)]
    pub term_years: Option<Decimal>,
}

pub fn run_treasury_rates(args: TreasuryRatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match (args.term_months, args.term_years) {
        (Some(months), _) => Ok(json!({
            "lease_term_months": months,
            "treasury_rate": treasury::closest_rate_for_term_months(months),
        })),
        (None, Some(years)) => Ok(json!({
            "term_years": years,
            "treasury_rate": treasury::rate_for_term_years(years),
        })),
        (None, None) => Ok(serde_json::to_value(treasury::rate_table())?),
    }
}
