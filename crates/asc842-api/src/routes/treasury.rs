//! Risk-free rate lookup.

use axum::{extract::Query, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use asc842_core::lease_accounting::treasury::{
    closest_rate_for_term_months, rate_for_term_years, rate_table,
};

#[derive(Debug, Deserialize)]
pub struct TreasuryQuery {
    /// When present, also return the rate selected for this lease term.
    pub term_months: Option<u32>,
    /// Term in years; selects the first maturity at or beyond it.
    pub term_years: Option<Decimal>,
}

async fn treasury_rates(Query(query): Query<TreasuryQuery>) -> Json<Value> {
    let mut body = json!({
        "success": true,
        "rates": rate_table(),
    });
    if let Some(months) = query.term_months {
        body["lease_term_months"] = json!(months);
        body["treasury_rate"] = json!(closest_rate_for_term_months(months));
    } else if let Some(years) = query.term_years {
        body["term_years"] = json!(years);
        body["treasury_rate"] = json!(rate_for_term_years(years));
    }
    Json(body)
}

pub fn routes() -> Router {
    Router::new().route("/treasury-rates", get(treasury_rates))
}
