//! Static U.S. Treasury yield curve used for the risk-free rate practical
//! expedient (ASC 842-20-30-3).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Rate;

/// (term in years, annual rate), sorted by term.
pub static TREASURY_RATES: &[(Decimal, Rate)] = &[
    (dec!(0.0833), dec!(0.0520)),
    (dec!(0.25), dec!(0.0515)),
    (dec!(0.5), dec!(0.0505)),
    (dec!(1), dec!(0.0485)),
    (dec!(2), dec!(0.0445)),
    (dec!(3), dec!(0.0435)),
    (dec!(5), dec!(0.0435)),
    (dec!(7), dec!(0.0445)),
    (dec!(10), dec!(0.0455)),
    (dec!(20), dec!(0.0485)),
    (dec!(30), dec!(0.0475)),
];

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryRatePoint {
    pub term_years: Decimal,
    /// Human label, e.g. `1M`, `6M`, `5Y`
    pub label: String,
    pub rate: Rate,
}

fn term_label(term_years: Decimal) -> String {
    if term_years < Decimal::ONE {
        let months = (term_years * MONTHS_PER_YEAR).round();
        format!("{months}M")
    } else {
        format!("{}Y", term_years.normalize())
    }
}

/// The full curve with display labels.
pub fn rate_table() -> Vec<TreasuryRatePoint> {
    TREASURY_RATES
        .iter()
        .map(|(term, rate)| TreasuryRatePoint {
            term_years: *term,
            label: term_label(*term),
            rate: *rate,
        })
        .collect()
}

/// Rate of the first maturity at or beyond `term_years`; the longest
/// maturity for anything past the end of the curve.
pub fn rate_for_term_years(term_years: Decimal) -> Rate {
    TREASURY_RATES
        .iter()
        .find(|(term, _)| *term >= term_years)
        .or_else(|| TREASURY_RATES.last())
        .map(|(_, rate)| *rate)
        .unwrap_or(Decimal::ZERO)
}

/// Rate of the maturity closest to a lease term given in months. Ties go to
/// the shorter maturity.
pub fn closest_rate_for_term_months(lease_term_months: u32) -> Rate {
    let target = Decimal::from(lease_term_months) / MONTHS_PER_YEAR;
    let rate = TREASURY_RATES
        .iter()
        .fold(None::<(Decimal, Rate)>, |best, (term, rate)| {
            let distance = (*term - target).abs();
            match best {
                Some((best_distance, _)) if best_distance <= distance => best,
                _ => Some((distance, *rate)),
            }
        })
        .map(|(_, rate)| rate)
        .unwrap_or(Decimal::ZERO);

    debug!(lease_term_months, rate = %rate, "treasury rate selected");
    rate
}
