use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// When each lease payment falls within its period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// Beginning of period (annuity due)
    #[serde(rename = "ADVANCE", alias = "Advance", alias = "advance")]
    Advance,
    /// End of period (ordinary annuity)
    #[default]
    #[serde(rename = "ARREARS", alias = "Arrears", alias = "arrears")]
    Arrears,
}

impl fmt::Display for PaymentTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTiming::Advance => f.write_str("Advance"),
            PaymentTiming::Arrears => f.write_str("Arrears"),
        }
    }
}

impl FromStr for PaymentTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADVANCE" => Ok(PaymentTiming::Advance),
            "ARREARS" => Ok(PaymentTiming::Arrears),
            other => Err(format!(
                "unknown payment timing '{other}' (expected ADVANCE or ARREARS)"
            )),
        }
    }
}

/// ASC 842 lessee classification outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaseType {
    #[default]
    #[serde(alias = "OPERATING", alias = "operating")]
    Operating,
    #[serde(alias = "FINANCE", alias = "finance")]
    Finance,
}

impl fmt::Display for LeaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseType::Operating => f.write_str("Operating"),
            LeaseType::Finance => f.write_str("Finance"),
        }
    }
}

impl FromStr for LeaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPERATING" => Ok(LeaseType::Operating),
            "FINANCE" => Ok(LeaseType::Finance),
            other => Err(format!(
                "unknown lease type '{other}' (expected OPERATING or FINANCE)"
            )),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
