//! Up-front input validation. Every rule is checked and all violations are
//! reported together before any computation runs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{FieldViolation, LeaseAccountingError};
use crate::types::{Money, Rate};
use crate::LeaseAccountingResult;

use super::classification::LeaseParameters;
use super::recognition::RecognitionAdjustments;
use super::remeasurement::RemeasurementInput;

/// Longest term, asset life or remaining term accepted, in months.
pub const MAX_LEASE_TERM_MONTHS: u32 = 1200;

/// Largest payment, fair value or balance accepted. Keeps every product and
/// sum over a full-length schedule inside decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Turn a list of violations into `Err(Validation)` unless it is empty.
pub fn ensure_valid(violations: Vec<FieldViolation>) -> LeaseAccountingResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(LeaseAccountingError::Validation(violations))
    }
}

pub fn validate_lease_parameters(params: &LeaseParameters) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if params.monthly_payment <= Decimal::ZERO {
        violations.push(FieldViolation::new(
            "monthly_payment",
            "Monthly payment must be positive",
        ));
    }
    check_max_amount(&mut violations, "monthly_payment", "Monthly payment", params.monthly_payment);
    check_months(&mut violations, "lease_term_months", "Lease term", params.lease_term_months);
    check_rate(&mut violations, "discount_rate", "Discount rate", params.discount_rate);

    if let Some(fv) = params.fair_value {
        if fv <= Decimal::ZERO {
            violations.push(FieldViolation::new("fair_value", "Fair value must be positive"));
        }
        check_max_amount(&mut violations, "fair_value", "Fair value", fv);
    }
    if let Some(life) = params.asset_life_months {
        check_months(&mut violations, "asset_life_months", "Asset life", life);
    }

    violations
}

pub fn validate_adjustments(adjustments: &RecognitionAdjustments) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for (field, label, value) in [
        ("prepaid_rent", "Prepaid rent", adjustments.prepaid_rent),
        ("initial_direct_costs", "Initial direct costs", adjustments.initial_direct_costs),
        ("lease_incentives", "Lease incentives", adjustments.lease_incentives),
    ] {
        check_non_negative(&mut violations, field, label, value);
        check_max_amount(&mut violations, field, label, value);
    }
    violations
}

pub fn validate_remeasurement(input: &RemeasurementInput) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if input.new_payment <= Decimal::ZERO {
        violations.push(FieldViolation::new("new_payment", "New payment must be positive"));
    }
    check_max_amount(&mut violations, "new_payment", "New payment", input.new_payment);
    check_months(&mut violations, "remaining_term", "Remaining term", input.remaining_term);
    check_rate(&mut violations, "new_rate", "New rate", input.new_rate);
    check_non_negative(
        &mut violations,
        "current_liability",
        "Current liability",
        input.current_liability,
    );
    check_max_amount(
        &mut violations,
        "current_liability",
        "Current liability",
        input.current_liability,
    );
    check_max_amount(&mut violations, "current_rou", "Current ROU asset", input.current_rou.abs());

    violations
}

fn check_months(violations: &mut Vec<FieldViolation>, field: &str, label: &str, months: u32) {
    if months == 0 {
        violations.push(FieldViolation::new(field, format!("{label} must be positive")));
    } else if months > MAX_LEASE_TERM_MONTHS {
        violations.push(FieldViolation::new(
            field,
            format!("{label} cannot exceed {MAX_LEASE_TERM_MONTHS} months"),
        ));
    }
}

fn check_max_amount(violations: &mut Vec<FieldViolation>, field: &str, label: &str, value: Money) {
    if value > MAX_AMOUNT {
        violations.push(FieldViolation::new(
            field,
            format!("{label} cannot exceed {MAX_AMOUNT}"),
        ));
    }
}

fn check_rate(violations: &mut Vec<FieldViolation>, field: &str, label: &str, rate: Rate) {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        violations.push(FieldViolation::new(
            field,
            format!("{label} must be between 0 and 1"),
        ));
    }
}

fn check_non_negative(violations: &mut Vec<FieldViolation>, field: &str, label: &str, value: Money) {
    if value < Decimal::ZERO {
        violations.push(FieldViolation::new(
            field,
            format!("{label} cannot be negative"),
        ));
    }
}
