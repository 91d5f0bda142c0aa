//! ASC 842 lessee lease classification.
//!
//! Runs the five ASC 842-10-25-2 criteria against a set of lease parameters.
//! Meeting any one of them makes the lease a finance lease; otherwise it is
//! an operating lease. The present value test discounts the payment stream
//! with [`present_value_of_annuity`] at the monthly rate (annual / 12).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseAccountingError;
use crate::time_value::{monthly_rate, present_value_of_annuity};
use crate::types::{LeaseType, Money, PaymentTiming, Rate};
use crate::LeaseAccountingResult;

use super::validation;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lease term test: "major part" of remaining economic life (ASC 842-10-55-2).
pub const MAJOR_PART_THRESHOLD: Rate = dec!(0.75);
/// Present value test: "substantially all" of fair value (ASC 842-10-55-2).
pub const SUBSTANTIALLY_ALL_THRESHOLD: Rate = dec!(0.90);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Core lease terms shared by every calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseParameters {
    /// Level monthly lease payment
    pub monthly_payment: Money,
    /// Lease term in months
    pub lease_term_months: u32,
    /// Annual discount rate (IBR, implicit rate or risk-free rate)
    pub discount_rate: Rate,
    /// Fair value of the underlying asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair_value: Option<Money>,
    /// Remaining economic life of the underlying asset in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_life_months: Option<u32>,
    /// Title transfers to the lessee at the end of the term
    #[serde(default)]
    pub has_transfer_title: bool,
    /// Purchase option the lessee is reasonably certain to exercise
    #[serde(default)]
    pub has_bargain_purchase: bool,
    /// Asset is specialized with no alternative use to the lessor
    #[serde(default)]
    pub is_specialized: bool,
    /// Payment timing within each month
    #[serde(default)]
    pub payment_timing: PaymentTiming,
}

impl LeaseParameters {
    /// Minimal parameter set; optional terms absent, flags false, arrears.
    pub fn new(monthly_payment: Money, lease_term_months: u32, discount_rate: Rate) -> Self {
        Self {
            monthly_payment,
            lease_term_months,
            discount_rate,
            fair_value: None,
            asset_life_months: None,
            has_transfer_title: false,
            has_bargain_purchase: false,
            is_specialized: false,
            payment_timing: PaymentTiming::Arrears,
        }
    }

    /// PV of the payment stream at the monthly discount rate.
    pub fn present_value(&self) -> LeaseAccountingResult<Money> {
        present_value_of_annuity(
            self.monthly_payment,
            self.lease_term_months,
            monthly_rate(self.discount_rate),
            self.payment_timing,
        )
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The measured value behind a test: the flag itself, or a ratio that is
/// absent when the supporting input was not supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestValue {
    Flag(bool),
    Ratio(Option<Rate>),
}

/// Outcome of a single classification criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTest {
    pub met: bool,
    pub value: TestValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Rate>,
}

impl ClassificationTest {
    fn flag(met: bool) -> Self {
        Self {
            met,
            value: TestValue::Flag(met),
            threshold: None,
        }
    }

    fn ratio(ratio: Option<Rate>, threshold: Rate) -> Self {
        Self {
            met: ratio.is_some_and(|r| r >= threshold),
            value: TestValue::Ratio(ratio),
            threshold: Some(threshold),
        }
    }
}

/// The five ASC 842 criteria, in standard order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTests {
    pub transfer_ownership: ClassificationTest,
    pub bargain_purchase: ClassificationTest,
    pub lease_term: ClassificationTest,
    pub present_value: ClassificationTest,
    pub specialized_asset: ClassificationTest,
}

impl ClassificationTests {
    /// Tests paired with their serialized names, in standard order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ClassificationTest)> {
        [
            ("transfer_ownership", &self.transfer_ownership),
            ("bargain_purchase", &self.bargain_purchase),
            ("lease_term", &self.lease_term),
            ("present_value", &self.present_value),
            ("specialized_asset", &self.specialized_asset),
        ]
        .into_iter()
    }

    pub fn any_met(&self) -> bool {
        self.iter().any(|(_, t)| t.met)
    }
}

/// Supporting figures for the quantitative tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCalculations {
    pub pv_lease_payments: Money,
    pub lease_term_percentage: Option<Rate>,
    pub pv_percentage: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub lease_type: LeaseType,
    pub tests: ClassificationTests,
    pub calculations: ClassificationCalculations,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify a lease as finance or operating under ASC 842.
///
/// The lease term test is skipped (not met, ratio absent) when no asset life
/// is supplied, and the present value test likewise when no fair value is
/// supplied.
pub fn classify_lease(params: &LeaseParameters) -> LeaseAccountingResult<ClassificationResult> {
    validation::ensure_valid(validation::validate_lease_parameters(params))?;

    let pv_payments = params.present_value()?;

    let lease_term_pct = params
        .asset_life_months
        .filter(|life| *life > 0)
        .map(|life| Decimal::from(params.lease_term_months) / Decimal::from(life));

    let pv_pct = params
        .fair_value
        .filter(|fv| *fv > Decimal::ZERO)
        .map(|fv| {
            pv_payments.checked_div(fv).ok_or_else(|| {
                LeaseAccountingError::FinancialImpossibility(format!(
                    "PV of payments {pv_payments} is out of range against fair value {fv}"
                ))
            })
        })
        .transpose()?;

    let tests = ClassificationTests {
        transfer_ownership: ClassificationTest::flag(params.has_transfer_title),
        bargain_purchase: ClassificationTest::flag(params.has_bargain_purchase),
        lease_term: ClassificationTest::ratio(lease_term_pct, MAJOR_PART_THRESHOLD),
        present_value: ClassificationTest::ratio(pv_pct, SUBSTANTIALLY_ALL_THRESHOLD),
        specialized_asset: ClassificationTest::flag(params.is_specialized),
    };

    let lease_type = if tests.any_met() {
        LeaseType::Finance
    } else {
        LeaseType::Operating
    };

    Ok(ClassificationResult {
        lease_type,
        tests,
        calculations: ClassificationCalculations {
            pv_lease_payments: pv_payments,
            lease_term_percentage: lease_term_pct,
            pv_percentage: pv_pct,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaseAccountingError;
    use rust_decimal_macros::dec;

    /// Helper: five-year office lease that trips none of the criteria
    fn office_lease() -> LeaseParameters {
        LeaseParameters {
            fair_value: Some(dec!(1000000)),
            asset_life_months: Some(240),
            ..LeaseParameters::new(dec!(10000), 60, dec!(0.06))
        }
    }

    #[test]
    fn test_operating_when_no_criteria_met() {
        let result = classify_lease(&office_lease()).unwrap();
        assert_eq!(result.lease_type, LeaseType::Operating);
        assert!(!result.tests.any_met());
        assert_eq!(result.calculations.lease_term_percentage, Some(dec!(0.25)));
    }

    #[test]
    fn test_finance_via_transfer_of_title() {
        let mut params = office_lease();
        params.has_transfer_title = true;
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Finance);
        assert!(result.tests.transfer_ownership.met);
        assert_eq!(result.tests.transfer_ownership.value, TestValue::Flag(true));
    }

    #[test]
    fn test_finance_via_bargain_purchase() {
        let mut params = office_lease();
        params.has_bargain_purchase = true;
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Finance);
        assert!(result.tests.bargain_purchase.met);
    }

    #[test]
    fn test_finance_via_specialized_asset() {
        let mut params = office_lease();
        params.is_specialized = true;
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Finance);
        assert!(result.tests.specialized_asset.met);
    }

    #[test]
    fn test_lease_term_test_at_full_life() {
        let params = LeaseParameters {
            fair_value: Some(dec!(50000)),
            asset_life_months: Some(60),
            ..LeaseParameters::new(dec!(1000), 60, dec!(0.05))
        };
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Finance);
        assert_eq!(result.calculations.lease_term_percentage, Some(Decimal::ONE));
        assert!(result.tests.lease_term.met);
        assert_eq!(result.tests.lease_term.threshold, Some(MAJOR_PART_THRESHOLD));
    }

    #[test]
    fn test_lease_term_threshold_is_inclusive() {
        let params = LeaseParameters {
            asset_life_months: Some(80),
            ..LeaseParameters::new(dec!(1000), 60, dec!(0.05))
        };
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.calculations.lease_term_percentage, Some(dec!(0.75)));
        assert!(result.tests.lease_term.met);
    }

    #[test]
    fn test_present_value_test_triggers_finance() {
        let mut params = office_lease();
        // PV of 60 x 10,000 at 6% is ~517k; 517k / 550k > 90%
        params.fair_value = Some(dec!(550000));
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Finance);
        assert!(result.tests.present_value.met);
        assert!(result.calculations.pv_percentage.unwrap() >= SUBSTANTIALLY_ALL_THRESHOLD);
    }

    #[test]
    fn test_missing_optional_inputs_skip_quantitative_tests() {
        let params = LeaseParameters::new(dec!(1000), 36, dec!(0.05));
        let result = classify_lease(&params).unwrap();
        assert_eq!(result.lease_type, LeaseType::Operating);
        assert_eq!(result.tests.lease_term.value, TestValue::Ratio(None));
        assert_eq!(result.tests.present_value.value, TestValue::Ratio(None));
        assert!(result.calculations.pv_percentage.is_none());
        assert!(result.calculations.pv_lease_payments > Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_amounts_return_errors() {
        let params = LeaseParameters::new(dec!(10000000000000000000000000000), 12, Decimal::ZERO);
        let err = classify_lease(&params).unwrap_err();
        assert_eq!(
            err.violation_messages(),
            vec!["Monthly payment cannot exceed 1000000000000000"]
        );

        // Largest accepted lease against a vanishing fair value
        let params = LeaseParameters {
            fair_value: Some(dec!(0.0000000000000000000001)),
            ..LeaseParameters::new(validation::MAX_AMOUNT, validation::MAX_LEASE_TERM_MONTHS, Decimal::ZERO)
        };
        let err = classify_lease(&params).unwrap_err();
        assert!(matches!(err, LeaseAccountingError::FinancialImpossibility(_)), "{err}");
    }

    #[test]
    fn test_zero_asset_life_is_rejected() {
        let params = LeaseParameters {
            asset_life_months: Some(0),
            ..LeaseParameters::new(dec!(1000), 36, dec!(0.05))
        };
        let err = classify_lease(&params).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_collects_every_violation() {
        let params = LeaseParameters::new(dec!(-5), 0, dec!(1.5));
        match classify_lease(&params) {
            Err(LeaseAccountingError::Validation(violations)) => {
                assert_eq!(violations.len(), 3);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_classification_is_finance_iff_any_test_met() {
        for mask in 0u8..8 {
            let params = LeaseParameters {
                has_transfer_title: mask & 1 != 0,
                has_bargain_purchase: mask & 2 != 0,
                is_specialized: mask & 4 != 0,
                ..office_lease()
            };
            let result = classify_lease(&params).unwrap();
            let expected = if mask == 0 {
                LeaseType::Operating
            } else {
                LeaseType::Finance
            };
            assert_eq!(result.lease_type, expected, "mask {mask}");
        }
    }
}
