//! Month-by-month amortization of the lease liability and ROU asset.
//!
//! The liability always follows the effective interest method. The ROU asset
//! follows one of two policies:
//! - Operating (ASC 842-20-25-6): a single straight-line lease cost; the ROU
//!   amortization is the plug `straight-line cost - interest`.
//! - Finance (ASC 842-20-25-5): straight-line ROU amortization with interest
//!   recognized separately, so total expense is front-loaded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseAccountingError;
use crate::time_value::monthly_rate;
use crate::types::{LeaseType, Money, PaymentTiming, Rate};
use crate::LeaseAccountingResult;

use super::classification::LeaseParameters;
use super::recognition::{measure_initial_recognition, InitialRecognition, RecognitionAdjustments};
use super::validation::{MAX_AMOUNT, MAX_LEASE_TERM_MONTHS};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the schedule needs once the lease has been measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub lease_type: LeaseType,
    pub initial_liability: Money,
    pub initial_rou_asset: Money,
    pub monthly_payment: Money,
    pub lease_term_months: u32,
    /// Annual rate; the schedule accrues at annual / 12
    pub annual_rate: Rate,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
}

impl ScheduleInput {
    pub fn from_recognition(
        lease_type: LeaseType,
        params: &LeaseParameters,
        recognition: &InitialRecognition,
    ) -> Self {
        Self {
            lease_type,
            initial_liability: recognition.lease_liability,
            initial_rou_asset: recognition.rou_asset,
            monthly_payment: params.monthly_payment,
            lease_term_months: params.lease_term_months,
            annual_rate: params.discount_rate,
            payment_timing: params.payment_timing,
        }
    }
}

/// A standalone schedule request: lease terms, ROU adjustments and the
/// policy to amortize under (operating unless stated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub lease_type: LeaseType,
    #[serde(flatten)]
    pub lease: LeaseParameters,
    #[serde(flatten)]
    pub adjustments: RecognitionAdjustments,
}

/// A single month of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed)
    pub month: u32,
    pub begin_liability: Money,
    pub begin_rou: Money,
    pub payment: Money,
    pub interest_expense: Money,
    pub principal_reduction: Money,
    pub rou_amortization: Money,
    pub total_expense: Money,
    pub end_liability: Money,
    pub end_rou: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_rou_amortization: Money,
    pub total_expense: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub lease_type: LeaseType,
    pub rows: Vec<AmortizationRow>,
    pub totals: ScheduleTotals,
}

impl AmortizationSchedule {
    pub fn final_row(&self) -> Option<&AmortizationRow> {
        self.rows.last()
    }

    /// First month whose ending ROU balance is zero, if before the final month.
    pub fn rou_exhausted_early(&self) -> Option<u32> {
        let last = self.rows.len();
        self.rows
            .iter()
            .take(last.saturating_sub(1))
            .find(|r| r.end_rou.is_zero())
            .map(|r| r.month)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the full amortization schedule in a single forward pass.
pub fn generate_amortization_schedule(
    input: &ScheduleInput,
) -> LeaseAccountingResult<AmortizationSchedule> {
    if input.lease_term_months == 0 || input.lease_term_months > MAX_LEASE_TERM_MONTHS {
        return Err(LeaseAccountingError::InvalidInput {
            field: "lease_term_months".into(),
            reason: format!("Lease term must be between 1 and {MAX_LEASE_TERM_MONTHS} months"),
        });
    }
    for (field, amount) in [
        ("monthly_payment", input.monthly_payment),
        ("initial_liability", input.initial_liability),
        ("initial_rou_asset", input.initial_rou_asset),
    ] {
        if amount.abs() > MAX_AMOUNT {
            return Err(LeaseAccountingError::InvalidInput {
                field: field.into(),
                reason: format!("Amount {amount} exceeds {MAX_AMOUNT}"),
            });
        }
    }

    let n = Decimal::from(input.lease_term_months);
    let rate = monthly_rate(input.annual_rate);
    let total_payments = input.monthly_payment.checked_mul(n).ok_or_else(|| {
        LeaseAccountingError::FinancialImpossibility(format!(
            "Total of {n} payments of {} exceeds decimal range",
            input.monthly_payment
        ))
    })?;
    // Operating leases recognize (payment x n) / n every month
    let straight_line_expense = total_payments / n;
    let finance_rou_amortization = input.initial_rou_asset / n;

    let mut rows = Vec::with_capacity(input.lease_term_months as usize);
    let mut liability = input.initial_liability;
    let mut rou = input.initial_rou_asset;

    for month in 1..=input.lease_term_months {
        let begin_liability = liability;
        let begin_rou = rou;

        let paid_at_commencement = input.payment_timing == PaymentTiming::Advance && month == 1;
        let (interest, principal) = if paid_at_commencement {
            (Decimal::ZERO, input.monthly_payment)
        } else {
            let interest = begin_liability * rate;
            (interest, input.monthly_payment - interest)
        };

        let (rou_amortization, total_expense) = match input.lease_type {
            // Plug: must follow the interest of this month
            LeaseType::Operating => (straight_line_expense - interest, straight_line_expense),
            LeaseType::Finance => {
                let amortization = finance_rou_amortization.min(begin_rou);
                (amortization, interest + amortization)
            }
        };

        liability = (begin_liability - principal).max(Decimal::ZERO);
        rou = (begin_rou - rou_amortization).max(Decimal::ZERO);

        rows.push(AmortizationRow {
            month,
            begin_liability,
            begin_rou,
            payment: input.monthly_payment,
            interest_expense: interest,
            principal_reduction: principal,
            rou_amortization,
            total_expense,
            end_liability: liability,
            end_rou: rou,
        });
    }

    let totals = ScheduleTotals {
        total_payments,
        total_interest: rows.iter().map(|r| r.interest_expense).sum(),
        total_rou_amortization: rows.iter().map(|r| r.rou_amortization).sum(),
        total_expense: rows.iter().map(|r| r.total_expense).sum(),
    };

    Ok(AmortizationSchedule {
        lease_type: input.lease_type,
        rows,
        totals,
    })
}

/// Measure the lease and generate its schedule under the requested policy.
pub fn build_schedule(
    request: &ScheduleRequest,
) -> LeaseAccountingResult<(ScheduleInput, AmortizationSchedule)> {
    let recognition = measure_initial_recognition(&request.lease, &request.adjustments)?;
    let input = ScheduleInput::from_recognition(request.lease_type, &request.lease, &recognition);
    let schedule = generate_amortization_schedule(&input)?;
    Ok((input, schedule))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::present_value_of_annuity;
    use rust_decimal_macros::dec;

    const TOLERANCE: Decimal = dec!(0.000001);

    fn schedule_input(lease_type: LeaseType, timing: PaymentTiming, annual_rate: Rate) -> ScheduleInput {
        let pv = present_value_of_annuity(dec!(5000), 60, monthly_rate(annual_rate), timing).unwrap();
        ScheduleInput {
            lease_type,
            initial_liability: pv,
            initial_rou_asset: pv,
            monthly_payment: dec!(5000),
            lease_term_months: 60,
            annual_rate,
            payment_timing: timing,
        }
    }

    #[test]
    fn test_balances_reach_zero_for_every_policy() {
        for lease_type in [LeaseType::Operating, LeaseType::Finance] {
            for timing in [PaymentTiming::Arrears, PaymentTiming::Advance] {
                let schedule =
                    generate_amortization_schedule(&schedule_input(lease_type, timing, dec!(0.05)))
                        .unwrap();
                let last = schedule.final_row().unwrap();
                assert_eq!(last.month, 60);
                assert!(last.end_liability < TOLERANCE, "{lease_type} {timing}: {}", last.end_liability);
                assert!(last.end_rou < TOLERANCE, "{lease_type} {timing}: {}", last.end_rou);
            }
        }
    }

    #[test]
    fn test_operating_expense_is_constant() {
        let schedule = generate_amortization_schedule(&schedule_input(
            LeaseType::Operating,
            PaymentTiming::Arrears,
            dec!(0.06),
        ))
        .unwrap();
        for row in &schedule.rows {
            assert_eq!(row.total_expense, dec!(5000));
            assert_eq!(row.interest_expense + row.rou_amortization, row.total_expense);
        }
    }

    #[test]
    fn test_finance_expense_is_front_loaded() {
        let schedule = generate_amortization_schedule(&schedule_input(
            LeaseType::Finance,
            PaymentTiming::Arrears,
            dec!(0.06),
        ))
        .unwrap();
        let first = &schedule.rows[0];
        let last = schedule.final_row().unwrap();
        assert!(first.total_expense > last.total_expense);
        assert_eq!(first.rou_amortization, last.rou_amortization);
    }

    #[test]
    fn test_finance_total_interest_is_payments_less_liability() {
        let input = schedule_input(LeaseType::Finance, PaymentTiming::Arrears, dec!(0.08));
        let schedule = generate_amortization_schedule(&input).unwrap();
        let expected = schedule.totals.total_payments - input.initial_liability;
        assert!((schedule.totals.total_interest - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_advance_first_month_has_no_interest() {
        let schedule = generate_amortization_schedule(&schedule_input(
            LeaseType::Operating,
            PaymentTiming::Advance,
            dec!(0.05),
        ))
        .unwrap();
        let first = &schedule.rows[0];
        assert_eq!(first.interest_expense, Decimal::ZERO);
        assert_eq!(first.principal_reduction, dec!(5000));
        assert_eq!(first.rou_amortization, dec!(5000));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let schedule = generate_amortization_schedule(&schedule_input(
            LeaseType::Finance,
            PaymentTiming::Arrears,
            Decimal::ZERO,
        ))
        .unwrap();
        assert_eq!(schedule.totals.total_interest, Decimal::ZERO);
        for row in &schedule.rows {
            assert_eq!(row.principal_reduction, dec!(5000));
            assert_eq!(row.rou_amortization, dec!(5000));
        }
        assert_eq!(schedule.final_row().unwrap().end_liability, Decimal::ZERO);
    }

    #[test]
    fn test_finance_amortization_never_exceeds_balance() {
        let mut input = schedule_input(LeaseType::Finance, PaymentTiming::Arrears, dec!(0.05));
        input.initial_rou_asset = dec!(100.005);
        input.lease_term_months = 3;
        let schedule = generate_amortization_schedule(&input).unwrap();
        let total: Money = schedule.rows.iter().map(|r| r.rou_amortization).sum();
        assert!(total <= dec!(100.005));
        assert!(schedule.rows.iter().all(|r| r.end_rou >= Decimal::ZERO));
    }

    #[test]
    fn test_operating_rou_exhausts_early_with_incentives() {
        let mut input = schedule_input(LeaseType::Operating, PaymentTiming::Arrears, dec!(0.05));
        input.initial_rou_asset -= dec!(50000);
        let schedule = generate_amortization_schedule(&input).unwrap();
        assert!(schedule.rou_exhausted_early().is_some());
        assert_eq!(schedule.final_row().unwrap().end_rou, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_request_defaults_to_operating() {
        let request: ScheduleRequest = serde_json::from_str(
            r#"{"monthly_payment": "500", "lease_term_months": 12, "discount_rate": "0.04",
                "lease_incentives": "100"}"#,
        )
        .unwrap();
        assert_eq!(request.lease_type, LeaseType::Operating);
        let (input, schedule) = build_schedule(&request).unwrap();
        assert_eq!(input.initial_rou_asset, input.initial_liability - dec!(100));
        assert_eq!(schedule.rows.len(), 12);
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut input = schedule_input(LeaseType::Finance, PaymentTiming::Arrears, dec!(0.05));
        input.lease_term_months = 0;
        assert!(generate_amortization_schedule(&input).is_err());
    }

    #[test]
    fn test_oversized_term_is_rejected_before_allocating() {
        let request = ScheduleRequest {
            lease_type: LeaseType::Operating,
            lease: LeaseParameters::new(dec!(1), u32::MAX, Decimal::ZERO),
            adjustments: RecognitionAdjustments::default(),
        };
        let err = build_schedule(&request).unwrap_err();
        assert_eq!(
            err.violation_messages(),
            vec!["Lease term cannot exceed 1200 months"]
        );

        let mut input = schedule_input(LeaseType::Operating, PaymentTiming::Arrears, Decimal::ZERO);
        input.lease_term_months = MAX_LEASE_TERM_MONTHS + 1;
        let err = generate_amortization_schedule(&input).unwrap_err();
        assert!(matches!(err, LeaseAccountingError::InvalidInput { ref field, .. } if field == "lease_term_months"));
    }

    #[test]
    fn test_oversized_payment_returns_error() {
        let huge = dec!(10000000000000000000000000000);
        let request = ScheduleRequest {
            lease_type: LeaseType::Finance,
            lease: LeaseParameters::new(huge, 12, dec!(0.05)),
            adjustments: RecognitionAdjustments::default(),
        };
        assert!(build_schedule(&request).unwrap_err().is_validation());

        let mut input = schedule_input(LeaseType::Finance, PaymentTiming::Arrears, dec!(0.05));
        input.monthly_payment = huge;
        let err = generate_amortization_schedule(&input).unwrap_err();
        assert!(matches!(err, LeaseAccountingError::InvalidInput { ref field, .. } if field == "monthly_payment"));
    }

    #[test]
    fn test_longest_accepted_term() {
        let request = ScheduleRequest {
            lease_type: LeaseType::Finance,
            lease: LeaseParameters::new(MAX_AMOUNT, MAX_LEASE_TERM_MONTHS, dec!(0.05)),
            adjustments: RecognitionAdjustments::default(),
        };
        let (_, schedule) = build_schedule(&request).unwrap();
        assert_eq!(schedule.rows.len(), 1200);
        assert_eq!(schedule.totals.total_payments, MAX_AMOUNT * dec!(1200));
    }
}
