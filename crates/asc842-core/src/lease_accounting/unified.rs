//! End-to-end lessee calculation: classify, measure, amortize, journalize and
//! roll the schedule up by fiscal year in one call.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::format_percentage;
use crate::types::{with_metadata, ComputationOutput, LeaseType, Money, Rate};
use crate::LeaseAccountingResult;

use super::amortization::{
    generate_amortization_schedule, AmortizationRow, AmortizationSchedule, ScheduleInput,
};
use super::classification::{classify_lease, ClassificationResult, LeaseParameters};
use super::fiscal::{summarize_by_fiscal_year, FiscalYearEnd, FiscalYearSummary};
use super::journal::{generate_journal_entries, period_date, JournalEntries};
use super::recognition::{calculate_initial_recognition, InitialRecognition, RecognitionAdjustments};
use super::treasury::closest_rate_for_term_months;
use super::validation;

/// Leases of twelve months or less qualify for the short-term exemption
/// (ASC 842-20-25-2).
pub const SHORT_TERM_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedRequest {
    #[serde(flatten)]
    pub lease: LeaseParameters,
    #[serde(flatten)]
    pub adjustments: RecognitionAdjustments,
    /// Commencement date, `YYYY-MM-DD`
    pub lease_commencement_date: NaiveDate,
    #[serde(default)]
    pub fiscal_year_end: FiscalYearEnd,
    /// Replace the discount rate with the closest-maturity Treasury rate
    #[serde(default)]
    pub use_treasury_rate: bool,
}

impl UnifiedRequest {
    pub fn new(lease: LeaseParameters, lease_commencement_date: NaiveDate) -> Self {
        Self {
            lease,
            adjustments: RecognitionAdjustments::default(),
            lease_commencement_date,
            fiscal_year_end: FiscalYearEnd::default(),
            use_treasury_rate: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouAssetMovement {
    pub beginning: Money,
    pub amortization: Money,
    pub ending: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityMovement {
    pub beginning: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending: Money,
}

/// One schedule month grouped by balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRowView {
    pub month: u32,
    pub rou_asset: RouAssetMovement,
    pub liability: LiabilityMovement,
    pub payment: Money,
    pub total_expense: Money,
}

impl From<&AmortizationRow> for ScheduleRowView {
    fn from(row: &AmortizationRow) -> Self {
        Self {
            month: row.month,
            rou_asset: RouAssetMovement {
                beginning: row.begin_rou,
                amortization: row.rou_amortization,
                ending: row.end_rou,
            },
            liability: LiabilityMovement {
                beginning: row.begin_liability,
                interest: row.interest_expense,
                principal: row.principal_reduction,
                ending: row.end_liability,
            },
            payment: row.payment,
            total_expense: row.total_expense,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedSummary {
    pub total_payments: Money,
    pub total_interest: Money,
    /// Annual discount rate actually applied
    pub effective_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedOutput {
    pub classification: ClassificationResult,
    pub initial_recognition: InitialRecognition,
    pub amortization_schedule: Vec<ScheduleRowView>,
    pub journal_entries: JournalEntries,
    pub summary: UnifiedSummary,
    pub fiscal_years: Vec<FiscalYearSummary>,
}

impl UnifiedOutput {
    pub fn lease_type(&self) -> LeaseType {
        self.classification.lease_type
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every lessee calculation for one lease.
///
/// All inputs are validated before anything is computed. The liability is
/// the PV used by the classification tests, so both always agree.
pub fn run_unified_calculation(
    request: &UnifiedRequest,
) -> LeaseAccountingResult<ComputationOutput<UnifiedOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut params = request.lease.clone();
    if request.use_treasury_rate {
        let rate = closest_rate_for_term_months(params.lease_term_months);
        warnings.push(format!(
            "Risk-free rate practical expedient applied: discount rate {} replaced with Treasury rate {}",
            format_percentage(params.discount_rate),
            format_percentage(rate)
        ));
        params.discount_rate = rate;
    }

    let mut violations = validation::validate_lease_parameters(&params);
    violations.extend(validation::validate_adjustments(&request.adjustments));
    validation::ensure_valid(violations)?;

    let classification = classify_lease(&params)?;
    let recognition = calculate_initial_recognition(
        classification.calculations.pv_lease_payments,
        &request.adjustments,
    );

    let schedule_input =
        ScheduleInput::from_recognition(classification.lease_type, &params, &recognition);
    let schedule = generate_amortization_schedule(&schedule_input)?;
    let journal_entries =
        generate_journal_entries(&schedule_input, &schedule, request.lease_commencement_date)?;

    let period_dates = schedule
        .rows
        .iter()
        .map(|row| period_date(request.lease_commencement_date, row.month))
        .collect::<LeaseAccountingResult<Vec<_>>>()?;
    let fiscal_years =
        summarize_by_fiscal_year(&schedule.rows, &period_dates, request.fiscal_year_end)?;

    collect_warnings(&params, &schedule, &mut warnings);

    debug!(
        lease_type = %classification.lease_type,
        liability = %recognition.lease_liability,
        rou_asset = %recognition.rou_asset,
        months = schedule.rows.len(),
        fiscal_years = fiscal_years.len(),
        "unified lease calculation complete"
    );

    let output = UnifiedOutput {
        summary: UnifiedSummary {
            total_payments: schedule.totals.total_payments,
            total_interest: schedule.totals.total_interest,
            effective_rate: params.discount_rate,
        },
        amortization_schedule: schedule.rows.iter().map(ScheduleRowView::from).collect(),
        classification,
        initial_recognition: recognition,
        journal_entries,
        fiscal_years,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "ASC 842 lessee accounting (classification, initial measurement, amortization, journal entries)",
        request,
        warnings,
        elapsed,
        output,
    ))
}

fn collect_warnings(
    params: &LeaseParameters,
    schedule: &AmortizationSchedule,
    warnings: &mut Vec<String>,
) {
    if params.lease_term_months <= SHORT_TERM_MONTHS {
        warnings.push(format!(
            "Lease term of {} months may qualify for the short-term lease exemption",
            params.lease_term_months
        ));
    }
    if let Some(month) = schedule.rou_exhausted_early() {
        warnings.push(format!(
            "ROU asset fully amortized in month {month}, before the end of the lease term"
        ));
    }
    if params.discount_rate == Decimal::ZERO {
        warnings.push("Zero discount rate: liability equals undiscounted payments".to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn commencement() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn equipment_lease() -> UnifiedRequest {
        UnifiedRequest::new(
            LeaseParameters {
                fair_value: Some(dec!(50000)),
                asset_life_months: Some(60),
                ..LeaseParameters::new(dec!(1000), 60, dec!(0.05))
            },
            commencement(),
        )
    }

    #[test]
    fn test_finance_lease_end_to_end() {
        let out = run_unified_calculation(&equipment_lease()).unwrap().result;
        assert_eq!(out.lease_type(), LeaseType::Finance);
        assert_eq!(out.amortization_schedule.len(), 60);
        assert_eq!(out.journal_entries.periodic.len(), 60);
        assert_eq!(
            out.initial_recognition.lease_liability,
            out.classification.calculations.pv_lease_payments
        );
        assert_eq!(out.summary.total_payments, dec!(60000));
        assert_eq!(out.summary.effective_rate, dec!(0.05));
        assert!(out.journal_entries.all().all(|e| e.is_balanced()));
    }

    #[test]
    fn test_fiscal_years_cover_every_month() {
        let mut request = equipment_lease();
        request.fiscal_year_end = "06/30".parse().unwrap();
        let out = run_unified_calculation(&request).unwrap().result;
        // Jan 2024 .. Dec 2028 against a June year end: FY2024 .. FY2029
        assert_eq!(out.fiscal_years.len(), 6);
        assert_eq!(out.fiscal_years[0].fiscal_year, 2024);
        assert_eq!(out.fiscal_years[0].months, 6);
        let months: u32 = out.fiscal_years.iter().map(|fy| fy.months).sum();
        assert_eq!(months, 60);
    }

    #[test]
    fn test_treasury_rate_replaces_discount_rate() {
        let mut request = equipment_lease();
        request.use_treasury_rate = true;
        let output = run_unified_calculation(&request).unwrap();
        assert_eq!(output.result.summary.effective_rate, dec!(0.0435));
        assert!(output.warnings.iter().any(|w| w.contains("Treasury rate 4.35%")));
    }

    #[test]
    fn test_short_term_warning() {
        let request = UnifiedRequest::new(
            LeaseParameters::new(dec!(1000), 12, dec!(0.06)),
            commencement(),
        );
        let output = run_unified_calculation(&request).unwrap();
        assert_eq!(output.result.lease_type(), LeaseType::Operating);
        assert!(output.warnings.iter().any(|w| w.contains("short-term")));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut request = equipment_lease();
        request.lease.monthly_payment = dec!(-5);
        request.adjustments.prepaid_rent = dec!(-1);
        let err = run_unified_calculation(&request).unwrap_err();
        assert_eq!(
            err.violation_messages(),
            vec!["Monthly payment must be positive", "Prepaid rent cannot be negative"]
        );
    }

    #[test]
    fn test_request_deserializes_flat_json() {
        let json = r#"{
            "monthly_payment": "1000",
            "lease_term_months": 36,
            "discount_rate": 0.06,
            "payment_timing": "ADVANCE",
            "prepaid_rent": 500,
            "lease_commencement_date": "2024-03-15",
            "fiscal_year_end": "09/30"
        }"#;
        let request: UnifiedRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.lease.lease_term_months, 36);
        assert_eq!(request.adjustments.prepaid_rent, dec!(500));
        assert_eq!(request.fiscal_year_end.month(), 9);
        assert!(!request.use_treasury_rate);

        let out = run_unified_calculation(&request).unwrap().result;
        assert_eq!(
            out.initial_recognition.rou_asset,
            out.initial_recognition.lease_liability + dec!(500)
        );
    }
}
