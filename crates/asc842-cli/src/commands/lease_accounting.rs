use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use asc842_core::lease_accounting::amortization::{build_schedule, ScheduleRequest};
use asc842_core::lease_accounting::classification::{self, LeaseParameters};
use asc842_core::lease_accounting::fiscal::FiscalYearEnd;
use asc842_core::lease_accounting::recognition::{self, RecognitionAdjustments};
use asc842_core::lease_accounting::remeasurement::{self, RemeasurementInput};
use asc842_core::lease_accounting::unified::{self, UnifiedRequest};
use asc842_core::{LeaseType, PaymentTiming};

use crate::input;

/// Lease terms shared by every lease command
#[derive(Args)]
pub struct LeaseFlags {
    /// Level monthly payment
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Lease term in months
    #[arg(long)]
    pub lease_term_months: Option<u32>,

    /// Annual discount rate (e.g. 0.06 for 6%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Fair value of the underlying asset
    #[arg(long)]
    pub fair_value: Option<Decimal>,

    /// Remaining economic life of the asset in months
    #[arg(long)]
    pub asset_life_months: Option<u32>,

    /// Title transfers to the lessee at the end of the term
    #[arg(long)]
    pub transfer_title: bool,

    /// Lessee holds a purchase option it is reasonably certain to exercise
    #[arg(long)]
    pub bargain_purchase: bool,

    /// Asset is specialized with no alternative use to the lessor
    #[arg(long)]
    pub specialized: bool,

    /// Payment timing: advance or arrears
    #[arg(long, default_value = "arrears")]
    pub payment_timing: PaymentTiming,
}

impl LeaseFlags {
    fn to_parameters(&self) -> Result<LeaseParameters, Box<dyn std::error::Error>> {
        Ok(LeaseParameters {
            monthly_payment: self
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            lease_term_months: self
                .lease_term_months
                .ok_or("--lease-term-months is required (or provide --input)")?,
            discount_rate: self
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            fair_value: self.fair_value,
            asset_life_months: self.asset_life_months,
            has_transfer_title: self.transfer_title,
            has_bargain_purchase: self.bargain_purchase,
            is_specialized: self.specialized,
            payment_timing: self.payment_timing,
        })
    }
}

/// Amounts that move the ROU asset away from the liability
#[derive(Args)]
pub struct AdjustmentFlags {
    /// Payments made at or before commencement
    #[arg(long)]
    pub prepaid_rent: Option<Decimal>,

    /// Incremental costs of obtaining the lease
    #[arg(long)]
    pub initial_direct_costs: Option<Decimal>,

    /// Incentives received from the lessor
    #[arg(long)]
    pub lease_incentives: Option<Decimal>,
}

impl AdjustmentFlags {
    fn to_adjustments(&self) -> RecognitionAdjustments {
        RecognitionAdjustments {
            prepaid_rent: self.prepaid_rent.unwrap_or(Decimal::ZERO),
            initial_direct_costs: self.initial_direct_costs.unwrap_or(Decimal::ZERO),
            lease_incentives: self.lease_incentives.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Arguments for lease classification
#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub lease: LeaseFlags,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for initial recognition
#[derive(Args)]
pub struct InitialRecognitionArgs {
    #[command(flatten)]
    pub lease: LeaseFlags,

    #[command(flatten)]
    pub adjustments: AdjustmentFlags,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    #[command(flatten)]
    pub lease: LeaseFlags,

    #[command(flatten)]
    pub adjustments: AdjustmentFlags,

    /// Amortization policy: operating or finance
    #[arg(long, default_value = "operating")]
    pub lease_type: LeaseType,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the unified calculation
#[derive(Args)]
pub struct UnifiedArgs {
    #[command(flatten)]
    pub lease: LeaseFlags,

    #[command(flatten)]
    pub adjustments: AdjustmentFlags,

    /// Lease commencement date (YYYY-MM-DD)
    #[arg(long)]
    pub commencement_date: Option<NaiveDate>,

    /// Fiscal year end (MM/DD)
    #[arg(long, default_value = "12/31")]
    pub fiscal_year_end: FiscalYearEnd,

    /// Use the Treasury rate closest to the lease term as the discount rate
    #[arg(long)]
    pub use_treasury_rate: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for remeasurement after a modification
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RemeasureArgs {
    /// Liability carrying amount before the modification
    #[arg(long)]
    pub current_liability: Option<Decimal>,

    /// ROU asset carrying amount before the modification
    #[arg(long)]
    pub current_rou: Option<Decimal>,

    /// Revised monthly payment
    #[arg(long)]
    pub new_payment: Option<Decimal>,

    /// Months remaining after the modification
    #[arg(long)]
    pub remaining_term: Option<u32>,

    /// Revised annual discount rate
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Payment timing: advance or arrears
    #[arg(long, default_value = "arrears")]
    pub payment_timing: PaymentTiming,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct RecognitionRequest {
    #[serde(flatten)]
    lease: LeaseParameters,
    #[serde(flatten)]
    adjustments: RecognitionAdjustments,
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LeaseParameters = match input::load_request(args.input.as_deref())? {
        Some(params) => params,
        None => args.lease.to_parameters()?,
    };
    let result = classification::classify_lease(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_initial_recognition(
    args: InitialRecognitionArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RecognitionRequest = match input::load_request(args.input.as_deref())? {
        Some(request) => request,
        None => RecognitionRequest {
            lease: args.lease.to_parameters()?,
            adjustments: args.adjustments.to_adjustments(),
        },
    };
    let result = recognition::measure_initial_recognition(&request.lease, &request.adjustments)?;
    Ok(serde_json::to_value(result)?)
}

pub(crate) fn schedule_request(
    args: &AmortizationArgs,
) -> Result<ScheduleRequest, Box<dyn std::error::Error>> {
    match input::load_request(args.input.as_deref())? {
        Some(request) => Ok(request),
        None => Ok(ScheduleRequest {
            lease_type: args.lease_type,
            lease: args.lease.to_parameters()?,
            adjustments: args.adjustments.to_adjustments(),
        }),
    }
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = schedule_request(&args)?;
    let (input, schedule) = build_schedule(&request)?;
    Ok(json!({
        "lease_type": input.lease_type,
        "initial_liability": input.initial_liability,
        "initial_rou_asset": input.initial_rou_asset,
        "totals": schedule.totals,
        "schedule": schedule.rows,
    }))
}

pub(crate) fn unified_request(
    args: &UnifiedArgs,
) -> Result<UnifiedRequest, Box<dyn std::error::Error>> {
    match input::load_request(args.input.as_deref())? {
        Some(request) => Ok(request),
        None => Ok(UnifiedRequest {
            lease: args.lease.to_parameters()?,
            adjustments: args.adjustments.to_adjustments(),
            lease_commencement_date: args
                .commencement_date
                .ok_or("--commencement-date is required (or provide --input)")?,
            fiscal_year_end: args.fiscal_year_end,
            use_treasury_rate: args.use_treasury_rate,
        }),
    }
}

pub fn run_unified(args: UnifiedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = unified_request(&args)?;
    let result = unified::run_unified_calculation(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_remeasure(args: RemeasureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let remeasure_input: RemeasurementInput = match input::load_request(args.input.as_deref())? {
        Some(request) => request,
        None => RemeasurementInput {
            current_liability: args
                .current_liability
                .ok_or("--current-liability is required (or provide --input)")?,
            current_rou: args
                .current_rou
                .ok_or("--current-rou is required (or provide --input)")?,
            new_payment: args
                .new_payment
                .ok_or("--new-payment is required (or provide --input)")?,
            remaining_term: args
                .remaining_term
                .ok_or("--remaining-term is required (or provide --input)")?,
            new_rate: args
                .new_rate
                .ok_or("--new-rate is required (or provide --input)")?,
            payment_timing: args.payment_timing,
        },
    };
    let result = remeasurement::calculate_remeasurement(&remeasure_input)?;
    Ok(serde_json::to_value(result)?)
}
