//! Lease modification remeasurement (ASC 842-20-35-4).
//!
//! The liability is re-measured at the PV of the revised payments over the
//! remaining term. The change is taken against the ROU asset; if the asset
//! would go negative it is clamped to zero and the excess is a gain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time_value::{monthly_rate, present_value_of_annuity};
use crate::types::{Money, PaymentTiming, Rate};
use crate::LeaseAccountingResult;

use super::validation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemeasurementInput {
    /// Carrying amount of the liability immediately before the modification
    pub current_liability: Money,
    /// Carrying amount of the ROU asset immediately before the modification
    pub current_rou: Money,
    /// Revised monthly payment
    pub new_payment: Money,
    /// Months remaining after the modification
    pub remaining_term: u32,
    /// Revised annual discount rate
    pub new_rate: Rate,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemeasurementResult {
    pub old_liability: Money,
    pub new_liability: Money,
    pub liability_adjustment: Money,
    pub old_rou: Money,
    pub new_rou: Money,
    /// Gain recognized when a liability decrease exceeds the ROU balance
    pub gain_loss: Money,
}

impl RemeasurementResult {
    pub fn is_increase(&self) -> bool {
        self.liability_adjustment > Decimal::ZERO
    }
}

pub fn calculate_remeasurement(
    input: &RemeasurementInput,
) -> LeaseAccountingResult<RemeasurementResult> {
    validation::ensure_valid(validation::validate_remeasurement(input))?;

    let new_liability = present_value_of_annuity(
        input.new_payment,
        input.remaining_term,
        monthly_rate(input.new_rate),
        input.payment_timing,
    )?;
    let adjustment = new_liability - input.current_liability;
    let adjusted_rou = input.current_rou + adjustment;

    let (new_rou, gain_loss) = if adjusted_rou < Decimal::ZERO {
        (Decimal::ZERO, -adjusted_rou)
    } else {
        (adjusted_rou, Decimal::ZERO)
    };

    debug!(
        old_liability = %input.current_liability,
        new_liability = %new_liability,
        adjustment = %adjustment,
        gain = %gain_loss,
        "lease remeasured"
    );

    Ok(RemeasurementResult {
        old_liability: input.current_liability,
        new_liability,
        liability_adjustment: adjustment,
        old_rou: input.current_rou,
        new_rou,
        gain_loss,
    })
}
