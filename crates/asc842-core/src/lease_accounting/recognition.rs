//! Initial measurement of the lease liability and right-of-use asset
//! (ASC 842-20-30-1 and 30-5).

use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::LeaseAccountingResult;

use super::classification::LeaseParameters;
use super::validation;

/// Amounts that adjust the ROU asset away from the lease liability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionAdjustments {
    /// Lease payments made at or before commencement
    #[serde(default)]
    pub prepaid_rent: Money,
    /// Incremental costs of obtaining the lease
    #[serde(default)]
    pub initial_direct_costs: Money,
    /// Incentives received from the lessor
    #[serde(default)]
    pub lease_incentives: Money,
}

/// Build-up of the ROU asset. Incentives are shown as a negative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionComponents {
    pub lease_liability: Money,
    pub prepaid_rent: Money,
    pub initial_direct_costs: Money,
    pub lease_incentives: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialRecognition {
    pub lease_liability: Money,
    pub rou_asset: Money,
    pub components: RecognitionComponents,
}

/// ROU asset = liability + prepaid rent + initial direct costs - incentives.
pub fn calculate_initial_recognition(
    lease_liability: Money,
    adjustments: &RecognitionAdjustments,
) -> InitialRecognition {
    let rou_asset = lease_liability + adjustments.prepaid_rent + adjustments.initial_direct_costs
        - adjustments.lease_incentives;

    InitialRecognition {
        lease_liability,
        rou_asset,
        components: RecognitionComponents {
            lease_liability,
            prepaid_rent: adjustments.prepaid_rent,
            initial_direct_costs: adjustments.initial_direct_costs,
            lease_incentives: -adjustments.lease_incentives,
        },
    }
}

/// Measure the liability as the PV of the payments, then build the ROU asset.
pub fn measure_initial_recognition(
    params: &LeaseParameters,
    adjustments: &RecognitionAdjustments,
) -> LeaseAccountingResult<InitialRecognition> {
    let mut violations = validation::validate_lease_parameters(params);
    violations.extend(validation::validate_adjustments(adjustments));
    validation::ensure_valid(violations)?;

    let liability = params.present_value()?;
    Ok(calculate_initial_recognition(liability, adjustments))
}
