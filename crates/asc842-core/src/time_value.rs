use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LeaseAccountingError;
use crate::types::{Money, PaymentTiming, Rate};
use crate::LeaseAccountingResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Nominal annual rate to per-month rate (annual / 12).
pub fn monthly_rate(annual_rate: Rate) -> Rate {
    annual_rate / MONTHS_PER_YEAR
}

/// Present value of a level annuity.
///
/// PV = P * (1 - (1 + r)^-n) / r, multiplied by (1 + r) when payments are
/// made in advance. A zero rate collapses to P * n.
pub fn present_value_of_annuity(
    payment: Money,
    periods: u32,
    rate: Rate,
    timing: PaymentTiming,
) -> LeaseAccountingResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(periods))
            .ok_or_else(|| overflow(payment, periods));
    }
    if rate <= dec!(-1) {
        return Err(LeaseAccountingError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let growth = one_plus_r.checked_powi(i64::from(periods)).ok_or_else(|| {
        LeaseAccountingError::FinancialImpossibility(format!(
            "(1 + {rate})^{periods} overflows decimal precision"
        ))
    })?;
    if growth.is_zero() {
        return Err(LeaseAccountingError::DivisionByZero {
            context: "annuity discount factor".into(),
        });
    }

    let annuity_factor = (Decimal::ONE - Decimal::ONE / growth) / rate;
    let pv = payment
        .checked_mul(annuity_factor)
        .ok_or_else(|| overflow(payment, periods))?;

    match timing {
        PaymentTiming::Advance => pv
            .checked_mul(one_plus_r)
            .ok_or_else(|| overflow(payment, periods)),
        PaymentTiming::Arrears => Ok(pv),
    }
}

fn overflow(payment: Money, periods: u32) -> LeaseAccountingError {
    LeaseAccountingError::FinancialImpossibility(format!(
        "Present value of {periods} payments of {payment} exceeds decimal range"
    ))
}
