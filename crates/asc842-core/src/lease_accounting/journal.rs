//! Double-entry journal entries for commencement and each monthly period.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseAccountingError;
use crate::format::format_currency;
use crate::types::{LeaseType, Money, PaymentTiming};
use crate::LeaseAccountingResult;

use super::amortization::{AmortizationRow, AmortizationSchedule, ScheduleInput};

pub const ACCOUNT_ROU_ASSET: &str = "ROU Asset";
pub const ACCOUNT_LEASE_LIABILITY: &str = "Lease Liability";
pub const ACCOUNT_CASH: &str = "Cash";
pub const ACCOUNT_INTEREST_EXPENSE: &str = "Interest Expense";
pub const ACCOUNT_AMORTIZATION_EXPENSE: &str = "Amortization Expense";

const BALANCE_TOLERANCE: Decimal = dec!(0.000001);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account: String,
    pub debit: Money,
    pub credit: Money,
}

impl JournalLine {
    pub fn debit(account: impl Into<String>, amount: Money) -> Self {
        Self {
            account: account.into(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(account: impl Into<String>, amount: Money) -> Self {
        Self {
            account: account.into(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub description: String,
    pub entries: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn total_debits(&self) -> Money {
        self.entries.iter().map(|l| l.debit).sum()
    }

    pub fn total_credits(&self) -> Money {
        self.entries.iter().map(|l| l.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total_debits() - self.total_credits()).abs() < BALANCE_TOLERANCE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntries {
    pub initial: Vec<JournalEntry>,
    pub periodic: Vec<JournalEntry>,
}

impl JournalEntries {
    pub fn all(&self) -> impl Iterator<Item = &JournalEntry> {
        self.initial.iter().chain(self.periodic.iter())
    }
}

/// Date of month `month` (1-indexed): commencement plus `month - 1` calendar
/// months, clamped to month end.
pub fn period_date(commencement: NaiveDate, month: u32) -> LeaseAccountingResult<NaiveDate> {
    commencement
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .ok_or_else(|| {
            LeaseAccountingError::DateError(format!(
                "Month {month} after {commencement} is out of range"
            ))
        })
}

/// Build the commencement entry and one entry per schedule row.
pub fn generate_journal_entries(
    input: &ScheduleInput,
    schedule: &AmortizationSchedule,
    commencement: NaiveDate,
) -> LeaseAccountingResult<JournalEntries> {
    let initial = vec![initial_entry(input, commencement)];

    let periodic = schedule
        .rows
        .iter()
        .map(|row| periodic_entry(schedule.lease_type, input.payment_timing, row, commencement))
        .collect::<LeaseAccountingResult<Vec<_>>>()?;

    Ok(JournalEntries { initial, periodic })
}

fn initial_entry(input: &ScheduleInput, commencement: NaiveDate) -> JournalEntry {
    let mut lines = vec![
        JournalLine::debit(ACCOUNT_ROU_ASSET, input.initial_rou_asset),
        JournalLine::credit(ACCOUNT_LEASE_LIABILITY, input.initial_liability),
    ];

    // Prepaid rent, direct costs and incentives settle through cash
    let excess = input.initial_rou_asset - input.initial_liability;
    if excess > Decimal::ZERO {
        lines.push(JournalLine::credit(ACCOUNT_CASH, excess));
    } else if excess < Decimal::ZERO {
        lines.push(JournalLine::debit(ACCOUNT_CASH, -excess));
    }

    if input.payment_timing == PaymentTiming::Advance {
        lines.push(JournalLine::debit(ACCOUNT_LEASE_LIABILITY, input.monthly_payment));
        lines.push(JournalLine::credit(ACCOUNT_CASH, input.monthly_payment));
    }

    JournalEntry {
        date: commencement,
        month: None,
        description: "Initial recognition of lease".to_string(),
        entries: lines,
    }
}

fn periodic_entry(
    lease_type: LeaseType,
    timing: PaymentTiming,
    row: &AmortizationRow,
    commencement: NaiveDate,
) -> LeaseAccountingResult<JournalEntry> {
    let mut date = period_date(commencement, row.month)?;
    if timing == PaymentTiming::Advance && row.month > 1 {
        date = date.with_day(1).ok_or_else(|| {
            LeaseAccountingError::DateError(format!("No first day of month for {date}"))
        })?;
    }

    let entries = match lease_type {
        LeaseType::Operating => vec![
            JournalLine::debit(
                format!(
                    "Lease Expense (Interest {} + ROU Amort {})",
                    format_currency(row.interest_expense),
                    format_currency(row.rou_amortization)
                ),
                row.total_expense,
            ),
            JournalLine::credit(ACCOUNT_CASH, row.payment),
            JournalLine::debit(ACCOUNT_LEASE_LIABILITY, row.principal_reduction),
            JournalLine::credit(ACCOUNT_ROU_ASSET, row.rou_amortization),
        ],
        LeaseType::Finance => vec![
            JournalLine::debit(ACCOUNT_INTEREST_EXPENSE, row.interest_expense),
            JournalLine::debit(ACCOUNT_AMORTIZATION_EXPENSE, row.rou_amortization),
            JournalLine::credit(ACCOUNT_CASH, row.payment),
            JournalLine::debit(ACCOUNT_LEASE_LIABILITY, row.principal_reduction),
            JournalLine::credit(ACCOUNT_ROU_ASSET, row.rou_amortization),
        ],
    };

    Ok(JournalEntry {
        date,
        month: Some(row.month),
        description: format!("Lease payment - Month {}", row.month),
        entries,
    })
}
