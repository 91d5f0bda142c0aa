//! Fiscal year handling and the per-fiscal-year rollup of a schedule.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LeaseAccountingError;
use crate::types::Money;
use crate::LeaseAccountingResult;

use super::amortization::AmortizationRow;

/// Fiscal year end as month/day, written `MM/DD` (default `12/31`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYearEnd {
    month: u32,
    day: u32,
}

impl FiscalYearEnd {
    pub fn new(month: u32, day: u32) -> LeaseAccountingResult<Self> {
        // 2000 is a leap year, so 02/29 is accepted.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(LeaseAccountingError::DateError(format!(
                "Fiscal year end {month:02}/{day:02} is not a valid month/day"
            )));
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The fiscal year a date falls in, labelled by the calendar year in
    /// which that fiscal year ends.
    pub fn fiscal_year_of(&self, date: NaiveDate) -> i32 {
        if (date.month(), date.day()) <= (self.month, self.day) {
            date.year()
        } else {
            date.year() + 1
        }
    }
}

impl Default for FiscalYearEnd {
    fn default() -> Self {
        Self { month: 12, day: 31 }
    }
}

impl fmt::Display for FiscalYearEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

impl FromStr for FiscalYearEnd {
    type Err = LeaseAccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            LeaseAccountingError::DateError(format!(
                "Fiscal year end '{s}' must be in MM/DD format"
            ))
        };
        let (m, d) = s.trim().split_once('/').ok_or_else(invalid)?;
        let month = m.trim().parse::<u32>().map_err(|_| invalid())?;
        let day = d.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(month, day)
    }
}

impl TryFrom<String> for FiscalYearEnd {
    type Error = LeaseAccountingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FiscalYearEnd> for String {
    fn from(value: FiscalYearEnd) -> Self {
        value.to_string()
    }
}

/// Schedule totals for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalYearSummary {
    pub fiscal_year: i32,
    pub months: u32,
    pub payments: Money,
    pub interest_expense: Money,
    pub rou_amortization: Money,
    pub total_expense: Money,
    pub ending_liability: Money,
    pub ending_rou: Money,
}

/// Group schedule rows by fiscal year. `period_dates[i]` is the date of
/// `rows[i]`; both slices must be the same length.
pub fn summarize_by_fiscal_year(
    rows: &[AmortizationRow],
    period_dates: &[NaiveDate],
    fiscal_year_end: FiscalYearEnd,
) -> LeaseAccountingResult<Vec<FiscalYearSummary>> {
    if rows.len() != period_dates.len() {
        return Err(LeaseAccountingError::InvalidInput {
            field: "period_dates".into(),
            reason: format!(
                "Expected {} period dates, got {}",
                rows.len(),
                period_dates.len()
            ),
        });
    }

    let mut summaries: Vec<FiscalYearSummary> = Vec::new();
    for (row, date) in rows.iter().zip(period_dates) {
        let fy = fiscal_year_end.fiscal_year_of(*date);
        match summaries.last_mut() {
            Some(current) if current.fiscal_year == fy => {
                current.months += 1;
                current.payments += row.payment;
                current.interest_expense += row.interest_expense;
                current.rou_amortization += row.rou_amortization;
                current.total_expense += row.total_expense;
                current.ending_liability = row.end_liability;
                current.ending_rou = row.end_rou;
            }
            _ => summaries.push(FiscalYearSummary {
                fiscal_year: fy,
                months: 1,
                payments: row.payment,
                interest_expense: row.interest_expense,
                rou_amortization: row.rou_amortization,
                total_expense: row.total_expense,
                ending_liability: row.end_liability,
                ending_rou: row.end_rou,
            }),
        }
    }

    Ok(summaries)
}
