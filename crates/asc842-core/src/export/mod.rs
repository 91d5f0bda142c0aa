//! Spreadsheet export.
//!
//! Results are first laid out as a plain [`Workbook`] of named sheets with a
//! header row and typed cells. The `export` feature renders that model to
//! `.xlsx` (see [`xlsx`]); without it the model is still available for other
//! tabular outputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::{format_currency, format_percentage, format_whole_percentage};
use crate::lease_accounting::amortization::{AmortizationSchedule, ScheduleInput};
use crate::lease_accounting::classification::TestValue;
use crate::lease_accounting::journal::JournalEntry;
use crate::lease_accounting::unified::{UnifiedOutput, UnifiedRequest};

#[cfg(feature = "export")]
pub mod xlsx;

/// Widest a column is allowed to grow, in characters.
pub const MAX_COLUMN_WIDTH: usize = 40;

pub const SHEET_SUMMARY: &str = "Summary";
pub const SHEET_CLASSIFICATION_TESTS: &str = "Classification Tests";
pub const SHEET_AMORTIZATION_SCHEDULE: &str = "Amortization Schedule";
pub const SHEET_INITIAL_JOURNAL: &str = "Initial Journal Entry";
pub const SHEET_MONTHLY_JOURNAL: &str = "Monthly Journal Entries";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Bool(bool),
    Empty,
}

impl CellValue {
    fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Zero amounts are left blank, as in a hand-kept journal.
    fn amount_or_empty(value: Decimal) -> Self {
        if value > Decimal::ZERO {
            CellValue::Number(value)
        } else {
            CellValue::Empty
        }
    }

    /// Rendered width; numbers are measured at two decimal places.
    pub fn display_len(&self) -> usize {
        match self {
            CellValue::Text(s) => s.chars().count(),
            CellValue::Number(n) => n.round_dp(2).to_string().len(),
            CellValue::Bool(b) => b.to_string().len(),
            CellValue::Empty => 0,
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(Decimal::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn push_blank_row(&mut self) {
        self.rows.push(vec![CellValue::Empty; self.headers.len()]);
    }

    /// min(longest cell + 2, 40) for every column, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(CellValue::display_len)
                    .chain(std::iter::once(self.headers[col].chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Workbook builders
// ---------------------------------------------------------------------------

/// Two sheets: the raw schedule and a summary of the parameters behind it.
pub fn schedule_workbook(input: &ScheduleInput, schedule: &AmortizationSchedule) -> Workbook {
    let mut rows = Sheet::new(
        SHEET_AMORTIZATION_SCHEDULE,
        &[
            "month",
            "begin_liability",
            "begin_rou",
            "payment",
            "interest_expense",
            "principal_reduction",
            "rou_amortization",
            "total_expense",
            "end_liability",
            "end_rou",
        ],
    );
    for r in &schedule.rows {
        rows.push_row(vec![
            r.month.into(),
            r.begin_liability.into(),
            r.begin_rou.into(),
            r.payment.into(),
            r.interest_expense.into(),
            r.principal_reduction.into(),
            r.rou_amortization.into(),
            r.total_expense.into(),
            r.end_liability.into(),
            r.end_rou.into(),
        ]);
    }

    let mut summary = Sheet::new(SHEET_SUMMARY, &["Description", "Value"]);
    let pairs: [(&str, CellValue); 7] = [
        ("Lease Type", CellValue::text(input.lease_type.to_string())),
        ("Initial Liability", input.initial_liability.into()),
        ("Initial ROU Asset", input.initial_rou_asset.into()),
        ("Monthly Payment", input.monthly_payment.into()),
        ("Term (months)", input.lease_term_months.into()),
        ("Annual Rate", CellValue::text(format_percentage(input.annual_rate))),
        ("Payment Timing", CellValue::text(input.payment_timing.to_string())),
    ];
    for (label, value) in pairs {
        summary.push_row(vec![CellValue::text(label), value]);
    }

    Workbook {
        sheets: vec![rows, summary],
    }
}

/// Five sheets covering a full unified calculation.
pub fn complete_workbook(inputs: &UnifiedRequest, results: &UnifiedOutput) -> Workbook {
    Workbook {
        sheets: vec![
            summary_sheet(inputs, results),
            classification_sheet(results),
            amortization_sheet(results),
            journal_sheet(SHEET_INITIAL_JOURNAL, &results.journal_entries.initial, false),
            journal_sheet(SHEET_MONTHLY_JOURNAL, &results.journal_entries.periodic, true),
        ],
    }
}

fn summary_sheet(inputs: &UnifiedRequest, results: &UnifiedOutput) -> Sheet {
    let lease = &inputs.lease;
    let mut sheet = Sheet::new(SHEET_SUMMARY, &["Parameter", "Value"]);
    let pairs = [
        (
            "Lease Commencement Date",
            inputs.lease_commencement_date.format("%Y-%m-%d").to_string(),
        ),
        ("Monthly Payment", format_currency(lease.monthly_payment)),
        ("Lease Term (months)", lease.lease_term_months.to_string()),
        ("Payment Timing", lease.payment_timing.to_string()),
        ("Discount Rate", format_percentage(results.summary.effective_rate)),
        (
            "Fair Value",
            lease
                .fair_value
                .map(format_currency)
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Asset Life (months)",
            lease
                .asset_life_months
                .map(|m| m.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Fiscal Year End", inputs.fiscal_year_end.to_string()),
        ("Lease Classification", results.lease_type().to_string()),
        (
            "Initial Liability",
            format_currency(results.initial_recognition.lease_liability),
        ),
        (
            "Initial ROU Asset",
            format_currency(results.initial_recognition.rou_asset),
        ),
        ("Total Payments", format_currency(results.summary.total_payments)),
        ("Total Interest", format_currency(results.summary.total_interest)),
    ];
    for (label, value) in pairs {
        sheet.push_row(vec![CellValue::text(label), CellValue::Text(value)]);
    }
    sheet
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn classification_sheet(results: &UnifiedOutput) -> Sheet {
    let mut sheet = Sheet::new(
        SHEET_CLASSIFICATION_TESTS,
        &["Test", "Result", "Threshold", "Met"],
    );
    for (name, test) in results.classification.tests.iter() {
        let result = match &test.value {
            TestValue::Flag(flag) => CellValue::Bool(*flag),
            TestValue::Ratio(Some(ratio)) => CellValue::text(format_percentage(*ratio)),
            TestValue::Ratio(None) => CellValue::text("N/A"),
        };
        let threshold = test
            .threshold
            .map(|t| CellValue::text(format_whole_percentage(t)))
            .unwrap_or(CellValue::Empty);
        let met = if test.met { "Yes" } else { "No" };
        sheet.push_row(vec![
            CellValue::text(title_case(name)),
            result,
            threshold,
            CellValue::text(met),
        ]);
    }
    sheet
}

fn amortization_sheet(results: &UnifiedOutput) -> Sheet {
    let mut sheet = Sheet::new(
        SHEET_AMORTIZATION_SCHEDULE,
        &[
            "Month",
            "ROU Asset - Beginning",
            "ROU Asset - Amortization",
            "ROU Asset - Ending",
            "Liability - Beginning",
            "Liability - Interest",
            "Liability - Principal",
            "Liability - Ending",
            "Payment",
            "Total Expense",
        ],
    );
    for row in &results.amortization_schedule {
        sheet.push_row(vec![
            row.month.into(),
            row.rou_asset.beginning.into(),
            row.rou_asset.amortization.into(),
            row.rou_asset.ending.into(),
            row.liability.beginning.into(),
            row.liability.interest.into(),
            row.liability.principal.into(),
            row.liability.ending.into(),
            row.payment.into(),
            row.total_expense.into(),
        ]);
    }
    sheet
}

fn journal_sheet(name: &str, entries: &[JournalEntry], with_month: bool) -> Sheet {
    let headers: &[&str] = if with_month {
        &["Date", "Month", "Description", "Account", "Debit", "Credit"]
    } else {
        &["Date", "Description", "Account", "Debit", "Credit"]
    };
    let mut sheet = Sheet::new(name, headers);

    for entry in entries {
        for line in &entry.entries {
            let mut row = vec![CellValue::text(entry.date.format("%Y-%m-%d").to_string())];
            if with_month {
                row.push(entry.month.map(CellValue::from).unwrap_or(CellValue::Empty));
            }
            row.push(CellValue::text(entry.description.as_str()));
            row.push(CellValue::text(line.account.as_str()));
            row.push(CellValue::amount_or_empty(line.debit));
            row.push(CellValue::amount_or_empty(line.credit));
            sheet.push_row(row);
        }
        sheet.push_blank_row();
    }
    sheet
}
