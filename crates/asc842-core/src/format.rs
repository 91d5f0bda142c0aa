//! Display formatting for currency and percentage figures.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// `$1,234.56`; negatives render as `-$1,234.56`.
pub fn format_currency(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(rounded.abs(), 2))
}

/// `0.06` -> `6.00%`.
pub fn format_percentage(value: Rate) -> String {
    let pct = (value * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.2}%")
}

/// Like [`format_percentage`] but renders a missing ratio as `N/A`.
pub fn format_percentage_opt(value: Option<Rate>) -> String {
    value.map(format_percentage).unwrap_or_else(|| "N/A".to_string())
}

/// `0.75` -> `75%`.
pub fn format_whole_percentage(value: Rate) -> String {
    let pct = (value * dec!(100)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.0}%")
}

fn group_thousands(value: Decimal, dp: usize) -> String {
    let text = format!("{value:.dp$}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
