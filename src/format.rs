//! Currency and date rendering shared by the table, chart and CSV export.

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Fixed currency prefix. No conversion or locale negotiation is done.
pub const CURRENCY_PREFIX: &str = "USD";

/// Rendered in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Largest number of fraction digits kept when rendering an amount.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Layout of a rendered date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Jan 05,2024`: zero-padded day, no space before the year.
    #[default]
    Table,
    /// `Jan 5, 2024`: unpadded day, space before the year.
    Chart,
}

impl DateStyle {
    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::Table => "%b %d,%Y",
            DateStyle::Chart => "%b %-d, %Y",
        }
    }
}

/// Render an amount as `USD 1,234.56`.
///
/// Thousands are grouped with commas and the fraction keeps its natural
/// precision, capped at three digits. Negative values keep their sign in
/// front of the digits (`USD -1,000`).
pub fn format_currency(amount: Decimal) -> String {
    format!("{} {}", CURRENCY_PREFIX, group_digits(amount))
}

fn group_digits(amount: Decimal) -> String {
    let mut rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    let text = rounded.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Parse a calendar date from `YYYY-MM-DD`.
///
/// A full RFC 3339 timestamp is also accepted; its date part (in the
/// timestamp's own offset) is used.
pub fn parse_iso_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    Err(Error::InvalidDate(date_str.to_string()))
}

/// Render an ISO date string for display.
///
/// Unparseable input yields [`INVALID_DATE`] instead of an error so one bad
/// record never breaks a table or an export.
pub fn format_date(date_str: &str, style: DateStyle) -> String {
    match parse_iso_date(date_str) {
        Ok(date) => format_naive_date(date, style),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// Render an already parsed date.
pub fn format_naive_date(date: NaiveDate, style: DateStyle) -> String {
    date.format(style.pattern()).to_string()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
