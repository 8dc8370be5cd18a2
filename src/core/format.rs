//! pt-BR display formatting for money and dates.

use crate::utils::error::{HelperError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NBSP: char = '\u{a0}';

const DATETIME_INPUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Inserts `.` every three digits from the right: `1234567` -> `1.234.567`.
pub(crate) fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// The separator after `R$` is a non-breaking space, as browsers emit for the
/// `pt-BR` locale. Negative amounts carry a leading `-`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return format!("R${}NaN", NBSP);
    }
    let sign = if value.is_sign_negative() && value != 0.0 { "-" } else { "" };
    if value.is_infinite() {
        return format!("{}R${}∞", sign, NBSP);
    }

    let abs = value.abs();
    let fixed = if is_half_cent_tie(abs) {
        // Ties round to the larger amount, as `Intl.NumberFormat` does.
        let cents = (abs * 100.0).round() as u64;
        format!("{}.{:02}", cents / 100, cents % 100)
    } else {
        format!("{:.2}", abs)
    };
    let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // -0.001 rounds to zero and loses its sign.
    let sign = if units.bytes().all(|b| b == b'0') && cents == "00" { "" } else { sign };
    format!("{}R${}{},{}", sign, NBSP, group_thousands(units), cents)
}

/// An `f64` lands exactly on half a cent only when it is an odd multiple of 1/8.
fn is_half_cent_tie(abs: f64) -> bool {
    let eighths = abs * 8.0;
    eighths.fract() == 0.0 && eighths % 2.0 == 1.0
}

fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    for pattern in DATETIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    tracing::debug!("Unrecognised date input: {:?}", input);
    Err(HelperError::InvalidDate {
        input: input.to_string(),
    })
}

/// `2024-03-05` -> `05/03/2024`. Timestamps keep the date of their own wall clock.
pub fn format_date(input: &str) -> Result<String> {
    Ok(parse_timestamp(input)?.format("%d/%m/%Y").to_string())
}

/// `2024-03-05 14:30:00` -> `05/03/2024, 14:30:00`.
pub fn format_datetime(input: &str) -> Result<String> {
    Ok(parse_timestamp(input)?
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string())
}
