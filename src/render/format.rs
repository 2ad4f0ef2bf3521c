//! Cell and KPI formatters
//!
//! Currency and integer amounts use Spanish (es-ES) conventions: `,` as the
//! decimal separator and `.` grouping thousands. As in es-ES, four-digit
//! integer parts are not grouped (`1234,50` but `12.345,50`).

use crate::core::row::to_number;
use serde_json::Value;

/// es-ES number with a fixed number of decimals
pub fn es_number(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let grouped = if int_part.len() > 4 {
        let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(digit);
        }
        out
    } else {
        int_part.to_string()
    };

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{},{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// `$` amount with two decimals, es-ES separators
pub fn money(value: f64) -> String {
    format!("${}", es_number(value, 2))
}

/// Whole number, es-ES grouping
pub fn integer(value: f64) -> String {
    es_number(value.trunc(), 0)
}

/// Plain fixed-point rendering (`.` decimal separator)
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// `x.x%`
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 1))
}

// Column formatters operate on raw JSON values; null and non-numeric values
// coerce to 0 unless the formatter documents a placeholder.

pub fn money_cell(value: &Value) -> String {
    money(to_number(value).unwrap_or(0.0))
}

pub fn integer_cell(value: &Value) -> String {
    integer(to_number(value).unwrap_or(0.0))
}

pub fn percent_cell(value: &Value) -> String {
    percent(to_number(value).unwrap_or(0.0))
}

/// `x.x%`, or `N/A` when null
pub fn percent_or_na_cell(value: &Value) -> String {
    to_number(value).map(percent).unwrap_or_else(|| "N/A".to_string())
}

/// `$x.xx` without grouping
pub fn dollars_cell(value: &Value) -> String {
    format!("${}", fixed(to_number(value).unwrap_or(0.0), 2))
}

pub fn fixed1_cell(value: &Value) -> String {
    fixed(to_number(value).unwrap_or(0.0), 1)
}

/// Text as-is, `N/A` when null or empty
pub fn text_or_na_cell(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) if s.is_empty() => "N/A".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Count rendered without grouping, `0` when null
pub fn count_cell(value: &Value) -> String {
    format!("{}", to_number(value).unwrap_or(0.0).trunc() as i64)
}
