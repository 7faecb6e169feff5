//! Lenient numeric coercion for untrusted order payloads.
//!
//! Every monetary or count field read from a raw order goes through
//! [`normalize`]. Anything that does not yield a finite number becomes `0.0`,
//! so one malformed record can never poison a running total.

use serde_json::Value;

/// Coerce an arbitrary JSON value into a finite `f64`.
///
/// Numbers pass through unchanged. Strings are parsed leniently: leading
/// whitespace is skipped and the longest numeric prefix is used, so
/// `"12.50 USD"` yields `12.5`. `null`, booleans, objects and empty or
/// non-numeric strings yield `0.0`. Arrays are flattened to their
/// comma-joined text first, which means `["7"]` yields `7.0`.
pub fn normalize(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float(s),
        Value::Array(_) => parse_float(&coerce_to_text(value)),
        Value::Null | Value::Bool(_) | Value::Object(_) => f64::NAN,
    };
    finite_or_zero(parsed)
}

/// [`normalize`] for a field that may be absent altogether.
pub fn normalize_opt(value: Option<&Value>) -> f64 {
    value.map(normalize).unwrap_or(0.0)
}

/// [`normalize`] for text that is already known to be a string.
pub fn normalize_str(text: &str) -> f64 {
    finite_or_zero(parse_float(text))
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Parse the longest decimal prefix of `text`, returning NaN when there is none.
fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // An exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
