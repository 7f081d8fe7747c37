//! Cell-level helpers shared by the table loaders.

use serde_json::Value;

/// Cell contents treated as a missing value, after trimming.
pub const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA",
];

pub fn is_missing(value: &str) -> bool {
    NULL_MARKERS.contains(&value.trim())
}

/// Parse a cell as a finite number. `None` for missing or non-numeric cells.
pub fn parse_number(value: &str) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Plain-text form of a zone identifier, so `1001`, `"1001"` and `1001.0` compare equal.
pub fn canonical_id(value: &str) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    let trimmed = value.trim();
    Some(strip_zero_fraction(trimmed).unwrap_or(trimmed).to_string())
}

/// Same as [`canonical_id`] for a JSON property value.
pub fn canonical_id_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => canonical_id(text),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(int.to_string())
            } else if let Some(uint) = number.as_u64() {
                Some(uint.to_string())
            } else {
                number.as_f64().map(|float| float.to_string())
            }
        }
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

/// `"75056.00"` -> `Some("75056")`; anything not of the form `-?digits.zeros` -> `None`.
fn strip_zero_fraction(value: &str) -> Option<&str> {
    let (int_part, frac_part) = value.split_once('.')?;
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit())
        || frac_part.is_empty()
        || !frac_part.chars().all(|c| c == '0')
    {
        return None;
    }
    Some(int_part)
}
