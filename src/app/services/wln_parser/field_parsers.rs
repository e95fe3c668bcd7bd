//! Field parsing utilities for WLN register lines
//!
//! Helpers for the positional fields and for the embedded `key:value` /
//! `key=value` sub-tokens that carry the firmware parameters.

use crate::app::models::{FieldValue, parse_strict_number};
use crate::constants::{KEY_VALUE_SEPARATORS, MILLIS_PER_SECOND, SUB_TOKEN_SEPARATOR};

/// Parse the transmission timestamp field (whole seconds) into epoch milliseconds
///
/// Negative values and values whose millisecond form does not fit an `i64` are rejected.
pub fn parse_transmission_timestamp(field: &str) -> Option<i64> {
    let seconds = parse_strict_number(field.trim())?.trunc();
    if seconds < 0.0 || seconds >= i64::MAX as f64 {
        return None;
    }
    (seconds as i64).checked_mul(MILLIS_PER_SECOND)
}

/// Parse a coordinate field; invalid input yields NaN rather than an error
pub fn parse_coordinate(field: Option<&str>) -> f64 {
    field
        .and_then(|f| f.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Strip surrounding quote characters and whitespace from a raw value
pub fn clean_value(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Split one sub-token at its first `:` or `=`
///
/// Returns the lower-cased key and the cleaned value, or `None` when the token
/// has no separator or either side is empty.
pub fn split_key_value(item: &str) -> Option<(String, String)> {
    let separator = item.find(KEY_VALUE_SEPARATORS)?;
    let key = item[..separator].trim().to_lowercase();
    let value = clean_value(&item[separator + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value.to_string()))
}

/// Explode a positional field into its embedded sub-tokens
pub fn parse_sub_tokens(field: &str) -> Vec<(String, FieldValue)> {
    field
        .split(SUB_TOKEN_SEPARATOR)
        .filter_map(split_key_value)
        .map(|(key, value)| {
            let parsed = FieldValue::parse(&value);
            (key, parsed)
        })
        .collect()
}
