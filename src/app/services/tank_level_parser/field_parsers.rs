//! Field parsing utilities for tank-level rows

use crate::app::models::parse_strict_number;
use crate::constants::TANK_ISO_TIME_FORMAT;
use crate::{Error, Result};
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

/// `dd.mm.yyyy hh:mm:ss`, also accepting `/` or `-` between date parts
static LOCALE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})[./-](\d{2})[./-](\d{4})[ T]+(\d{2}):(\d{2}):(\d{2})$")
        .expect("locale timestamp pattern is valid")
});

/// Trailing liter unit, e.g. `L`, `lt`, `litros`
static UNIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(litros|litro|lts|lt|l)\.?$").expect("unit suffix pattern is valid")
});

/// Rewrite a `dd.mm.yyyy hh:mm:ss` timestamp as `yyyy-mm-ddThh:mm:ss`
///
/// Values already in ISO form are returned unchanged (with a space separator
/// replaced by `T`). Anything else yields `None`.
pub fn rewrite_to_iso(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Some(caps) = LOCALE_TIMESTAMP.captures(raw) {
        return Some(format!(
            "{}-{}-{}T{}:{}:{}",
            &caps[3], &caps[2], &caps[1], &caps[4], &caps[5], &caps[6]
        ));
    }

    let candidate = raw.replacen(' ', "T", 1);
    NaiveDateTime::parse_from_str(&candidate, TANK_ISO_TIME_FORMAT)
        .is_ok()
        .then_some(candidate)
}

/// Parse a tank timestamp into epoch milliseconds
///
/// The export writes wall-clock time in the sensor's local zone, given as a
/// fixed UTC offset.
pub fn parse_tank_timestamp(raw: &str, offset: &FixedOffset) -> Result<i64> {
    let iso = rewrite_to_iso(raw).ok_or_else(|| {
        Error::data_validation(format!(
            "Unrecognized timestamp '{}' (expected dd.mm.yyyy hh:mm:ss)",
            raw.trim()
        ))
    })?;

    let naive = NaiveDateTime::parse_from_str(&iso, TANK_ISO_TIME_FORMAT).map_err(|e| {
        Error::datetime_parsing(format!("Invalid tank timestamp '{}'", raw.trim()), e)
    })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            Error::data_validation(format!("Ambiguous local time '{}'", raw.trim()))
        })
}

/// Parse a volume cell such as `1.234,5 L` or `980,25`
///
/// When both `.` and `,` appear the dot is a thousands separator. A lone comma
/// is the decimal separator. Returns `None` when the cleaned text is not a
/// complete number.
pub fn parse_tank_volume(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_matches('"');
    let without_unit = UNIT_SUFFIX.replace(trimmed, "");
    let mut cleaned = without_unit.trim().to_string();

    if cleaned.contains('.') && cleaned.contains(',') {
        cleaned.retain(|c| c != '.');
    }
    let cleaned = cleaned.replace(',', ".");

    parse_strict_number(&cleaned)
}
