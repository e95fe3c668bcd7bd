//! Header resolution for tank-level exports
//!
//! Export tools rename columns between versions, so the time and volume
//! columns are located through configurable synonym lists.

use crate::config::TankLevelConfig;
use crate::{Error, Result};
use csv::StringRecord;

/// Positions of the columns the parser needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankColumnMapping {
    pub time_index: usize,
    pub volume_index: usize,
}

impl TankColumnMapping {
    /// Locate the time and volume columns in a header row
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace and a
    /// leading byte-order mark. The first matching column wins.
    pub fn resolve(headers: &StringRecord, config: &TankLevelConfig) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let time_index = find_column(&normalized, &config.time_columns).ok_or_else(|| {
            Error::tank_level_format(format!(
                "No time column found (accepted: {}; got: {})",
                config.time_columns.join(", "),
                normalized.join(", ")
            ))
        })?;

        let volume_index = find_column(&normalized, &config.volume_columns).ok_or_else(|| {
            Error::tank_level_format(format!(
                "No volume column found (accepted: {}; got: {})",
                config.volume_columns.join(", "),
                normalized.join(", ")
            ))
        })?;

        Ok(Self {
            time_index,
            volume_index,
        })
    }
}

/// Lower-case a header cell and strip whitespace and BOM
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(normalized: &[String], synonyms: &[String]) -> Option<usize> {
    normalized.iter().position(|header| {
        synonyms
            .iter()
            .any(|synonym| normalize_header(synonym) == *header)
    })
}
