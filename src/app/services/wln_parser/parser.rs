//! Core WLN parser implementation
//!
//! Classifies each input line, decodes register lines into records and keeps a
//! side-channel log of every malformed line it had to drop.

use std::path::Path;
use tracing::{debug, info, warn};

use super::field_parsers::{parse_coordinate, parse_sub_tokens, parse_transmission_timestamp};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::RawTelemetryRecord;
use crate::config::ProcessingConfig;
use crate::constants::{
    FIELD_SEPARATOR, LATITUDE_FIELD, LONGITUDE_FIELD, REGISTER_MARKER, TIMESTAMP_FIELD,
};
use crate::{Error, Result};

/// Why a register line could not become a record
#[derive(Debug, Clone, PartialEq)]
pub enum LineFault {
    MissingTimestamp,
    InvalidTimestamp(String),
}

impl std::fmt::Display for LineFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineFault::MissingTimestamp => f.write_str("missing timestamp field"),
            LineFault::InvalidTimestamp(raw) => write!(f, "invalid timestamp '{}'", raw),
        }
    }
}

/// Parser for WLN telemetry exports
#[derive(Debug, Clone)]
pub struct WlnParser {
    /// `<marker>;` prefix that identifies register lines
    register_prefix: String,
}

impl Default for WlnParser {
    fn default() -> Self {
        Self::new(REGISTER_MARKER)
    }
}

impl WlnParser {
    /// Create a parser for the given register marker
    pub fn new(register_marker: &str) -> Self {
        Self {
            register_prefix: format!("{}{}", register_marker.trim(), FIELD_SEPARATOR),
        }
    }

    /// Create a parser from processing configuration
    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(&config.register_marker)
    }

    /// Read and parse a WLN file
    ///
    /// The file is decoded lossily as UTF-8; an unreadable file is the only error.
    pub async fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        info!("Parsing WLN file: {}", file_path.display());

        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            Error::io(
                format!("Failed to read WLN file {}", file_path.display()),
                e,
            )
        })?;
        let content = String::from_utf8_lossy(&bytes);

        Ok(self.parse_str(&content))
    }

    /// Parse WLN text into records, in input line order
    pub fn parse_str(&self, content: &str) -> ParseResult {
        let mut stats = ParseStats::new();
        let mut records = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            stats.total_lines += 1;

            let trimmed = line.trim();
            if !self.is_register_line(trimmed) {
                stats.lines_ignored += 1;
                continue;
            }
            stats.register_lines += 1;

            match self.parse_register_line(line_number, trimmed) {
                Ok(record) => {
                    records.push(record);
                    stats.records_parsed += 1;
                }
                Err(fault) => {
                    debug!("Skipped WLN line {}: {}", line_number, fault);
                    stats.add_skip(line_number, fault.to_string());
                }
            }
        }

        if stats.register_lines == 0 {
            warn!("No register lines found in WLN input");
        }
        info!("WLN parse complete: {}", stats.summary());

        ParseResult { records, stats }
    }

    /// Check whether a trimmed line is a telemetry register
    pub fn is_register_line(&self, trimmed: &str) -> bool {
        trimmed.starts_with(&self.register_prefix)
    }

    /// Decode one register line
    pub fn parse_register_line(
        &self,
        line_number: usize,
        trimmed: &str,
    ) -> std::result::Result<RawTelemetryRecord, LineFault> {
        let fields: Vec<&str> = trimmed.split(FIELD_SEPARATOR).collect();

        let timestamp_field = fields
            .get(TIMESTAMP_FIELD)
            .ok_or(LineFault::MissingTimestamp)?;
        let timestamp = parse_transmission_timestamp(timestamp_field)
            .ok_or_else(|| LineFault::InvalidTimestamp(timestamp_field.trim().to_string()))?;

        let mut record = RawTelemetryRecord::new(
            line_number,
            timestamp,
            parse_coordinate(fields.get(LATITUDE_FIELD).copied()),
            parse_coordinate(fields.get(LONGITUDE_FIELD).copied()),
        );

        for field in &fields {
            for (key, value) in parse_sub_tokens(field) {
                record.set_field(&key, value);
            }
        }

        Ok(record)
    }
}
