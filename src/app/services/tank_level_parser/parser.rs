//! Core tank-level parser implementation

use chrono::FixedOffset;
use csv::StringRecord;
use std::path::Path;
use tracing::{debug, info};

use super::column_mapping::TankColumnMapping;
use super::field_parsers::{parse_tank_timestamp, parse_tank_volume};
use super::stats::{TankParseResult, TankParseStats};
use crate::app::models::TankLevelSample;
use crate::config::TankLevelConfig;
use crate::constants::TANK_CSV_DELIMITER;
use crate::{Error, Result};

/// Parser for tank-level CSV exports
///
/// Malformed rows are skipped. A missing time or volume column and an export
/// without a single usable sample are file-level errors.
#[derive(Debug, Clone)]
pub struct TankLevelParser {
    config: TankLevelConfig,
    offset: FixedOffset,
}

impl TankLevelParser {
    /// Create a parser for the configured dialect
    pub fn new(config: TankLevelConfig) -> Result<Self> {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            Error::configuration(format!(
                "Invalid tank-level UTC offset: {} minutes",
                config.utc_offset_minutes
            ))
        })?;

        Ok(Self { config, offset })
    }

    /// Read and parse a tank-level export
    pub async fn parse_file(&self, file_path: &Path) -> Result<TankParseResult> {
        info!("Parsing tank-level file: {}", file_path.display());

        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            Error::io(
                format!("Failed to read tank-level file {}", file_path.display()),
                e,
            )
        })?;
        let content = String::from_utf8_lossy(&bytes);

        self.parse_str(&content, &file_path.display().to_string())
    }

    /// Parse CSV text into samples sorted ascending by timestamp
    ///
    /// `source` names the input in error messages.
    pub fn parse_str(&self, content: &str, source: &str) -> Result<TankParseResult> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(TANK_CSV_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing(source, "Failed to read CSV headers", Some(e)))?
            .clone();

        let mapping = TankColumnMapping::resolve(&headers, &self.config)?;
        debug!(
            "Tank columns resolved: time={}, volume={}",
            mapping.time_index, mapping.volume_index
        );

        let mut stats = TankParseStats::new();
        let mut samples = Vec::new();

        for (index, row) in reader.records().enumerate() {
            let row_number = index + 1;
            stats.total_rows += 1;

            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!("Tank row {}: CSV error {}", row_number, e);
                    stats.add_skip(row_number, format!("CSV error: {}", e));
                    continue;
                }
            };

            match self.parse_row(&row, &mapping) {
                Ok(Some(sample)) => {
                    samples.push(sample);
                    stats.samples_parsed += 1;
                }
                Ok(None) => {
                    stats.non_positive_volume += 1;
                    debug!("Tank row {}: non-positive volume discarded", row_number);
                }
                Err(e) => {
                    debug!("Tank row {}: {}", row_number, e);
                    stats.add_skip(row_number, e.to_string());
                }
            }
        }

        if samples.is_empty() {
            return Err(Error::empty_input(format!(
                "No usable tank-level samples in {} ({})",
                source,
                stats.summary()
            )));
        }

        samples.sort_by_key(|sample| sample.timestamp);
        info!("Tank-level parse complete: {}", stats.summary());

        Ok(TankParseResult { samples, stats })
    }

    /// Decode one data row; `Ok(None)` means a zero or negative reading
    fn parse_row(
        &self,
        row: &StringRecord,
        mapping: &TankColumnMapping,
    ) -> Result<Option<TankLevelSample>> {
        let time_cell = row
            .get(mapping.time_index)
            .ok_or_else(|| Error::data_validation("Missing time cell"))?;
        let volume_cell = row
            .get(mapping.volume_index)
            .ok_or_else(|| Error::data_validation("Missing volume cell"))?;

        let timestamp = parse_tank_timestamp(time_cell, &self.offset)?;
        let volume = parse_tank_volume(volume_cell).ok_or_else(|| {
            Error::data_validation(format!("Unparseable volume '{}'", volume_cell))
        })?;

        if volume <= 0.0 {
            return Ok(None);
        }

        TankLevelSample::new(timestamp, volume).map(Some)
    }
}
