//! Parsing statistics and result structures for tank-level exports

use crate::app::models::TankLevelSample;
use serde::{Deserialize, Serialize};

/// Parsing result with samples and statistics
#[derive(Debug, Clone)]
pub struct TankParseResult {
    /// Samples with positive volume, sorted ascending by timestamp
    pub samples: Vec<TankLevelSample>,

    /// Parsing statistics
    pub stats: TankParseStats,
}

/// A data row that did not become a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded)
    pub row_number: usize,
    pub reason: String,
}

/// Row-level statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankParseStats {
    /// Data rows read (header excluded)
    pub total_rows: usize,

    /// Rows that became samples
    pub samples_parsed: usize,

    /// Rows with an unusable timestamp or volume cell
    pub rows_skipped: usize,

    /// Rows discarded because the volume was zero or negative
    pub non_positive_volume: usize,

    pub skipped: Vec<SkippedRow>,
}

impl TankParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a malformed row
    pub fn add_skip(&mut self, row_number: usize, reason: impl Into<String>) {
        self.rows_skipped += 1;
        self.skipped.push(SkippedRow {
            row_number,
            reason: reason.into(),
        });
    }

    /// Percentage of data rows that became samples
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.samples_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows | {} samples ({:.1}%) | {} malformed | {} non-positive",
            self.total_rows,
            self.samples_parsed,
            self.success_rate(),
            self.rows_skipped,
            self.non_positive_volume
        )
    }
}
