//! Parsing statistics and result structures for WLN processing
//!
//! Malformed register lines are never fatal. Each one is recorded here with the
//! reason it was dropped so callers can inspect what the format noise cost them.

use crate::app::models::RawTelemetryRecord;
use serde::{Deserialize, Serialize};

/// Parsing result with records and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Decoded records, in input line order
    pub records: Vec<RawTelemetryRecord>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// A register line that was dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: String,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Total number of lines in the input
    pub total_lines: usize,

    /// Lines that carried the register marker
    pub register_lines: usize,

    /// Records successfully decoded
    pub records_parsed: usize,

    /// Register lines dropped as malformed
    pub records_skipped: usize,

    /// Non-register lines (headers, blanks, other message types)
    pub lines_ignored: usize,

    /// Why each malformed register line was dropped
    pub skipped: Vec<SkippedLine>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dropped register line
    pub fn add_skip(&mut self, line_number: usize, reason: impl Into<String>) {
        self.records_skipped += 1;
        self.skipped.push(SkippedLine {
            line_number,
            reason: reason.into(),
        });
    }

    /// Percentage of register lines that decoded
    pub fn success_rate(&self) -> f64 {
        if self.register_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.register_lines as f64) * 100.0
        }
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} lines | {} register lines | {} parsed ({:.1}%) | {} skipped | {} ignored",
            self.total_lines,
            self.register_lines,
            self.records_parsed,
            self.success_rate(),
            self.records_skipped,
            self.lines_ignored
        )
    }
}
