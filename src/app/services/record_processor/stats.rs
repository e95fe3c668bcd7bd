//! Processing statistics and result structures for the event pipeline
//!
//! This module provides types for tracking how many records were repaired,
//! filtered and collapsed on the way from raw registers to dispensing events.

use crate::app::models::{DispensingEvent, RawTelemetryRecord};
use serde::{Deserialize, Serialize};

/// Statistics for record processing operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Total number of input records
    pub total_input: usize,
    /// Event records whose start or end time was repaired
    pub enriched: usize,
    /// Records carrying the fields the extraction policy requires
    pub event_records: usize,
    /// Candidates rejected by the minimum-volume threshold
    pub below_threshold: usize,
    /// Candidates collapsed into an earlier event with the same signature
    pub duplicates_removed: usize,
    /// Final number of output events
    pub final_output: usize,
}

impl ProcessingStats {
    /// Create new empty processing statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of event records that became events
    pub fn yield_rate(&self) -> f64 {
        if self.event_records == 0 {
            0.0
        } else {
            (self.final_output as f64 / self.event_records as f64) * 100.0
        }
    }

    /// Percentage of event records that needed a time repair
    pub fn enrichment_rate(&self) -> f64 {
        if self.event_records == 0 {
            0.0
        } else {
            (self.enriched as f64 / self.event_records as f64) * 100.0
        }
    }

    /// Get summary of processing pipeline statistics
    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} records -> {} events ({:.1}% of {} event records) | \
             Repaired: {} ({:.1}%) | Below threshold: {} | Duplicates: {}",
            self.total_input,
            self.final_output,
            self.yield_rate(),
            self.event_records,
            self.enriched,
            self.enrichment_rate(),
            self.below_threshold,
            self.duplicates_removed
        )
    }
}

/// Result of record processing operations
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Extracted dispensing events, in the policy's output order
    pub events: Vec<DispensingEvent>,
    /// Enriched records, sorted by transmission time
    pub records: Vec<RawTelemetryRecord>,
    /// Processing statistics
    pub stats: ProcessingStats,
}

impl ProcessingResult {
    /// Get the number of extracted events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
