//! Main record processor implementation and pipeline orchestration
//!
//! Coordinates time repair and event extraction for one batch of parsed
//! telemetry records.

use crate::app::models::RawTelemetryRecord;
use crate::config::ProcessingConfig;
use tracing::{debug, info};

use super::{
    enrichment::enrich_records,
    extraction::{ExtractionPolicy, extract_events},
    stats::{ProcessingResult, ProcessingStats},
};

/// Record processor for WLN telemetry records
///
/// Takes records from the WLN parser, repairs missing event times and applies
/// one extraction policy.
///
/// # Example
///
/// ```rust
/// use fuel_ledger::app::services::record_processor::{ExtractionPolicy, RecordProcessor};
/// use fuel_ledger::app::services::wln_parser::WlnParser;
/// use fuel_ledger::config::ProcessingConfig;
///
/// let parsed = WlnParser::default()
///     .parse_str("REG;1700000000;0;0;upar0:1,upar3:1700000000,upar4:1000,upar5:1700000060,upar6:1050");
/// let processor = RecordProcessor::new(ProcessingConfig::default());
/// let result = processor.process(parsed.records, ExtractionPolicy::Normal);
/// assert_eq!(result.event_count(), 1);
/// assert_eq!(result.events[0].volume_liters, 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordProcessor {
    config: ProcessingConfig,
}

impl RecordProcessor {
    /// Create a new record processor
    ///
    /// # Arguments
    ///
    /// * `config` - Markers, fallback offset and volume threshold
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Get the processing configuration used by this processor
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Repair event times without extracting events
    ///
    /// Used by reconciliation and diagnostics, which apply their own selection.
    pub fn enrich(&self, records: Vec<RawTelemetryRecord>) -> (Vec<RawTelemetryRecord>, ProcessingStats) {
        let mut stats = ProcessingStats::new();
        stats.total_input = records.len();
        let enriched = enrich_records(records, &self.config, &mut stats);
        (enriched, stats)
    }

    /// Process records through the full pipeline
    ///
    /// 1. Time repair (stable sort by transmission time, backfill upar3/upar5)
    /// 2. Event extraction with the selected policy
    ///
    /// # Returns
    ///
    /// A `ProcessingResult` holding the events, the enriched records and statistics
    pub fn process(
        &self,
        records: Vec<RawTelemetryRecord>,
        policy: ExtractionPolicy,
    ) -> ProcessingResult {
        info!(
            "Starting record processing for {} records ({} policy)",
            records.len(),
            policy.name()
        );

        let (records, mut stats) = self.enrich(records);
        let events = extract_events(&records, policy, &self.config, &mut stats);

        info!("{}", stats.summary());
        if stats.event_records > 0 && events.is_empty() {
            debug!(
                "No events survived extraction from {} event records",
                stats.event_records
            );
        }

        ProcessingResult {
            events,
            records,
            stats,
        }
    }
}
