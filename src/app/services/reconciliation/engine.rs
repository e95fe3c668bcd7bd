//! Reconciliation engine orchestration

use crate::app::models::{
    DispensingEvent, DispensingPoint, EventClassification, RawTelemetryRecord, TankLevelSample,
};
use crate::app::services::record_processor::deduplicate_by_event_id;
use crate::config::ReconciliationConfig;
use crate::{Error, Result};
use tracing::{debug, info, warn};

use super::classification::{classify_dispensing_point, max_valid_event_id};
use super::matcher::{level_drop_volume, nearest_sample};
use super::stats::{ReconciliationResult, ReconciliationStats};

/// Infers event volumes from tank-level readings
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
}

impl ReconciliationEngine {
    pub fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Reconcile enriched records against tank samples for one dispensing point
    ///
    /// # Arguments
    ///
    /// * `records` - Enriched records, sorted by transmission time
    /// * `samples` - Tank-level samples, sorted ascending by timestamp
    /// * `point` - Which dispensing point to extract
    ///
    /// # Returns
    ///
    /// Auxiliary events newest first, main events oldest first. An empty
    /// sample set is an error since no volume can be inferred.
    pub fn reconcile(
        &self,
        records: &[RawTelemetryRecord],
        samples: &[TankLevelSample],
        point: DispensingPoint,
    ) -> Result<ReconciliationResult> {
        if samples.is_empty() {
            return Err(Error::empty_input(
                "Reconciliation requires at least one tank-level sample",
            ));
        }

        let mut stats = ReconciliationStats::new();
        let max_id = max_valid_event_id(records);
        stats.max_event_id = max_id;

        let candidates: Vec<&RawTelemetryRecord> =
            records.iter().filter(|r| r.has_event_id()).collect();
        stats.candidates = candidates.len();

        let unique = deduplicate_by_event_id(candidates);
        stats.duplicates_removed = stats.candidates - unique.len();

        let mut events = Vec::new();
        for record in unique {
            let event_point =
                classify_dispensing_point(record.event_id(), max_id.unwrap_or(0), &self.config);
            match event_point {
                DispensingPoint::Main => stats.main_events += 1,
                DispensingPoint::Auxiliary => stats.auxiliary_events += 1,
            }
            if event_point != point {
                continue;
            }

            let event = self.reconcile_record(record, samples, event_point, &mut stats);
            events.push(event);
        }

        match point {
            DispensingPoint::Auxiliary => {
                events.sort_by(|a, b| b.start_time.cmp(&a.start_time))
            }
            DispensingPoint::Main => events.sort_by_key(|event| event.start_time),
        }

        if events.is_empty() {
            warn!("No {} events found to reconcile", point);
        }
        info!("Reconciliation ({}) complete: {}", point, stats.summary());

        Ok(ReconciliationResult { events, stats })
    }

    fn reconcile_record(
        &self,
        record: &RawTelemetryRecord,
        samples: &[TankLevelSample],
        point: DispensingPoint,
        stats: &mut ReconciliationStats,
    ) -> DispensingEvent {
        let start_ts = record.start_time_millis();
        let end_ts = record.end_time_millis();

        let volume = match (nearest_sample(samples, start_ts), nearest_sample(samples, end_ts)) {
            (Some(start), Some(end)) => {
                if end.volume > start.volume {
                    stats.clamped += 1;
                    debug!(
                        "Event {}: tank level rose {:.2} -> {:.2} L, volume clamped",
                        record.event_id(),
                        start.volume,
                        end.volume
                    );
                }
                level_drop_volume(start, end)
            }
            _ => 0.0,
        };

        let classification = match point {
            DispensingPoint::Main => EventClassification::Reconciled,
            DispensingPoint::Auxiliary => EventClassification::ReconciledAuxiliary,
        };

        let mut event = DispensingEvent::from_record(record, volume, classification);
        event.dispensing_point = point;
        event
    }
}
