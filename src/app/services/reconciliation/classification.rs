//! ID-magnitude classification of dispensing points
//!
//! The main nozzle and the auxiliary hose share one telemetry stream and one
//! ID space. The auxiliary counter runs far behind the main one, so IDs well
//! below the batch maximum are attributed to the auxiliary point.

use crate::app::models::{DispensingPoint, RawTelemetryRecord};
use crate::config::ReconciliationConfig;

/// Largest valid (non-zero) device event ID in the batch
pub fn max_valid_event_id(records: &[RawTelemetryRecord]) -> Option<u64> {
    records
        .iter()
        .filter(|record| record.has_event_id())
        .map(RawTelemetryRecord::event_id)
        .max()
}

/// Classify one event ID against the batch maximum
///
/// The split only applies once the maximum exceeds `auxiliary_id_floor`; below
/// that every event is main.
pub fn classify_dispensing_point(
    event_id: u64,
    max_id: u64,
    config: &ReconciliationConfig,
) -> DispensingPoint {
    let max = max_id as f64;
    if max > config.auxiliary_id_floor && (event_id as f64) < max * config.auxiliary_id_ratio {
        DispensingPoint::Auxiliary
    } else {
        DispensingPoint::Main
    }
}
