//! Event time repair for telemetry records
//!
//! The controller occasionally reports a zero start or end time for an event.
//! The transmission timestamp and the digital I/O edges are independent clocks,
//! so they are used to backfill the missing values. The device's own values are
//! kept in [`TimeRepair`] so diagnostics can still report the fault.

use crate::app::models::{FieldValue, RawTelemetryRecord, TimeRepair};
use crate::config::ProcessingConfig;
use crate::constants::MILLIS_PER_SECOND;
use tracing::{debug, info};

use super::stats::ProcessingStats;

/// Repair missing event start/end times across a batch
///
/// Records are sorted by transmission time first (stable, so equal timestamps
/// keep their input order). The output always has the same length as the input.
pub fn enrich_records(
    mut records: Vec<RawTelemetryRecord>,
    config: &ProcessingConfig,
    stats: &mut ProcessingStats,
) -> Vec<RawTelemetryRecord> {
    records.sort_by_key(|record| record.timestamp);

    let fallback_offset_ms = config.fallback_start_offset_secs * MILLIS_PER_SECOND;
    let mut last_energized: Option<i64> = None;
    let mut repaired = 0;

    for record in records.iter_mut() {
        if is_energize_edge(record, &config.energize_marker) {
            last_energized = Some(record.timestamp);
        }

        if record.has_event_id() && repair_event_times(record, last_energized, fallback_offset_ms)
        {
            repaired += 1;
        }
    }

    stats.enriched += repaired;
    info!(
        "Time repair complete: {} of {} records repaired",
        repaired,
        records.len()
    );

    records
}

/// Check whether the record's I/O state carries the pump-energized marker
pub fn is_energize_edge(record: &RawTelemetryRecord, marker: &str) -> bool {
    record
        .io_state
        .as_ref()
        .is_some_and(|state| state.to_string().contains(marker))
}

/// True when an event time is absent, non-numeric or zero
pub fn needs_time_repair(value: Option<&FieldValue>) -> bool {
    match value.and_then(FieldValue::as_f64) {
        Some(n) => n == 0.0,
        None => true,
    }
}

/// Backfill `upar3`/`upar5` on one event record
///
/// The device's original values are stored once; repeated enrichment keeps the
/// first snapshot. Returns true when either time was replaced.
pub fn repair_event_times(
    record: &mut RawTelemetryRecord,
    last_energized: Option<i64>,
    fallback_offset_ms: i64,
) -> bool {
    if record.time_repair.is_none() {
        record.time_repair = Some(TimeRepair {
            original_start: record.params.start_time.clone(),
            original_end: record.params.end_time.clone(),
            start_repaired: false,
            end_repaired: false,
        });
    }

    let start_missing = needs_time_repair(record.params.start_time.as_ref());
    let end_missing = needs_time_repair(record.params.end_time.as_ref());

    if start_missing {
        let start = last_energized.unwrap_or(record.timestamp.saturating_sub(fallback_offset_ms));
        record.params.start_time = Some(FieldValue::Number(start as f64));
        debug!(
            "Line {}: start time repaired to {} ({})",
            record.line_number,
            start,
            if last_energized.is_some() {
                "last energize edge"
            } else {
                "transmission fallback"
            }
        );
    }

    if end_missing {
        record.params.end_time = Some(FieldValue::Number(record.timestamp as f64));
        debug!(
            "Line {}: end time repaired to transmission time {}",
            record.line_number, record.timestamp
        );
    }

    if let Some(repair) = record.time_repair.as_mut() {
        repair.start_repaired |= start_missing;
        repair.end_repaired |= end_missing;
    }

    start_missing || end_missing
}
