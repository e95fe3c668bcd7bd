//! Dispensing event extraction policies
//!
//! Three interchangeable policies turn enriched records into events:
//! - [`ExtractionPolicy::Normal`]: trusted device IDs, volume threshold, signature dedup
//! - [`ExtractionPolicy::LockedId`]: same filters, IDs reassigned sequentially
//! - [`ExtractionPolicy::ManualTranscript`]: every record with an ID, newest first
//!
//! Missing numeric fields count as zero; a malformed record never aborts a batch.

use crate::app::models::{
    DispensingEvent, EventClassification, RawTelemetryRecord, meter_delta_liters,
};
use crate::config::ProcessingConfig;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::deduplication::EventSignature;
use super::stats::ProcessingStats;

/// Which extraction rules to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// Device IDs are trusted
    Normal,
    /// The device repeats a frozen ID; new IDs continue after `start_id`
    LockedId { start_id: u64 },
    /// Flow sensor off; volumes will be transcribed by hand
    ManualTranscript,
}

impl ExtractionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionPolicy::Normal => "normal",
            ExtractionPolicy::LockedId { .. } => "locked-id",
            ExtractionPolicy::ManualTranscript => "manual-transcript",
        }
    }
}

/// Run the selected policy over enriched records
pub fn extract_events(
    records: &[RawTelemetryRecord],
    policy: ExtractionPolicy,
    config: &ProcessingConfig,
    stats: &mut ProcessingStats,
) -> Vec<DispensingEvent> {
    let events = match policy {
        ExtractionPolicy::Normal => extract_normal(records, config, stats),
        ExtractionPolicy::LockedId { start_id } => {
            extract_locked_id(records, start_id, config, stats)
        }
        ExtractionPolicy::ManualTranscript => extract_manual_transcript(records, stats),
    };

    stats.final_output = events.len();
    info!(
        "Extraction ({}) complete: {} events from {} records",
        policy.name(),
        events.len(),
        records.len()
    );

    events
}

/// Volume from the record's meters; zero unless both meters are present
pub fn record_volume(record: &RawTelemetryRecord) -> f64 {
    if record.has_meters() {
        meter_delta_liters(record.meter_start(), record.meter_end())
    } else {
        0.0
    }
}

/// True when the record carries a non-zero ID and both non-zero meters
pub fn has_required_fields(record: &RawTelemetryRecord) -> bool {
    let present = |value: Option<&crate::app::models::FieldValue>| {
        value.is_some_and(|v| !v.is_blank_or_zero())
    };

    record.has_event_id()
        && present(record.params.meter_start.as_ref())
        && present(record.params.meter_end.as_ref())
}

/// Apply the volume threshold and signature dedup, in input order
///
/// Signatures of rejected candidates are not remembered, so a later
/// retransmission of a below-threshold record is judged on its own.
fn filter_candidates<'a>(
    candidates: impl Iterator<Item = &'a RawTelemetryRecord>,
    min_volume: f64,
    stats: &mut ProcessingStats,
) -> Vec<(&'a RawTelemetryRecord, f64)> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();

    for record in candidates {
        stats.event_records += 1;
        let volume = record_volume(record);

        if volume <= min_volume {
            stats.below_threshold += 1;
            debug!(
                "Line {}: {:.2} L at or below {:.2} L threshold",
                record.line_number, volume, min_volume
            );
            continue;
        }

        if !seen.insert(EventSignature::of(record)) {
            stats.duplicates_removed += 1;
            debug!("Line {}: duplicate event signature", record.line_number);
            continue;
        }

        accepted.push((record, volume));
    }

    accepted
}

/// Normal policy: device IDs kept, output ascending by start time
pub fn extract_normal(
    records: &[RawTelemetryRecord],
    config: &ProcessingConfig,
    stats: &mut ProcessingStats,
) -> Vec<DispensingEvent> {
    let accepted = filter_candidates(
        records.iter().filter(|r| has_required_fields(r)),
        config.min_volume_liters,
        stats,
    );

    let mut events: Vec<DispensingEvent> = accepted
        .into_iter()
        .map(|(record, volume)| {
            DispensingEvent::from_record(record, volume, EventClassification::Normal)
        })
        .collect();

    events.sort_by_key(|event| event.start_time);
    events
}

/// Locked-ID policy: IDs reassigned as `start_id + 1, start_id + 2, ...` in start order
///
/// The counter is threaded through the fold; nothing outlives the call. Events
/// that would need an ID beyond `u64::MAX` are dropped.
pub fn extract_locked_id(
    records: &[RawTelemetryRecord],
    start_id: u64,
    config: &ProcessingConfig,
    stats: &mut ProcessingStats,
) -> Vec<DispensingEvent> {
    let mut accepted = filter_candidates(records.iter(), config.min_volume_liters, stats);
    accepted.sort_by_key(|(record, _)| record.start_time_millis());

    let available = u64::MAX - start_id;
    if (accepted.len() as u64) > available {
        warn!(
            "Locked-ID counter exhausted after start ID {}: {} events dropped",
            start_id,
            accepted.len() as u64 - available
        );
    }

    accepted
        .into_iter()
        .zip((1..=available).map(|offset| start_id + offset))
        .map(|((record, volume), new_id)| {
            let mut event = DispensingEvent::from_record(
                record,
                volume,
                EventClassification::LockedIdRecovered,
            );
            event.original_id = record.has_event_id().then(|| record.event_id());
            event.id = new_id;
            event
        })
        .collect()
}

/// Manual-transcript policy: every record with an ID, output descending by start time
///
/// The cascade step relies on this order being reversed before it walks the batch.
pub fn extract_manual_transcript(
    records: &[RawTelemetryRecord],
    stats: &mut ProcessingStats,
) -> Vec<DispensingEvent> {
    let mut events: Vec<DispensingEvent> = records
        .iter()
        .filter(|r| r.has_event_id())
        .map(|record| {
            stats.event_records += 1;
            DispensingEvent::from_record(
                record,
                record_volume(record),
                EventClassification::ManualTranscript,
            )
        })
        .collect();

    events.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    events
}
