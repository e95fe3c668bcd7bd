//! Record deduplication for dispensing events
//!
//! The controller retransmits closing registers, so one physical event can
//! appear several times in a log. Three identities are used, from strictest to
//! loosest:
//! - [`EventSignature`]: rounded start time + starting meter (extraction policies)
//! - [`DiagnosticSignature`]: device ID + pre-repair start time + starting meter
//! - device ID alone (reconciliation, where IDs are trusted within a point)

use crate::app::models::{RawTelemetryRecord, normalize_epoch_millis, number_or_zero};
use crate::constants::MILLIS_PER_SECOND;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Identity of a physical event for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventSignature {
    /// Start time rounded to whole seconds
    pub start_second: i64,
    /// Starting meter in device units
    pub meter_start: i64,
}

impl EventSignature {
    pub fn of(record: &RawTelemetryRecord) -> Self {
        let start_ms = record.start_time_millis();
        Self {
            start_second: (start_ms as f64 / MILLIS_PER_SECOND as f64).round() as i64,
            meter_start: record.meter_start().round() as i64,
        }
    }
}

/// Identity of an event for the health check
///
/// Uses the device's pre-repair start time so that a repaired retransmission
/// is not silently merged with an intact one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticSignature {
    pub event_id: u64,
    pub original_start: i64,
    pub meter_start: i64,
}

impl DiagnosticSignature {
    pub fn of(record: &RawTelemetryRecord) -> Self {
        Self {
            event_id: record.event_id(),
            original_start: normalize_epoch_millis(number_or_zero(record.original_start_time())),
            meter_start: record.meter_start().round() as i64,
        }
    }
}

/// Keep the first item for each key, preserving input order
pub fn keep_first_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> (Vec<T>, usize)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut removed = 0;

    for item in items {
        if seen.insert(key(&item)) {
            kept.push(item);
        } else {
            removed += 1;
        }
    }

    (kept, removed)
}

/// Keep the first record for each device event ID
pub fn deduplicate_by_event_id<'a>(
    records: impl IntoIterator<Item = &'a RawTelemetryRecord>,
) -> Vec<&'a RawTelemetryRecord> {
    let (kept, removed) = keep_first_by(records, |record| record.event_id());
    debug!("ID deduplication removed {} records", removed);
    kept
}

/// Keep the first record for each diagnostic signature
pub fn deduplicate_for_diagnostics<'a>(
    records: impl IntoIterator<Item = &'a RawTelemetryRecord>,
) -> Vec<&'a RawTelemetryRecord> {
    let (kept, removed) = keep_first_by(records, |record| DiagnosticSignature::of(record));
    debug!("Diagnostic deduplication removed {} records", removed);
    kept
}
