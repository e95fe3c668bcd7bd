//! Running-meter synthesis for batches without real meter readings
//!
//! Computation and presentation are separate steps: [`build_meter_cascade`]
//! always walks events oldest to newest, and [`order_for_display`] re-sorts the
//! finished entries afterwards.

use crate::app::models::{DispensingEvent, LedgerEntry};
use crate::constants::{CASCADE_UNITS_PER_LITER, CASCADE_UNITS_PER_METER_UNIT};
use tracing::debug;

/// Display order of ledger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Starting value of the synthetic meter, in 0.01 L units
///
/// Taken from the first event (chronologically) whose device starting meter is
/// non-zero, converted from 0.1 L units. Zero when no event has one.
pub fn cascade_seed(events: &[DispensingEvent]) -> i64 {
    let mut chronological: Vec<&DispensingEvent> = events.iter().collect();
    chronological.sort_by_key(|event| event.start_time);

    chronological
        .into_iter()
        .find(|event| event.meter_start > 0)
        .map(|event| event.meter_start * CASCADE_UNITS_PER_METER_UNIT)
        .unwrap_or(0)
}

/// Build the gapless meter trail, in ascending chronological order
///
/// Each entry starts where the previous one ended and advances by the event's
/// volume at 0.01 L resolution. The input order does not matter.
pub fn build_meter_cascade(events: &[DispensingEvent]) -> Vec<LedgerEntry> {
    let mut chronological: Vec<&DispensingEvent> = events.iter().collect();
    chronological.sort_by_key(|event| event.start_time);

    let seed = cascade_seed(events);
    debug!("Meter cascade seeded at {} for {} events", seed, events.len());

    chronological
        .into_iter()
        .scan(seed, |running, event| {
            let cascade_meter_start = *running;
            let cascade_meter_end =
                cascade_meter_start + (event.volume_liters * CASCADE_UNITS_PER_LITER).round() as i64;
            *running = cascade_meter_end;

            Some(LedgerEntry {
                event: event.clone(),
                cascade_meter_start,
                cascade_meter_end,
            })
        })
        .collect()
}

/// Re-sort finished entries for presentation
pub fn order_for_display(mut entries: Vec<LedgerEntry>, order: SortOrder) -> Vec<LedgerEntry> {
    match order {
        SortOrder::Ascending => entries.sort_by_key(|entry| entry.event.start_time),
        SortOrder::Descending => {
            entries.sort_by(|a, b| b.event.start_time.cmp(&a.event.start_time))
        }
    }
    entries
}
