//! Health-check rules
//!
//! Every rule is evaluated independently. Meter and time rules look at the
//! device's own values; time rules use the pre-repair values so faults that
//! the enricher papered over are still reported.

use crate::app::models::{FieldValue, RawTelemetryRecord, normalize_epoch_millis, number_or_zero};
use crate::app::services::record_processor::needs_time_repair;
use crate::config::DiagnosticsConfig;
use crate::constants::LITERS_PER_METER_UNIT;

/// Errors and warnings raised for one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Run every rule against `current`
///
/// `previous` is the preceding event in the deduplicated chronological sequence.
pub fn evaluate_rules(
    current: &RawTelemetryRecord,
    previous: Option<&RawTelemetryRecord>,
    config: &DiagnosticsConfig,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    if let Some(previous) = previous {
        outcome.errors.extend(check_stuck_id(current, previous));
    }
    outcome.errors.extend(check_meters(current));
    outcome.errors.extend(check_corrupted_times(current));
    check_power(current, config, &mut outcome);

    outcome
}

/// Same ID as the previous event but a different physical event
pub fn check_stuck_id(
    current: &RawTelemetryRecord,
    previous: &RawTelemetryRecord,
) -> Option<String> {
    if current.event_id() != previous.event_id() {
        return None;
    }

    let start_changed = original_start_millis(current) != original_start_millis(previous);
    let meter_changed = current.meter_start() != previous.meter_start();

    (start_changed || meter_changed).then(|| {
        format!(
            "Stuck event ID {} (previous event on line {} reused it)",
            current.event_id(),
            previous.line_number
        )
    })
}

/// Zero meters, a meter that did not move, and a meter that ran backwards
pub fn check_meters(record: &RawTelemetryRecord) -> Vec<String> {
    let mut errors = Vec::new();
    let start = record.meter_start();
    let end = record.meter_end();

    if start == 0.0 {
        errors.push("Zero starting meter (upar4=0)".to_string());
    }
    if end == 0.0 {
        errors.push("Zero ending meter (upar6=0)".to_string());
    }

    if start > 0.0 && end > 0.0 {
        if end == start {
            errors.push(format!("Meter did not move (upar4=upar6={})", start));
        } else if end < start {
            errors.push(format!(
                "Meter regressed ({:.1} L, upar4={} upar6={})",
                (end - start) * LITERS_PER_METER_UNIT,
                start,
                end
            ));
        }
    }

    errors
}

/// Start/end times the device reported as zero or missing
pub fn check_corrupted_times(record: &RawTelemetryRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if needs_time_repair(record.original_start_time()) {
        errors.push(format!(
            "Corrupted start time (upar3={})",
            describe(record.original_start_time())
        ));
    }
    if needs_time_repair(record.original_end_time()) {
        errors.push(format!(
            "Corrupted end time (upar5={})",
            describe(record.original_end_time())
        ));
    }

    errors
}

/// External supply and internal battery floors
///
/// Voltages are only judged when the record reports them.
pub fn check_power(
    record: &RawTelemetryRecord,
    config: &DiagnosticsConfig,
    outcome: &mut RuleOutcome,
) {
    if let Some(ext) = record.ext_voltage() {
        if ext < config.ext_power_error_floor {
            outcome
                .errors
                .push(format!("Low external power ({}V)", ext));
        } else if ext < config.ext_power_warning_floor {
            outcome
                .warnings
                .push(format!("External power below nominal ({}V)", ext));
        }
    }

    if let Some(int) = record
        .int_voltage()
        .filter(|v| *v < config.int_battery_error_floor)
    {
        outcome
            .errors
            .push(format!("Low internal battery ({}V)", int));
    }
}

fn original_start_millis(record: &RawTelemetryRecord) -> i64 {
    normalize_epoch_millis(number_or_zero(record.original_start_time()))
}

fn describe(value: Option<&FieldValue>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "missing".to_string())
}
