//! Tests for the reconciliation module

mod engine_tests;

use crate::app::models::{
    DispensingEvent, DispensingPoint, EventClassification, FieldValue, RawTelemetryRecord,
    TankLevelSample,
};

pub const BASE_SECS: i64 = 1_700_000_000;

/// Create an enriched event record with a 60 s window starting at `start_offset_secs`
pub fn create_reconcile_record(line_number: usize, event_id: u64, start_offset_secs: i64) -> RawTelemetryRecord {
    let mut record = RawTelemetryRecord::new(
        line_number,
        (BASE_SECS + start_offset_secs + 90) * 1000,
        0.0,
        0.0,
    );
    record.set_field("upar0", FieldValue::Number(event_id as f64));
    record.set_field(
        "upar3",
        FieldValue::Number((BASE_SECS + start_offset_secs) as f64),
    );
    record.set_field(
        "upar5",
        FieldValue::Number((BASE_SECS + start_offset_secs + 60) as f64),
    );
    record
}

/// Tank sample `offset_secs` after the base time
pub fn sample(offset_secs: i64, volume: f64) -> TankLevelSample {
    TankLevelSample::new((BASE_SECS + offset_secs) * 1000, volume).unwrap()
}

/// Minimal event for cascade tests
pub fn create_event(id: u64, start_offset_secs: i64, meter_start: i64, volume_liters: f64) -> DispensingEvent {
    DispensingEvent {
        id,
        original_id: None,
        start_time: (BASE_SECS + start_offset_secs) * 1000,
        end_time: (BASE_SECS + start_offset_secs + 60) * 1000,
        vehicle_tag: None,
        operator_tag: None,
        odometer: None,
        meter_start,
        meter_end: meter_start,
        volume_liters,
        classification: EventClassification::ManualTranscript,
        dispensing_point: DispensingPoint::Main,
        line_number: id as usize,
    }
}
