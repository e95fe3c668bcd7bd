//! Tests for the diagnostics module


use crate::app::models::{FieldValue, RawTelemetryRecord};

pub const BASE_SECS: i64 = 1_700_000_000;

/// A healthy event record: intact times, moving meters, 12.6 V supply, 4.1 V battery
pub fn create_healthy_record(
    line_number: usize,
    event_id: u64,
    start_offset_secs: i64,
    meter_start: f64,
    meter_end: f64,
) -> RawTelemetryRecord {
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
    record.set_field("upar4", FieldValue::Number(meter_start));
    record.set_field(
        "upar5",
        FieldValue::Number((BASE_SECS + start_offset_secs + 60) as f64),
    );
    record.set_field("upar6", FieldValue::Number(meter_end));
    record.set_field("pwr_ext", FieldValue::Number(12.6));
    record.set_field("pwr_int", FieldValue::Number(4.1));
    record
}
