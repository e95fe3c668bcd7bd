//! Tests for the record processor module
//!
//! Unit tests for time repair, extraction policies, deduplication and statistics.

pub mod extraction_tests;

// Test helper functions and fixtures
use crate::app::models::{FieldValue, RawTelemetryRecord};
use crate::config::ProcessingConfig;

/// Base transmission time used by the fixtures (2023-11-14T22:13:20Z), in seconds
pub const BASE_SECS: i64 = 1_700_000_000;

/// Create a bare record transmitted `offset_secs` after the base time
pub fn create_record(line_number: usize, offset_secs: i64) -> RawTelemetryRecord {
    RawTelemetryRecord::new(line_number, (BASE_SECS + offset_secs) * 1000, -23.55, -46.63)
}

/// Create a complete event record
///
/// Start/end times are device seconds; meters are in 0.1 L units.
pub fn create_event_record(
    line_number: usize,
    event_id: u64,
    start_offset_secs: i64,
    meter_start: f64,
    meter_end: f64,
) -> RawTelemetryRecord {
    let mut record = create_record(line_number, start_offset_secs + 90);
    record.set_field("upar0", FieldValue::Number(event_id as f64));
    record.set_field("upar1", FieldValue::Text("ABC1234".to_string()));
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
    record
}

/// Create a record carrying only an I/O transition
pub fn create_io_record(line_number: usize, offset_secs: i64, io: &str) -> RawTelemetryRecord {
    let mut record = create_record(line_number, offset_secs);
    record.set_field("i/o", FieldValue::Text(io.to_string()));
    record
}

/// Create the default processing configuration
pub fn create_test_config() -> ProcessingConfig {
    ProcessingConfig::default()
}

/// Epoch milliseconds of the base time plus an offset
pub fn millis(offset_secs: i64) -> i64 {
    (BASE_SECS + offset_secs) * 1000
}
