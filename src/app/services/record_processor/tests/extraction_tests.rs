//! Tests for the extraction policies

use super::*;
use crate::app::models::{DispensingPoint, EventClassification};
use crate::app::services::record_processor::extraction::{
    ExtractionPolicy, extract_events, extract_locked_id, extract_manual_transcript,
    extract_normal, has_required_fields, record_volume,
};
use crate::app::services::record_processor::stats::ProcessingStats;

#[test]
fn test_record_volume() {
    let record = create_event_record(1, 1, 0, 1000.0, 1050.0);
    assert_eq!(record_volume(&record), 5.0);

    let regressed = create_event_record(1, 1, 0, 1050.0, 1000.0);
    assert_eq!(record_volume(&regressed), 0.0);

    let mut partial = create_event_record(1, 1, 0, 1000.0, 1050.0);
    partial.params.meter_end = None;
    assert_eq!(record_volume(&partial), 0.0);
}

#[test]
fn test_has_required_fields() {
    assert!(has_required_fields(&create_event_record(1, 1, 0, 1000.0, 1050.0)));
    assert!(!has_required_fields(&create_event_record(1, 1, 0, 0.0, 1050.0)));
    assert!(!has_required_fields(&create_record(1, 0)));
}

#[test]
fn test_normal_single_event() {
    let records = vec![create_event_record(1, 1, 0, 1000.0, 1050.0)];
    let mut stats = ProcessingStats::new();

    let events = extract_normal(&records, &create_test_config(), &mut stats);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, 1);
    assert_eq!(events[0].volume_liters, 5.0);
    assert_eq!(events[0].classification, EventClassification::Normal);
    assert_eq!(events[0].dispensing_point, DispensingPoint::Main);
    assert_eq!(events[0].vehicle_tag.as_deref(), Some("ABC1234"));
}

#[test]
fn test_normal_threshold_is_strict() {
    // 0.5 L exactly is noise
    let records = vec![
        create_event_record(1, 1, 0, 1000.0, 1005.0),
        create_event_record(2, 2, 100, 1005.0, 1011.0),
    ];
    let mut stats = ProcessingStats::new();

    let events = extract_normal(&records, &create_test_config(), &mut stats);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, 2);
    assert_eq!(events[0].volume_liters, 0.6);
    assert_eq!(stats.below_threshold, 1);
}

#[test]
fn test_normal_deduplicates_retransmissions() {
    let first = create_event_record(1, 1, 0, 1000.0, 1050.0);
    let mut repeat = create_event_record(2, 1, 0, 1000.0, 1050.0);
    repeat.timestamp += 30_000;

    let mut stats = ProcessingStats::new();
    let events = extract_normal(&[first, repeat], &create_test_config(), &mut stats);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].line_number, 1);
    assert_eq!(stats.duplicates_removed, 1);
}

#[test]
fn test_normal_output_sorted_by_start() {
    let records = vec![
        create_event_record(1, 2, 500, 1050.0, 1100.0),
        create_event_record(2, 1, 0, 1000.0, 1050.0),
    ];
    let mut stats = ProcessingStats::new();

    let events = extract_normal(&records, &create_test_config(), &mut stats);

    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_auxiliary_point_code() {
    let mut record = create_event_record(1, 1, 0, 1000.0, 1050.0);
    record.set_field("upar7", FieldValue::Number(3.0));
    let mut stats = ProcessingStats::new();

    let events = extract_normal(&[record], &create_test_config(), &mut stats);

    assert_eq!(events[0].dispensing_point, DispensingPoint::Auxiliary);
}

#[test]
fn test_locked_id_assigns_sequential_ids() {
    let records = vec![
        create_event_record(1, 7, 600, 1100.0, 1200.0),
        create_event_record(2, 7, 0, 1000.0, 1050.0),
        create_event_record(3, 7, 300, 1050.0, 1100.0),
    ];
    let mut stats = ProcessingStats::new();

    let events = extract_locked_id(&records, 100, &create_test_config(), &mut stats);

    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![101, 102, 103]);
    assert!(events.iter().all(|e| e.original_id == Some(7)));
    assert_eq!(events[0].line_number, 2);
    assert!(
        events
            .iter()
            .all(|e| e.classification == EventClassification::LockedIdRecovered)
    );
}

#[test]
fn test_locked_id_accepts_missing_device_id() {
    let mut record = create_event_record(1, 7, 0, 1000.0, 1050.0);
    record.params.event_id = None;
    let mut stats = ProcessingStats::new();

    let events = extract_locked_id(&[record], 0, &create_test_config(), &mut stats);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, 1);
    assert_eq!(events[0].original_id, None);
}

#[test]
fn test_locked_id_counter_does_not_leak_between_calls() {
    let records = vec![create_event_record(1, 7, 0, 1000.0, 1050.0)];
    let config = create_test_config();

    let first = extract_locked_id(&records, 10, &config, &mut ProcessingStats::new());
    let second = extract_locked_id(&records, 10, &config, &mut ProcessingStats::new());

    assert_eq!(first[0].id, 11);
    assert_eq!(second[0].id, 11);
}

#[test]
fn test_locked_id_stops_at_counter_limit() {
    let records = vec![
        create_event_record(1, 7, 0, 1000.0, 1050.0),
        create_event_record(2, 7, 300, 1050.0, 1100.0),
    ];
    let config = create_test_config();

    let last = extract_locked_id(&records, u64::MAX - 1, &config, &mut ProcessingStats::new());
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].id, u64::MAX);
    assert_eq!(last[0].start_time, millis(0));

    let none = extract_locked_id(&records, u64::MAX, &config, &mut ProcessingStats::new());
    assert!(none.is_empty());
}

#[test]
fn test_manual_transcript_keeps_everything_newest_first() {
    let records = vec![
        create_event_record(1, 1, 0, 0.0, 0.0),
        create_event_record(2, 2, 300, 1000.0, 1002.0),
        create_record(3, 400),
    ];
    let mut stats = ProcessingStats::new();

    let events = extract_manual_transcript(&records, &mut stats);

    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(events[0].volume_liters, 0.2);
    assert_eq!(events[1].volume_liters, 0.0);
    assert!(
        events
            .iter()
            .all(|e| e.classification == EventClassification::ManualTranscript)
    );
}

#[test]
fn test_extract_events_sets_final_output() {
    let records = vec![create_event_record(1, 1, 0, 1000.0, 1050.0)];
    let mut stats = ProcessingStats::new();

    let events = extract_events(
        &records,
        ExtractionPolicy::Normal,
        &create_test_config(),
        &mut stats,
    );

    assert_eq!(stats.final_output, events.len());
    assert_eq!(ExtractionPolicy::LockedId { start_id: 0 }.name(), "locked-id");
}
