//! End-to-end tests for the telemetry pipeline
//!
//! Each test starts from WLN or tank-level text and drives the public services
//! the same way the CLI commands do.

use fuel_ledger::app::models::{
    DispensingPoint, EventClassification, FieldValue, RawTelemetryRecord, TankLevelSample,
};
use fuel_ledger::app::services::diagnostics::DiagnosticsEngine;
use fuel_ledger::app::services::reconciliation::{
    ReconciliationEngine, SortOrder, build_meter_cascade, order_for_display,
};
use fuel_ledger::app::services::record_processor::{ExtractionPolicy, RecordProcessor};
use fuel_ledger::app::services::tank_level_parser::TankLevelParser;
use fuel_ledger::app::services::wln_parser::WlnParser;
use fuel_ledger::Error;
use fuel_ledger::config::TankLevelConfig;
use std::io::Write;
use tempfile::NamedTempFile;

/// Build one register line for an event transmitted 60 s after it ended
fn event_line(id: u64, start_secs: i64, meter_start: i64, meter_end: i64) -> String {
    format!(
        "REG;{};-23.5;-46.6;upar0:{},upar3:{},upar4:{},upar5:{},upar6:{},pwr_ext:12.6,pwr_int:4.1",
        start_secs + 120,
        id,
        start_secs,
        meter_start,
        start_secs + 60,
        meter_end
    )
}

fn parse_and_enrich(lines: &[String]) -> Vec<RawTelemetryRecord> {
    let parsed = WlnParser::default().parse_str(&lines.join("\r\n"));
    let (records, _) = RecordProcessor::default().enrich(parsed.records);
    records
}

#[test]
fn test_normal_extraction_drops_idle_event() {
    let text = [
        event_line(1, 1_700_000_000, 1000, 1050),
        event_line(2, 1_700_000_300, 1050, 1050),
    ]
    .join("\n");

    let parsed = WlnParser::default().parse_str(&text);
    let result = RecordProcessor::default().process(parsed.records, ExtractionPolicy::Normal);

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].id, 1);
    assert_eq!(result.events[0].volume_liters, 5.0);
    assert_eq!(result.events[0].classification, EventClassification::Normal);
    assert_eq!(result.stats.below_threshold, 1);
}

#[test]
fn test_normal_extraction_is_repeatable() {
    let mut lines = vec![
        event_line(1, 1_700_000_000, 1000, 1050),
        event_line(2, 1_700_000_300, 1050, 1120),
    ];
    // Retransmission of event 1
    lines.push(event_line(1, 1_700_000_000, 1000, 1050));
    let text = lines.join("\n");

    let first = RecordProcessor::default().process(
        WlnParser::default().parse_str(&text).records,
        ExtractionPolicy::Normal,
    );
    let second = RecordProcessor::default().process(
        WlnParser::default().parse_str(&text).records,
        ExtractionPolicy::Normal,
    );

    assert_eq!(first.events.len(), 2);
    assert_eq!(first.events, second.events);
}

#[test]
fn test_locked_id_recovery_from_frozen_counter() {
    let lines = [
        event_line(120, 1_700_000_600, 1120, 1200),
        event_line(120, 1_700_000_000, 1000, 1050),
        event_line(120, 1_700_000_300, 1050, 1120),
    ];
    let parsed = WlnParser::default().parse_str(&lines.join("\n"));

    let result = RecordProcessor::default()
        .process(parsed.records, ExtractionPolicy::LockedId { start_id: 120 });

    let ids: Vec<u64> = result.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![121, 122, 123]);
    assert!(result.events.iter().all(|e| e.original_id == Some(120)));
    assert_eq!(result.events[2].volume_liters, 8.0);
}

#[test]
fn test_manual_transcript_cascade_is_gapless() {
    let lines = [
        event_line(3, 1_700_000_600, 0, 0),
        event_line(1, 1_700_000_000, 4200, 0),
        event_line(2, 1_700_000_300, 0, 0),
    ];
    let parsed = WlnParser::default().parse_str(&lines.join("\n"));
    let result = RecordProcessor::default()
        .process(parsed.records, ExtractionPolicy::ManualTranscript);

    // Manual output is newest first
    let ids: Vec<u64> = result.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let mut events = result.events;
    events[0].volume_liters = 12.34;
    events[1].volume_liters = 20.0;
    events[2].volume_liters = 7.5;

    let ledger = build_meter_cascade(&events);
    assert_eq!(ledger[0].event.id, 1);
    assert_eq!(ledger[0].cascade_meter_start, 42_000);
    for pair in ledger.windows(2) {
        assert_eq!(pair[0].cascade_meter_end, pair[1].cascade_meter_start);
    }
    assert_eq!(ledger[2].cascade_meter_end, 42_000 + 750 + 2000 + 1234);

    let display = order_for_display(ledger, SortOrder::Descending);
    assert_eq!(display[0].event.id, 3);
}

#[test]
fn test_enrichment_keeps_every_record() {
    let text = concat!(
        "REG;1700000000;0;0;i/o:13/e\n",
        "REG;1700000100;0;0;upar0:1,upar3:0,upar4:1000,upar6:1050\n",
        "REG;1700000200;0;0;pwr_ext:12.4\n",
        "REG;1700000050;0;0;upar0:2,upar4:1000,upar6:1010\n",
    );
    let parsed = WlnParser::default().parse_str(text);
    let input_len = parsed.records.len();

    let (records, stats) = RecordProcessor::default().enrich(parsed.records);

    assert_eq!(records.len(), input_len);
    assert_eq!(stats.total_input, 4);
    assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let repaired = records.iter().find(|r| r.event_id() == 1).unwrap();
    assert_eq!(repaired.start_time_millis(), 1_700_000_000_000);
    assert_eq!(repaired.end_time_millis(), 1_700_000_100_000);
    assert_eq!(
        repaired.original_start_time(),
        Some(&FieldValue::Number(0.0))
    );
}

#[test]
fn test_suffixed_io_value_stays_text() {
    let parsed = WlnParser::default().parse_str("REG;1700000000;0;0;io:13/e,upar0:123");

    let record = &parsed.records[0];
    assert_eq!(record.io_state, Some(FieldValue::Text("13/e".to_string())));
    assert_eq!(record.params.event_id, Some(FieldValue::Number(123.0)));
}

#[test]
fn test_stuck_id_reported_by_diagnostics() {
    let records = parse_and_enrich(&[
        event_line(7, 1_700_000_000, 1000, 1050),
        event_line(7, 1_700_000_300, 1050, 1100),
    ]);

    let report = DiagnosticsEngine::default().diagnose(&records);

    assert_eq!(report.findings.len(), 2);
    assert!(report.findings[0].is_ok);
    assert!(
        report.findings[1]
            .errors
            .iter()
            .any(|e| e.contains("Stuck event ID"))
    );
}

#[test]
fn test_reconciliation_clamps_rising_level() {
    let records = parse_and_enrich(&[event_line(1, 1_700_000_000, 0, 0)]);
    let samples = vec![
        TankLevelSample::new(1_700_000_000_000, 100.0).unwrap(),
        TankLevelSample::new(1_700_000_060_000, 105.0).unwrap(),
    ];

    let result = ReconciliationEngine::default()
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].volume_liters, 0.0);
    assert_eq!(result.stats.clamped, 1);
}

#[test]
fn test_reconciliation_id_magnitude_split() {
    let records = parse_and_enrich(&[
        event_line(200, 1_700_000_000, 0, 0),
        event_line(40, 1_700_000_300, 0, 0),
        event_line(150, 1_700_000_600, 0, 0),
    ]);
    let samples = vec![TankLevelSample::new(1_700_000_000_000, 500.0).unwrap()];
    let engine = ReconciliationEngine::default();

    let auxiliary = engine
        .reconcile(&records, &samples, DispensingPoint::Auxiliary)
        .unwrap();
    let ids: Vec<u64> = auxiliary.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![40]);
    assert_eq!(
        auxiliary.events[0].classification,
        EventClassification::ReconciledAuxiliary
    );

    let main = engine
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();
    let ids: Vec<u64> = main.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![200, 150]);
}

#[tokio::test]
async fn test_tank_file_samples_are_positive() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "\u{feff}Data/Hora;Volume (L)\r\n\
         14.11.2023 22:20:00;990,0\r\n\
         14.11.2023 22:13:20;0\r\n\
         14.11.2023 22:10:00;1.000,5 L\r\n\
         not a date;12\r\n"
    )
    .unwrap();

    let result = TankLevelParser::new(TankLevelConfig::default())
        .unwrap()
        .parse_file(file.path())
        .await
        .unwrap();

    assert_eq!(result.samples.len(), 2);
    assert!(result.samples.iter().all(|s| s.volume > 0.0));
    assert!(result.samples[0].timestamp < result.samples[1].timestamp);
    assert_eq!(result.samples[0].volume, 1000.5);
    assert_eq!(result.stats.non_positive_volume, 1);
    assert_eq!(result.stats.rows_skipped, 1);
}

#[tokio::test]
async fn test_tank_file_without_samples_fails() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "Data;Volume\r\n14.11.2023 22:13:20;0\r\n").unwrap();

    let result = TankLevelParser::new(TankLevelConfig::default())
        .unwrap()
        .parse_file(file.path())
        .await;

    assert!(matches!(result, Err(Error::EmptyInput { .. })));
}
