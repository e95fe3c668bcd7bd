//! Tests for the reconciliation engine

use super::*;
use crate::Error;
use crate::app::services::reconciliation::ReconciliationEngine;

#[test]
fn test_level_rise_clamped_to_zero() {
    let records = vec![create_reconcile_record(1, 1, 0)];
    let samples = vec![sample(0, 100.0), sample(60, 105.0)];

    let result = ReconciliationEngine::default()
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].volume_liters, 0.0);
    assert_eq!(result.stats.clamped, 1);
}

#[test]
fn test_volume_from_level_drop() {
    let records = vec![create_reconcile_record(1, 1, 0)];
    let samples = vec![sample(-5, 500.0), sample(62, 460.5), sample(600, 400.0)];

    let result = ReconciliationEngine::default()
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();

    assert_eq!(result.events[0].volume_liters, 39.5);
    assert_eq!(result.events[0].classification, EventClassification::Reconciled);
}

#[test]
fn test_split_and_ordering() {
    let records = vec![
        create_reconcile_record(1, 150, 0),
        create_reconcile_record(2, 40, 100),
        create_reconcile_record(3, 200, 200),
        create_reconcile_record(4, 41, 300),
    ];
    let samples = vec![sample(0, 1000.0)];
    let engine = ReconciliationEngine::default();

    let main = engine
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();
    assert_eq!(main.events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![150, 200]);
    assert!(main.events.iter().all(|e| e.dispensing_point == DispensingPoint::Main));

    let auxiliary = engine
        .reconcile(&records, &samples, DispensingPoint::Auxiliary)
        .unwrap();
    assert_eq!(
        auxiliary.events.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![41, 40]
    );
    assert!(
        auxiliary
            .events
            .iter()
            .all(|e| e.classification == EventClassification::ReconciledAuxiliary)
    );
    assert_eq!(auxiliary.stats.main_events, 2);
    assert_eq!(auxiliary.stats.auxiliary_events, 2);
}

#[test]
fn test_dedup_by_id_first_wins() {
    let records = vec![
        create_reconcile_record(1, 5, 0),
        create_reconcile_record(2, 5, 300),
    ];
    let samples = vec![sample(0, 100.0)];

    let result = ReconciliationEngine::default()
        .reconcile(&records, &samples, DispensingPoint::Main)
        .unwrap();

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].line_number, 1);
    assert_eq!(result.stats.duplicates_removed, 1);
}

#[test]
fn test_empty_samples_is_error() {
    let records = vec![create_reconcile_record(1, 1, 0)];
    let result = ReconciliationEngine::default().reconcile(&records, &[], DispensingPoint::Main);

    assert!(matches!(result, Err(Error::EmptyInput { .. })));
}

#[test]
fn test_millisecond_start_times_normalized() {
    let mut record = create_reconcile_record(1, 1, 0);
    record.set_field(
        "upar3",
        FieldValue::Number((BASE_SECS * 1000) as f64),
    );
    let samples = vec![sample(0, 200.0), sample(60, 150.0)];

    let result = ReconciliationEngine::default()
        .reconcile(&[record], &samples, DispensingPoint::Main)
        .unwrap();

    assert_eq!(result.events[0].start_time, BASE_SECS * 1000);
    assert_eq!(result.events[0].volume_liters, 50.0);
}
