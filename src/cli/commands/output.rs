//! Result rendering for the CLI
//!
//! Every command renders into a byte buffer in one of three formats. CSV and
//! JSON rows are flat so they import cleanly into spreadsheets; human output is
//! a coloured text listing.

use crate::app::models::{
    DiagnosticFinding, DispensingEvent, EventSummary, FieldValue, LedgerEntry, RawTelemetryRecord,
    Severity, format_epoch_millis,
};
use crate::cli::args::OutputFormat;
use crate::{Error, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

/// Flat view of a telemetry record
#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    pub line: usize,
    pub timestamp_ms: i64,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_id: Option<String>,
    pub vehicle_tag: Option<String>,
    pub start_time: Option<String>,
    pub meter_start: Option<String>,
    pub end_time: Option<String>,
    pub meter_end: Option<String>,
    pub pwr_ext: Option<String>,
    pub pwr_int: Option<String>,
    pub io: Option<String>,
}

impl From<&RawTelemetryRecord> for RecordRow {
    fn from(record: &RawTelemetryRecord) -> Self {
        let text = |value: Option<&FieldValue>| value.map(|v| v.to_string());
        Self {
            line: record.line_number,
            timestamp_ms: record.timestamp,
            timestamp: record.iso_timestamp(),
            latitude: record.latitude,
            longitude: record.longitude,
            event_id: text(record.params.event_id.as_ref()),
            vehicle_tag: text(record.params.vehicle_tag.as_ref()),
            start_time: text(record.params.start_time.as_ref()),
            meter_start: text(record.params.meter_start.as_ref()),
            end_time: text(record.params.end_time.as_ref()),
            meter_end: text(record.params.meter_end.as_ref()),
            pwr_ext: text(record.pwr_ext.as_ref()),
            pwr_int: text(record.pwr_int.as_ref()),
            io: text(record.io_state.as_ref()),
        }
    }
}

/// Flat view of a dispensing event, with synthetic meters when available
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub line: usize,
    pub id: u64,
    pub original_id: Option<u64>,
    pub start_time_ms: i64,
    pub start: String,
    pub end_time_ms: i64,
    pub end: String,
    pub vehicle_tag: Option<String>,
    pub operator_tag: Option<String>,
    pub odometer: Option<String>,
    pub meter_start: i64,
    pub meter_end: i64,
    pub cascade_meter_start: Option<i64>,
    pub cascade_meter_end: Option<i64>,
    pub volume_liters: f64,
    pub classification: String,
    pub dispensing_point: String,
}

impl From<&DispensingEvent> for EventRow {
    fn from(event: &DispensingEvent) -> Self {
        Self {
            line: event.line_number,
            id: event.id,
            original_id: event.original_id,
            start_time_ms: event.start_time,
            start: event.start_iso(),
            end_time_ms: event.end_time,
            end: event.end_iso(),
            vehicle_tag: event.vehicle_tag.clone(),
            operator_tag: event.operator_tag.clone(),
            odometer: event.odometer.as_ref().map(|v| v.to_string()),
            meter_start: event.meter_start,
            meter_end: event.meter_end,
            cascade_meter_start: None,
            cascade_meter_end: None,
            volume_liters: event.volume_liters,
            classification: event.classification.to_string(),
            dispensing_point: event.dispensing_point.to_string(),
        }
    }
}

impl From<&LedgerEntry> for EventRow {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            cascade_meter_start: Some(entry.cascade_meter_start),
            cascade_meter_end: Some(entry.cascade_meter_end),
            ..EventRow::from(&entry.event)
        }
    }
}

/// Flat view of a diagnostic finding
#[derive(Debug, Clone, Serialize)]
pub struct FindingRow {
    pub line: usize,
    pub id: u64,
    pub start: String,
    pub severity: String,
    pub errors: String,
    pub warnings: String,
    pub meter_start: i64,
    pub meter_end: i64,
    pub volume_liters: f64,
    pub ext_voltage: Option<f64>,
    pub previous_id: Option<u64>,
    pub next_id: Option<u64>,
}

impl From<&DiagnosticFinding> for FindingRow {
    fn from(finding: &DiagnosticFinding) -> Self {
        Self {
            line: finding.event.line_number,
            id: finding.event.id,
            start: format_epoch_millis(finding.event.start_time),
            severity: severity_label(finding.severity()).to_string(),
            errors: finding.errors.join("; "),
            warnings: finding.warnings.join("; "),
            meter_start: finding.event.meter_start,
            meter_end: finding.event.meter_end,
            volume_liters: finding.event.volume_liters,
            ext_voltage: finding.event.ext_voltage,
            previous_id: finding.context.previous.as_ref().map(|s| s.id),
            next_id: finding.context.next.as_ref().map(|s| s.id),
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => "ok",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

/// Serialize rows as CSV with a header
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::serialization(format!("Failed to flush CSV output: {}", e)))
}

/// Serialize any value as pretty JSON with a trailing newline
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = serde_json::to_vec_pretty(value)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Render decoded records
pub fn render_records(records: &[RawTelemetryRecord], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => to_json(records),
        OutputFormat::Csv => to_csv(&records.iter().map(RecordRow::from).collect::<Vec<_>>()),
        OutputFormat::Human => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", format!("{} telemetry records", records.len()).bold());
            for record in records {
                let row = RecordRow::from(record);
                let _ = writeln!(
                    out,
                    "  line {:>5}  {}  id={:<6} upar4={:<8} upar6={:<8} pwr_ext={:<5} i/o={}",
                    row.line,
                    row.timestamp,
                    row.event_id.as_deref().unwrap_or("-"),
                    row.meter_start.as_deref().unwrap_or("-"),
                    row.meter_end.as_deref().unwrap_or("-"),
                    row.pwr_ext.as_deref().unwrap_or("-"),
                    row.io.as_deref().unwrap_or("-"),
                );
            }
            Ok(out.into_bytes())
        }
    }
}

/// Render event rows (plain events or ledger entries)
pub fn render_event_rows(rows: &[EventRow], title: &str, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => to_json(rows),
        OutputFormat::Csv => to_csv(rows),
        OutputFormat::Human => {
            let mut out = String::new();
            let total: f64 = rows.iter().map(|row| row.volume_liters).sum();
            let _ = writeln!(
                out,
                "{}",
                format!("{}: {} events, {:.2} L", title, rows.len(), total).bold()
            );

            for row in rows {
                let meters = match (row.cascade_meter_start, row.cascade_meter_end) {
                    (Some(start), Some(end)) => format!("ledger {} -> {}", start, end),
                    _ => format!("meter {} -> {}", row.meter_start, row.meter_end),
                };
                let recovered = row
                    .original_id
                    .map(|id| format!(" (device ID {})", id))
                    .unwrap_or_default();

                let _ = writeln!(
                    out,
                    "  #{:<6}{} {}  {:>9.2} L  {:<9}  {}  vehicle={}",
                    row.id,
                    recovered,
                    row.start,
                    row.volume_liters,
                    row.dispensing_point,
                    meters,
                    row.vehicle_tag.as_deref().unwrap_or("-"),
                );
            }
            Ok(out.into_bytes())
        }
    }
}

/// Render diagnostic findings
pub fn render_findings(findings: &[&DiagnosticFinding], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => to_json(findings),
        OutputFormat::Csv => to_csv(
            &findings
                .iter()
                .map(|finding| FindingRow::from(*finding))
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Human => {
            let mut out = String::new();
            for finding in findings {
                let row = FindingRow::from(*finding);
                let header = format!("#{} line {} {}", row.id, row.line, row.start);
                let header = match finding.severity() {
                    Severity::Ok => format!("{} {}", "OK  ".green(), header),
                    Severity::Warning => format!("{} {}", "WARN".yellow(), header),
                    Severity::Error => format!("{} {}", "FAIL".red().bold(), header),
                };
                let _ = writeln!(out, "{}", header);

                for error in &finding.errors {
                    let _ = writeln!(out, "       {} {}", "error:".red(), error);
                }
                for warning in &finding.warnings {
                    let _ = writeln!(out, "       {} {}", "warning:".yellow(), warning);
                }

                if !finding.is_ok {
                    let neighbor = |summary: Option<&EventSummary>| {
                        summary
                            .map(|s| {
                                format!(
                                    "#{} {} {}->{} {:.2} L ext={}",
                                    s.id,
                                    format_epoch_millis(s.start_time),
                                    s.meter_start,
                                    s.meter_end,
                                    s.volume_liters,
                                    s.ext_voltage
                                        .map(|v| format!("{}V", v))
                                        .unwrap_or_else(|| "-".to_string())
                                )
                            })
                            .unwrap_or_else(|| "-".to_string())
                    };
                    let _ = writeln!(
                        out,
                        "       {} {}",
                        "previous:".dimmed(),
                        neighbor(finding.context.previous.as_ref())
                    );
                    let _ = writeln!(
                        out,
                        "       {} {}",
                        "next:".dimmed(),
                        neighbor(finding.context.next.as_ref())
                    );
                }
            }
            Ok(out.into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ContextWindow, DispensingPoint, EventClassification};

    fn event() -> DispensingEvent {
        DispensingEvent {
            id: 12,
            original_id: Some(7),
            start_time: 1_700_000_000_000,
            end_time: 1_700_000_060_000,
            vehicle_tag: Some("ABC1234".to_string()),
            operator_tag: None,
            odometer: Some(FieldValue::Number(15230.0)),
            meter_start: 1000,
            meter_end: 1050,
            volume_liters: 5.0,
            classification: EventClassification::LockedIdRecovered,
            dispensing_point: DispensingPoint::Main,
            line_number: 4,
        }
    }

    #[test]
    fn test_event_csv() {
        let rows = vec![EventRow::from(&event())];
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("line,id,original_id,start_time_ms,start,"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("4,12,7,1700000000000,2023-11-14T22:13:20Z,"));
        assert!(row.contains(",ABC1234,,15230,1000,1050,,,5.0,locked-id-recovered,main"));
    }

    #[test]
    fn test_ledger_row_carries_cascade() {
        let entry = LedgerEntry {
            event: event(),
            cascade_meter_start: 10_000,
            cascade_meter_end: 10_500,
        };
        let row = EventRow::from(&entry);

        assert_eq!(row.cascade_meter_start, Some(10_000));
        assert_eq!(row.cascade_meter_end, Some(10_500));
        assert_eq!(row.id, 12);
    }

    #[test]
    fn test_findings_json_and_csv() {
        let finding = DiagnosticFinding::new(
            EventSummary {
                id: 7,
                start_time: 1_700_000_000_000,
                meter_start: 0,
                meter_end: 1050,
                volume_liters: 105.0,
                ext_voltage: Some(11.2),
                line_number: 3,
            },
            vec!["Zero starting meter (upar4=0)".to_string()],
            vec!["External power below nominal (11.2V)".to_string()],
            ContextWindow::default(),
        );

        let json = String::from_utf8(render_findings(&[&finding], OutputFormat::Json).unwrap())
            .unwrap();
        assert!(json.contains("\"is_ok\": false"));

        let csv = String::from_utf8(render_findings(&[&finding], OutputFormat::Csv).unwrap())
            .unwrap();
        assert!(csv.contains("3,7,2023-11-14T22:13:20Z,error,Zero starting meter (upar4=0)"));
    }

    #[test]
    fn test_human_records_listing() {
        colored::control::set_override(false);
        let mut record = RawTelemetryRecord::new(2, 1_700_000_000_000, 0.0, 0.0);
        record.set_field("upar0", FieldValue::Number(12.0));

        let text = String::from_utf8(render_records(&[record], OutputFormat::Human).unwrap())
            .unwrap();
        assert!(text.starts_with("1 telemetry records"));
        assert!(text.contains("id=12"));
    }
}
