//! Data models for fuel-dispensing telemetry
//!
//! This module contains the core data structures for representing decoded WLN
//! telemetry registers, reconstructed dispensing events, tank-level readings and
//! health-check findings.

use crate::constants::{
    AUXILIARY_POINT_CODE, LITERS_PER_METER_UNIT, MILLISECOND_DIGIT_THRESHOLD, MILLIS_PER_SECOND,
    param_keys,
};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Field Values
// =============================================================================

/// Value of an embedded `key:value` sub-token
///
/// Values that are a complete finite numeric literal are stored as numbers.
/// Anything else, including digit-prefixed text such as `13/e`, is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Classify a cleaned value using a strict numeric-literal test
    pub fn parse(raw: &str) -> Self {
        match parse_strict_number(raw) {
            Some(number) => FieldValue::Number(number),
            None => FieldValue::Text(raw.to_string()),
        }
    }

    /// Numeric view of the value (text is accepted only if it is itself a strict literal)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_strict_number(s.trim()),
        }
    }

    /// True for empty text and numeric zero
    pub fn is_blank_or_zero(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n == 0.0,
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a complete finite numeric literal; never extracts a leading number from text
pub fn parse_strict_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric value of an optional field, defaulting to zero when absent or textual
pub fn number_or_zero(value: Option<&FieldValue>) -> f64 {
    value.and_then(FieldValue::as_f64).unwrap_or(0.0)
}

/// Normalize an epoch value that may be in seconds or milliseconds
///
/// Values whose integer part has more than 11 digits are already milliseconds.
pub fn normalize_epoch_millis(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let integer = value.trunc().abs() as i64;
    if integer.to_string().len() > MILLISECOND_DIGIT_THRESHOLD {
        value.trunc() as i64
    } else {
        (value * MILLIS_PER_SECOND as f64).round() as i64
    }
}

fn epoch_millis(value: Option<&FieldValue>, already_millis: bool) -> i64 {
    let raw = number_or_zero(value);
    if already_millis && raw.is_finite() {
        raw.trunc() as i64
    } else {
        normalize_epoch_millis(raw)
    }
}

/// Round a derived volume to centiliters and clamp negative deltas to zero
pub fn non_negative_volume(liters: f64) -> f64 {
    if !liters.is_finite() || liters <= 0.0 {
        return 0.0;
    }
    (liters * 100.0).round() / 100.0
}

/// Volume in liters between two device meter readings (0.1 L units)
pub fn meter_delta_liters(meter_start: f64, meter_end: f64) -> f64 {
    non_negative_volume((meter_end - meter_start) * LITERS_PER_METER_UNIT)
}

/// RFC 3339 rendering of an epoch-millisecond timestamp
pub fn format_epoch_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| millis.to_string())
}

// =============================================================================
// Raw Telemetry Records
// =============================================================================

/// Firmware parameter codes every component depends on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceParameters {
    /// `upar0`: event ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<FieldValue>,
    /// `upar1`: vehicle tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_tag: Option<FieldValue>,
    /// `upar2`: operator tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_tag: Option<FieldValue>,
    /// `upar3`: event start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<FieldValue>,
    /// `upar4`: starting meter (0.1 L)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_start: Option<FieldValue>,
    /// `upar5`: event end time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<FieldValue>,
    /// `upar6`: ending meter (0.1 L)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_end: Option<FieldValue>,
    /// `upar7`: dispensing point code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_code: Option<FieldValue>,
    /// `upar10`: odometer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<FieldValue>,
}

/// Values of `upar3`/`upar5` before the enricher repaired them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRepair {
    pub original_start: Option<FieldValue>,
    pub original_end: Option<FieldValue>,
    pub start_repaired: bool,
    pub end_repaired: bool,
}

/// One decoded telemetry register line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTelemetryRecord {
    /// 1-based line number in the source text
    pub line_number: usize,

    /// Transmission time in epoch milliseconds
    pub timestamp: i64,

    /// Latitude (unvalidated, NaN when unparseable)
    pub latitude: f64,

    /// Longitude (unvalidated, NaN when unparseable)
    pub longitude: f64,

    /// Known firmware parameters
    pub params: DeviceParameters,

    /// External supply voltage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwr_ext: Option<FieldValue>,

    /// Internal battery voltage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwr_int: Option<FieldValue>,

    /// Digital I/O transition string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_state: Option<FieldValue>,

    /// Unrecognized sub-tokens
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, FieldValue>,

    /// Pre-repair timestamps, set by the enricher on event records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_repair: Option<TimeRepair>,
}

impl RawTelemetryRecord {
    /// Create a record with only its positional fields populated
    pub fn new(line_number: usize, timestamp: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            line_number,
            timestamp,
            latitude,
            longitude,
            params: DeviceParameters::default(),
            pwr_ext: None,
            pwr_int: None,
            io_state: None,
            extra: BTreeMap::new(),
            time_repair: None,
        }
    }

    /// Store a sub-token under its typed slot, or in `extra` when unrecognized
    ///
    /// The key must already be lower-cased and trimmed. Later tokens overwrite
    /// earlier ones with the same key.
    pub fn set_field(&mut self, key: &str, value: FieldValue) {
        let slot = match key {
            param_keys::EVENT_ID => &mut self.params.event_id,
            param_keys::VEHICLE_TAG => &mut self.params.vehicle_tag,
            param_keys::OPERATOR_TAG => &mut self.params.operator_tag,
            param_keys::START_TIME => &mut self.params.start_time,
            param_keys::METER_START => &mut self.params.meter_start,
            param_keys::END_TIME => &mut self.params.end_time,
            param_keys::METER_END => &mut self.params.meter_end,
            param_keys::POINT_CODE => &mut self.params.point_code,
            param_keys::ODOMETER => &mut self.params.odometer,
            param_keys::PWR_EXT => &mut self.pwr_ext,
            param_keys::PWR_INT => &mut self.pwr_int,
            param_keys::IO | param_keys::IO_ALIAS => &mut self.io_state,
            _ => {
                self.extra.insert(key.to_string(), value);
                return;
            }
        };
        *slot = Some(value);
    }

    /// Look up a sub-token by its wire key
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        match key {
            param_keys::EVENT_ID => self.params.event_id.as_ref(),
            param_keys::VEHICLE_TAG => self.params.vehicle_tag.as_ref(),
            param_keys::OPERATOR_TAG => self.params.operator_tag.as_ref(),
            param_keys::START_TIME => self.params.start_time.as_ref(),
            param_keys::METER_START => self.params.meter_start.as_ref(),
            param_keys::END_TIME => self.params.end_time.as_ref(),
            param_keys::METER_END => self.params.meter_end.as_ref(),
            param_keys::POINT_CODE => self.params.point_code.as_ref(),
            param_keys::ODOMETER => self.params.odometer.as_ref(),
            param_keys::PWR_EXT => self.pwr_ext.as_ref(),
            param_keys::PWR_INT => self.pwr_int.as_ref(),
            param_keys::IO | param_keys::IO_ALIAS => self.io_state.as_ref(),
            _ => self.extra.get(key),
        }
    }

    /// Transmission time as RFC 3339
    pub fn iso_timestamp(&self) -> String {
        format_epoch_millis(self.timestamp)
    }

    /// True when the record carries a non-empty, non-zero `upar0`
    pub fn has_event_id(&self) -> bool {
        self.params
            .event_id
            .as_ref()
            .is_some_and(|id| !id.is_blank_or_zero())
    }

    /// Device event ID as a non-negative integer (0 when absent or textual)
    pub fn event_id(&self) -> u64 {
        let id = number_or_zero(self.params.event_id.as_ref());
        if id > 0.0 { id.trunc() as u64 } else { 0 }
    }

    /// Starting meter in device units (0 when absent)
    pub fn meter_start(&self) -> f64 {
        number_or_zero(self.params.meter_start.as_ref())
    }

    /// Ending meter in device units (0 when absent)
    pub fn meter_end(&self) -> f64 {
        number_or_zero(self.params.meter_end.as_ref())
    }

    /// True when both meters are present
    pub fn has_meters(&self) -> bool {
        self.params.meter_start.is_some() && self.params.meter_end.is_some()
    }

    /// Event start in epoch milliseconds (0 when absent)
    ///
    /// A repaired start is already milliseconds and skips the unit heuristic.
    pub fn start_time_millis(&self) -> i64 {
        let repaired = self.time_repair.as_ref().is_some_and(|r| r.start_repaired);
        epoch_millis(self.params.start_time.as_ref(), repaired)
    }

    /// Event end in epoch milliseconds (0 when absent)
    pub fn end_time_millis(&self) -> i64 {
        let repaired = self.time_repair.as_ref().is_some_and(|r| r.end_repaired);
        epoch_millis(self.params.end_time.as_ref(), repaired)
    }

    /// `upar3` as the device reported it, before any repair
    pub fn original_start_time(&self) -> Option<&FieldValue> {
        match &self.time_repair {
            Some(repair) => repair.original_start.as_ref(),
            None => self.params.start_time.as_ref(),
        }
    }

    /// `upar5` as the device reported it, before any repair
    pub fn original_end_time(&self) -> Option<&FieldValue> {
        match &self.time_repair {
            Some(repair) => repair.original_end.as_ref(),
            None => self.params.end_time.as_ref(),
        }
    }

    /// External supply voltage, when reported numerically
    pub fn ext_voltage(&self) -> Option<f64> {
        self.pwr_ext.as_ref().and_then(FieldValue::as_f64)
    }

    /// Internal battery voltage, when reported numerically
    pub fn int_voltage(&self) -> Option<f64> {
        self.pwr_int.as_ref().and_then(FieldValue::as_f64)
    }

    /// Dispensing point declared by `upar7`
    pub fn declared_point(&self) -> DispensingPoint {
        match self.params.point_code.as_ref().and_then(FieldValue::as_f64) {
            Some(code) if code as i64 == AUXILIARY_POINT_CODE => DispensingPoint::Auxiliary,
            _ => DispensingPoint::Main,
        }
    }

    /// Optional text view of a tag field
    pub fn tag(value: Option<&FieldValue>) -> Option<String> {
        value
            .map(|v| v.to_string().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Dispensing Events
// =============================================================================

/// Physical dispensing point an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispensingPoint {
    /// Main nozzle
    Main,
    /// Auxiliary hose (comboio/mangote) sharing the telemetry stream
    Auxiliary,
}

impl fmt::Display for DispensingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispensingPoint::Main => f.write_str("main"),
            DispensingPoint::Auxiliary => f.write_str("auxiliary"),
        }
    }
}

/// How an event was reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventClassification {
    Normal,
    LockedIdRecovered,
    ManualTranscript,
    Reconciled,
    ReconciledAuxiliary,
}

impl fmt::Display for EventClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventClassification::Normal => "normal",
            EventClassification::LockedIdRecovered => "locked-id-recovered",
            EventClassification::ManualTranscript => "manual-transcript",
            EventClassification::Reconciled => "reconciled",
            EventClassification::ReconciledAuxiliary => "reconciled-auxiliary",
        };
        f.write_str(label)
    }
}

/// One reconstructed fuel transfer operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispensingEvent {
    /// Operation ID (device-assigned, or reassigned by locked-ID recovery)
    pub id: u64,

    /// Frozen device ID replaced by locked-ID recovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_id: Option<u64>,

    /// Event start in epoch milliseconds
    pub start_time: i64,

    /// Event end in epoch milliseconds
    pub end_time: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<FieldValue>,

    /// Starting meter in device units (0.1 L)
    pub meter_start: i64,

    /// Ending meter in device units (0.1 L)
    pub meter_end: i64,

    /// Dispensed volume, never negative
    pub volume_liters: f64,

    pub classification: EventClassification,

    pub dispensing_point: DispensingPoint,

    /// Source line of the register the event came from
    pub line_number: usize,
}

impl DispensingEvent {
    /// Build an event from an enriched record, carrying tags and meters through
    pub fn from_record(
        record: &RawTelemetryRecord,
        volume_liters: f64,
        classification: EventClassification,
    ) -> Self {
        Self {
            id: record.event_id(),
            original_id: None,
            start_time: record.start_time_millis(),
            end_time: record.end_time_millis(),
            vehicle_tag: RawTelemetryRecord::tag(record.params.vehicle_tag.as_ref()),
            operator_tag: RawTelemetryRecord::tag(record.params.operator_tag.as_ref()),
            odometer: record.params.odometer.clone(),
            meter_start: record.meter_start().round() as i64,
            meter_end: record.meter_end().round() as i64,
            volume_liters: non_negative_volume(volume_liters),
            classification,
            dispensing_point: record.declared_point(),
            line_number: record.line_number,
        }
    }

    /// Start time as RFC 3339
    pub fn start_iso(&self) -> String {
        format_epoch_millis(self.start_time)
    }

    /// End time as RFC 3339
    pub fn end_iso(&self) -> String {
        format_epoch_millis(self.end_time)
    }
}

/// An event with its synthesized running-meter values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub event: DispensingEvent,
    /// Synthetic starting meter (0.01 L units)
    pub cascade_meter_start: i64,
    /// Synthetic ending meter (0.01 L units)
    pub cascade_meter_end: i64,
}

// =============================================================================
// Tank Level
// =============================================================================

/// One reading of the independent tank-level sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankLevelSample {
    /// Reading time in epoch milliseconds
    pub timestamp: i64,
    /// Tank content in liters, always > 0
    pub volume: f64,
}

impl TankLevelSample {
    /// Create a sample; zero, negative or non-finite volumes are sensor faults
    pub fn new(timestamp: i64, volume: f64) -> Result<Self> {
        if !volume.is_finite() || volume <= 0.0 {
            return Err(Error::data_validation(format!(
                "Tank volume must be positive, got {}",
                volume
            )));
        }
        Ok(Self { timestamp, volume })
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Compact description of an event for operator triage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: u64,
    pub start_time: i64,
    pub meter_start: i64,
    pub meter_end: i64,
    pub volume_liters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_voltage: Option<f64>,
    pub line_number: usize,
}

impl EventSummary {
    /// Summarize an enriched event record
    pub fn from_record(record: &RawTelemetryRecord) -> Self {
        Self {
            id: record.event_id(),
            start_time: record.start_time_millis(),
            meter_start: record.meter_start().round() as i64,
            meter_end: record.meter_end().round() as i64,
            volume_liters: meter_delta_liters(record.meter_start(), record.meter_end()),
            ext_voltage: record.ext_voltage(),
            line_number: record.line_number,
        }
    }
}

/// Chronological neighbors of a diagnosed event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub previous: Option<EventSummary>,
    pub next: Option<EventSummary>,
}

/// Severity of a finding, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// Health-check result for one dispensing event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticFinding {
    pub event: EventSummary,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub context: ContextWindow,
    /// No errors and no warnings
    pub is_ok: bool,
    /// Warnings only, no errors
    pub warning_only: bool,
}

impl DiagnosticFinding {
    /// Assemble a finding; the status flags are derived from the lists
    pub fn new(
        event: EventSummary,
        errors: Vec<String>,
        warnings: Vec<String>,
        context: ContextWindow,
    ) -> Self {
        let is_ok = errors.is_empty() && warnings.is_empty();
        let warning_only = errors.is_empty() && !warnings.is_empty();
        Self {
            event,
            errors,
            warnings,
            context,
            is_ok,
            warning_only,
        }
    }

    pub fn severity(&self) -> Severity {
        if !self.errors.is_empty() {
            Severity::Error
        } else if self.warning_only {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}
