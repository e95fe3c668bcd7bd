//! Application constants for the fuel ledger
//!
//! This module contains wire-format markers, firmware parameter codes,
//! default thresholds and header synonyms used throughout the engine.

// =============================================================================
// WLN Wire Format
// =============================================================================

/// Line-type token that marks a telemetry register line
pub const REGISTER_MARKER: &str = "REG";

/// Positional field separator of WLN lines
pub const FIELD_SEPARATOR: char = ';';

/// Separator between embedded sub-tokens inside a positional field
pub const SUB_TOKEN_SEPARATOR: char = ',';

/// Separators accepted between an embedded key and its value
pub const KEY_VALUE_SEPARATORS: &[char] = &[':', '='];

/// Positional index of the transmission timestamp (whole seconds)
pub const TIMESTAMP_FIELD: usize = 1;

/// Positional index of the latitude field
pub const LATITUDE_FIELD: usize = 2;

/// Positional index of the longitude field
pub const LONGITUDE_FIELD: usize = 3;

/// Digital I/O transition marker meaning "pump energized"
pub const ENERGIZE_MARKER: &str = "/e";

/// Firmware parameter codes carried in WLN sub-tokens
pub mod param_keys {
    /// Event (operation) identifier
    pub const EVENT_ID: &str = "upar0";
    /// Vehicle tag (card)
    pub const VEHICLE_TAG: &str = "upar1";
    /// Operator tag
    pub const OPERATOR_TAG: &str = "upar2";
    /// Event start time (seconds or milliseconds epoch)
    pub const START_TIME: &str = "upar3";
    /// Starting meter reading (0.1 L units)
    pub const METER_START: &str = "upar4";
    /// Event end time (seconds or milliseconds epoch)
    pub const END_TIME: &str = "upar5";
    /// Ending meter reading (0.1 L units)
    pub const METER_END: &str = "upar6";
    /// Dispensing point code
    pub const POINT_CODE: &str = "upar7";
    /// Odometer
    pub const ODOMETER: &str = "upar10";
    /// External supply voltage
    pub const PWR_EXT: &str = "pwr_ext";
    /// Internal battery voltage
    pub const PWR_INT: &str = "pwr_int";
    /// Digital I/O transition string
    pub const IO: &str = "i/o";
    /// Digital I/O alias seen in some exports
    pub const IO_ALIAS: &str = "io";
}

/// `upar7` value that marks the auxiliary (comboio) dispensing point
pub const AUXILIARY_POINT_CODE: i64 = 3;

// =============================================================================
// Units and Time
// =============================================================================

/// Liters per device meter unit
pub const LITERS_PER_METER_UNIT: f64 = 0.1;

/// Cascade meter units per device meter unit (0.1 L -> 0.01 L)
pub const CASCADE_UNITS_PER_METER_UNIT: i64 = 10;

/// Cascade meter units per liter
pub const CASCADE_UNITS_PER_LITER: f64 = 100.0;

/// Epoch values with more digits than this are already in milliseconds
pub const MILLISECOND_DIGIT_THRESHOLD: usize = 11;

/// Milliseconds per second
pub const MILLIS_PER_SECOND: i64 = 1000;

// =============================================================================
// Processing Defaults
// =============================================================================

/// Minimum dispensed volume (liters) for a normal or locked-ID event
pub const DEFAULT_MIN_VOLUME_LITERS: f64 = 0.5;

/// Start-time fallback when no pump-energized edge has been seen
pub const DEFAULT_FALLBACK_START_OFFSET_SECS: i64 = 120;

/// Minimum batch-wide maximum ID before the ID-magnitude split applies
pub const DEFAULT_AUXILIARY_ID_FLOOR: f64 = 50.0;

/// IDs below `max_id * ratio` belong to the auxiliary dispensing point
pub const DEFAULT_AUXILIARY_ID_RATIO: f64 = 0.5;

// =============================================================================
// Diagnostics Defaults
// =============================================================================

/// External supply below this voltage is a hard fault
pub const DEFAULT_EXT_POWER_ERROR_FLOOR: f64 = 10.0;

/// External supply below this voltage (but above the error floor) is a warning
pub const DEFAULT_EXT_POWER_WARNING_FLOOR: f64 = 12.0;

/// Internal battery below this voltage is a hard fault
pub const DEFAULT_INT_BATTERY_ERROR_FLOOR: f64 = 2.0;

// =============================================================================
// Tank-Level CSV
// =============================================================================

/// Delimiter of tank-level exports
pub const TANK_CSV_DELIMITER: u8 = b';';

/// Accepted header names for the timestamp column (compared case-insensitively)
pub const TANK_TIME_COLUMNS: &[&str] = &[
    "data",
    "data/hora",
    "data hora",
    "datahora",
    "hora",
    "time",
    "timestamp",
    "date",
    "datetime",
];

/// Accepted header names for the volume column (compared case-insensitively)
pub const TANK_VOLUME_COLUMNS: &[&str] = &[
    "volume",
    "volume (l)",
    "volume(l)",
    "vol",
    "nível",
    "nivel",
    "level",
    "fuel level",
];

/// Input timestamp layout after ISO rewriting
pub const TANK_ISO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// Configuration
// =============================================================================

/// Application directory name below the user config directory
pub const APP_CONFIG_DIR: &str = "fuel-ledger";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "FUEL_LEDGER_";

/// Accepted values for the configured log level
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
