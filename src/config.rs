//! Configuration management and validation.
//!
//! Provides configuration structures for the reconstruction engine,
//! the reconciliation heuristic, the diagnostics thresholds and the
//! tank-level CSV dialect, loaded in layers: defaults, TOML file,
//! environment, then CLI overrides.

use crate::constants::{
    APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_AUXILIARY_ID_FLOOR, DEFAULT_AUXILIARY_ID_RATIO,
    DEFAULT_EXT_POWER_ERROR_FLOOR, DEFAULT_EXT_POWER_WARNING_FLOOR,
    DEFAULT_FALLBACK_START_OFFSET_SECS, DEFAULT_INT_BATTERY_ERROR_FLOOR,
    DEFAULT_MIN_VOLUME_LITERS, ENERGIZE_MARKER, ENV_PREFIX, LOG_LEVELS, REGISTER_MARKER,
    TANK_TIME_COLUMNS, TANK_VOLUME_COLUMNS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub reconciliation: ReconciliationConfig,
    pub diagnostics: DiagnosticsConfig,
    pub tank_level: TankLevelConfig,
    pub logging: LoggingConfig,
}

/// Parsing, enrichment and extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Line-type token of telemetry register lines
    pub register_marker: String,

    /// I/O transition marker meaning "pump energized"
    pub energize_marker: String,

    /// Start-time fallback (seconds before transmission) when no energize edge is known
    pub fallback_start_offset_secs: i64,

    /// Events at or below this volume are treated as sensor noise
    pub min_volume_liters: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            register_marker: REGISTER_MARKER.to_string(),
            energize_marker: ENERGIZE_MARKER.to_string(),
            fallback_start_offset_secs: DEFAULT_FALLBACK_START_OFFSET_SECS,
            min_volume_liters: DEFAULT_MIN_VOLUME_LITERS,
        }
    }
}

/// ID-magnitude heuristic used to split main and auxiliary dispensing points
///
/// Both values are empirical. Batches where the two points share a similar
/// ID range are misclassified; change them only with field evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// The split only applies when the batch maximum ID exceeds this value
    pub auxiliary_id_floor: f64,

    /// IDs below `max_id * auxiliary_id_ratio` are auxiliary
    pub auxiliary_id_ratio: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            auxiliary_id_floor: DEFAULT_AUXILIARY_ID_FLOOR,
            auxiliary_id_ratio: DEFAULT_AUXILIARY_ID_RATIO,
        }
    }
}

/// Voltage floors for the health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub ext_power_error_floor: f64,
    pub ext_power_warning_floor: f64,
    pub int_battery_error_floor: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            ext_power_error_floor: DEFAULT_EXT_POWER_ERROR_FLOOR,
            ext_power_warning_floor: DEFAULT_EXT_POWER_WARNING_FLOOR,
            int_battery_error_floor: DEFAULT_INT_BATTERY_ERROR_FLOOR,
        }
    }
}

/// Tank-level CSV dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankLevelConfig {
    /// Offset from UTC of the clock the export timestamps are written in
    pub utc_offset_minutes: i32,

    /// Accepted header names for the time column
    pub time_columns: Vec<String>,

    /// Accepted header names for the volume column
    pub volume_columns: Vec<String>,
}

impl Default for TankLevelConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            time_columns: TANK_TIME_COLUMNS.iter().map(|s| s.to_string()).collect(),
            volume_columns: TANK_VOLUME_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            structured: true,
        }
    }
}

impl Config {
    /// Default configuration file location (`<config_dir>/fuel-ledger/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration in layers: defaults, optional file, environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        debug!("Layered configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Apply `FUEL_LEDGER_*` overrides using the supplied variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(&format!("{ENV_PREFIX}LOG_LEVEL")) {
            self.logging.level = level;
        }

        if let Some(raw) = lookup(&format!("{ENV_PREFIX}MIN_VOLUME")) {
            self.processing.min_volume_liters = raw.trim().parse().map_err(|_| {
                Error::configuration(format!("Invalid {ENV_PREFIX}MIN_VOLUME: '{raw}'"))
            })?;
        }

        if let Some(raw) = lookup(&format!("{ENV_PREFIX}UTC_OFFSET_MINUTES")) {
            self.tank_level.utc_offset_minutes = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "Invalid {ENV_PREFIX}UTC_OFFSET_MINUTES: '{raw}'"
                ))
            })?;
        }

        Ok(())
    }

    /// Validate configuration values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.processing.register_marker.trim().is_empty() {
            return Err(Error::configuration("Register marker cannot be empty"));
        }

        if self.processing.energize_marker.is_empty() {
            return Err(Error::configuration("Energize marker cannot be empty"));
        }

        if self.processing.min_volume_liters < 0.0 {
            return Err(Error::configuration(
                "Minimum volume must be non-negative",
            ));
        }

        if self.processing.fallback_start_offset_secs < 0 {
            return Err(Error::configuration(
                "Fallback start offset must be non-negative",
            ));
        }

        let ratio = self.reconciliation.auxiliary_id_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(Error::configuration(format!(
                "Auxiliary ID ratio must be in (0, 1], got {}",
                ratio
            )));
        }

        if self.diagnostics.ext_power_warning_floor < self.diagnostics.ext_power_error_floor {
            return Err(Error::configuration(format!(
                "External power warning floor ({}V) is below the error floor ({}V)",
                self.diagnostics.ext_power_warning_floor, self.diagnostics.ext_power_error_floor
            )));
        }

        // Real-world offsets stay within +/-14h
        if self.tank_level.utc_offset_minutes.abs() > 14 * 60 {
            return Err(Error::configuration(format!(
                "UTC offset out of range: {} minutes",
                self.tank_level.utc_offset_minutes
            )));
        }

        if self.tank_level.time_columns.is_empty() || self.tank_level.volume_columns.is_empty() {
            return Err(Error::configuration(
                "Tank-level column synonym lists cannot be empty",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }
}
