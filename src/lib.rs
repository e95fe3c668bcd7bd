//! Fuel Ledger Library
//!
//! A Rust library for rebuilding a clean ledger of fuel-dispensing events from
//! the telemetry logs of fuel-dispensing controllers.
//!
//! This library provides tools for:
//! - Parsing the semicolon-delimited WLN telemetry format into typed records
//! - Repairing corrupted event start/end times from transmission and I/O signals
//! - Extracting deduplicated dispensing events (normal, locked-ID, manual-transcript)
//! - Parsing tank-level CSV exports into a sorted time series
//! - Reconciling events against tank levels when the flow meter is unreliable
//! - Building a gapless running-meter trail for audit
//! - Running rule-based health checks over the extracted events

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod diagnostics;
        pub mod reconciliation;
        pub mod record_processor;
        pub mod tank_level_parser;
        pub mod wln_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    DiagnosticFinding, DispensingEvent, DispensingPoint, EventClassification, FieldValue,
    RawTelemetryRecord, TankLevelSample,
};
pub use config::Config;

/// Result type alias for the fuel ledger
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for fuel ledger operations
///
/// Only file-level and configuration faults are represented here. Malformed
/// lines are skipped and reported through parser statistics, and telemetry
/// anomalies are returned as diagnostic findings.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Tank-level export format error
    #[error("Tank-level format error: {message}")]
    TankLevelFormat { message: String },

    /// Input yielded nothing usable
    #[error("No usable data: {message}")]
    EmptyInput { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Output serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a tank-level format error
    pub fn tank_level_format(message: impl Into<String>) -> Self {
        Self::TankLevelFormat {
            message: message.into(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid TOML configuration: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}
