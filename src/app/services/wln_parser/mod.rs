//! WLN telemetry parser for fuel-dispensing controller logs
//!
//! This module decodes the line-oriented, semicolon-delimited WLN export into
//! typed [`RawTelemetryRecord`](crate::app::models::RawTelemetryRecord)s.
//!
//! ## Architecture
//!
//! - [`parser`] - Line classification and record assembly
//! - [`field_parsers`] - Positional field and `key:value` sub-token decoding
//! - [`stats`] - Parse statistics, including the reason every malformed line was skipped
//!
//! ## Usage
//!
//! ```rust
//! use fuel_ledger::app::services::wln_parser::WlnParser;
//!
//! let parser = WlnParser::default();
//! let result = parser.parse_str("REG;1700000000;-23.5;-46.6;upar0:12,upar4:1000");
//!
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].event_id(), 12);
//! ```

pub mod field_parsers;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::WlnParser;
pub use stats::{ParseResult, ParseStats, SkippedLine};
