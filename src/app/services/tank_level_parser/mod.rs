//! Tank-level CSV parser
//!
//! Decodes `;`-delimited exports of the independent tank-level sensor into a
//! time series of [`TankLevelSample`](crate::app::models::TankLevelSample)s,
//! sorted ascending by timestamp.
//!
//! ## Architecture
//!
//! - [`parser`] - CSV reading, row assembly and file-level checks
//! - [`column_mapping`] - Header synonym resolution for the time and volume columns
//! - [`field_parsers`] - `dd.mm.yyyy hh:mm:ss` timestamps and comma-decimal volumes
//! - [`stats`] - Row statistics and skip reasons
//!
//! ## Usage
//!
//! ```rust
//! use fuel_ledger::app::services::tank_level_parser::TankLevelParser;
//! use fuel_ledger::config::TankLevelConfig;
//!
//! let parser = TankLevelParser::new(TankLevelConfig::default()).unwrap();
//! let result = parser
//!     .parse_str("Data;Volume\n14.11.2023 22:13:20;1.500,5 L\n", "inline")
//!     .unwrap();
//!
//! assert_eq!(result.samples.len(), 1);
//! assert_eq!(result.samples[0].volume, 1500.5);
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::TankColumnMapping;
pub use parser::TankLevelParser;
pub use stats::{SkippedRow, TankParseResult, TankParseStats};
