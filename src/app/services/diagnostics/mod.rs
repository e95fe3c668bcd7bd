//! Rule-based health check over dispensing events
//!
//! Telemetry anomalies are returned as data, never as errors. Each deduplicated
//! event gets one [`DiagnosticFinding`](crate::app::models::DiagnosticFinding)
//! with its hard faults, soft faults and chronological neighbors.
//!
//! ## Architecture
//!
//! - [`engine`] - Ordering, deduplication and context windows
//! - [`rules`] - The individual checks
//! - [`stats`] - Counts per severity

pub mod engine;
pub mod rules;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use engine::DiagnosticsEngine;
pub use rules::{RuleOutcome, evaluate_rules};
pub use stats::{DiagnosticsReport, DiagnosticsStats};
