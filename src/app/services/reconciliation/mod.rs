//! Tank-level reconciliation for events without a reliable flow meter
//!
//! When the flow sensor is disabled, the dispensed volume of an event is
//! inferred from the drop in tank level between the readings nearest to its
//! start and end. Events are split between the main nozzle and the auxiliary
//! hose by an ID-magnitude heuristic, and a synthetic running meter is built
//! so the exported ledger stays gapless.
//!
//! ## Architecture
//!
//! - [`engine`] - ReconciliationEngine orchestration
//! - [`classification`] - ID-magnitude split between dispensing points
//! - [`matcher`] - Nearest-sample lookup and level-drop volume
//! - [`meter_cascade`] - Running-meter synthesis and display ordering
//! - [`stats`] - Reconciliation statistics
//!
//! The ID-magnitude split is an empirical approximation: batches in which both
//! dispensing points use similar ID ranges are misclassified.

pub mod classification;
pub mod engine;
pub mod matcher;
pub mod meter_cascade;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classification::{classify_dispensing_point, max_valid_event_id};
pub use engine::ReconciliationEngine;
pub use matcher::{level_drop_volume, nearest_sample};
pub use meter_cascade::{SortOrder, build_meter_cascade, cascade_seed, order_for_display};
pub use stats::{ReconciliationResult, ReconciliationStats};
