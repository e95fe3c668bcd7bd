//! Record processing module for WLN telemetry
//!
//! Turns parsed registers into dispensing events: missing event times are
//! repaired from independent clocks, then one of three extraction policies
//! selects, filters and deduplicates events.
//!
//! # Architecture
//!
//! - [`processor`] - Main RecordProcessor struct and pipeline orchestration
//! - [`enrichment`] - Start/end time repair from transmission time and I/O edges
//! - [`extraction`] - Normal, locked-ID and manual-transcript policies
//! - [`deduplication`] - Event signatures and first-wins deduplication
//! - [`stats`] - Processing statistics and result structures
//!
//! # Processing Pipeline
//!
//! 1. **Time repair**: records are sorted by transmission time; event records
//!    with a zero or missing `upar3` take the last pump-energized edge (or the
//!    transmission time minus a fallback offset); a missing `upar5` takes the
//!    transmission time. The device values are preserved for diagnostics.
//! 2. **Extraction**: the selected [`ExtractionPolicy`] produces events.

pub mod deduplication;
pub mod enrichment;
pub mod extraction;
pub mod processor;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use extraction::ExtractionPolicy;
pub use processor::RecordProcessor;
pub use stats::{ProcessingResult, ProcessingStats};

// Re-export utility functions used by the other services
pub use deduplication::{
    DiagnosticSignature, EventSignature, deduplicate_by_event_id, deduplicate_for_diagnostics,
};
pub use enrichment::{enrich_records, needs_time_repair};
