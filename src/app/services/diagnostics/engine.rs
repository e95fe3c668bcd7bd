//! Diagnostics engine orchestration

use crate::app::models::{ContextWindow, DiagnosticFinding, EventSummary, RawTelemetryRecord};
use crate::app::services::record_processor::deduplicate_for_diagnostics;
use crate::config::DiagnosticsConfig;
use tracing::{debug, info};

use super::rules::evaluate_rules;
use super::stats::{DiagnosticsReport, DiagnosticsStats};

/// Runs the health check over enriched records
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsEngine {
    config: DiagnosticsConfig,
}

impl DiagnosticsEngine {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// Diagnose every dispensing event in a batch of enriched records
    ///
    /// Records are ordered by transmission time (stable), reduced to those with
    /// a valid event ID, and deduplicated on (ID, device start time, starting
    /// meter). Findings follow that chronological order.
    pub fn diagnose(&self, records: &[RawTelemetryRecord]) -> DiagnosticsReport {
        let mut stats = DiagnosticsStats::new();

        let mut ordered: Vec<&RawTelemetryRecord> =
            records.iter().filter(|r| r.has_event_id()).collect();
        ordered.sort_by_key(|record| record.timestamp);
        stats.event_records = ordered.len();

        let events = deduplicate_for_diagnostics(ordered);
        stats.duplicates_removed = stats.event_records - events.len();

        let findings: Vec<DiagnosticFinding> = events
            .iter()
            .enumerate()
            .map(|(index, current)| {
                let previous = index.checked_sub(1).map(|i| events[i]);
                let next = events.get(index + 1).copied();

                let outcome = evaluate_rules(current, previous, &self.config);
                if !outcome.errors.is_empty() {
                    debug!(
                        "Event {} (line {}): {}",
                        current.event_id(),
                        current.line_number,
                        outcome.errors.join("; ")
                    );
                }

                DiagnosticFinding::new(
                    EventSummary::from_record(current),
                    outcome.errors,
                    outcome.warnings,
                    ContextWindow {
                        previous: previous.map(EventSummary::from_record),
                        next: next.map(EventSummary::from_record),
                    },
                )
            })
            .collect();

        for finding in &findings {
            if finding.is_ok {
                stats.ok += 1;
            } else if finding.warning_only {
                stats.warning_only += 1;
            } else {
                stats.with_errors += 1;
            }
        }

        info!("Diagnostics complete: {}", stats.summary());
        DiagnosticsReport { findings, stats }
    }
}
