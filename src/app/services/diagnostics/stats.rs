//! Diagnostics statistics and report structures

use crate::app::models::DiagnosticFinding;
use serde::{Deserialize, Serialize};

/// Counts per severity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsStats {
    /// Records carrying a valid event ID
    pub event_records: usize,
    /// Retransmissions collapsed before the rules ran
    pub duplicates_removed: usize,
    pub ok: usize,
    pub warning_only: usize,
    pub with_errors: usize,
}

impl DiagnosticsStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events that raised anything
    pub fn faulty(&self) -> usize {
        self.warning_only + self.with_errors
    }

    pub fn summary(&self) -> String {
        format!(
            "{} events | {} ok | {} warnings | {} errors | {} duplicates collapsed",
            self.ok + self.faulty(),
            self.ok,
            self.warning_only,
            self.with_errors,
            self.duplicates_removed
        )
    }
}

/// Findings plus statistics
#[derive(Debug, Clone)]
pub struct DiagnosticsReport {
    /// One finding per deduplicated event, chronological
    pub findings: Vec<DiagnosticFinding>,
    pub stats: DiagnosticsStats,
}

impl DiagnosticsReport {
    /// Findings with at least one error or warning
    pub fn faults(&self) -> impl Iterator<Item = &DiagnosticFinding> {
        self.findings.iter().filter(|finding| !finding.is_ok)
    }
}
