//! Reconciliation statistics and result structures

use crate::app::models::DispensingEvent;
use serde::{Deserialize, Serialize};

/// Statistics for one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationStats {
    /// Records carrying a valid event ID
    pub candidates: usize,
    /// Records dropped because their ID was already seen
    pub duplicates_removed: usize,
    /// Unique events attributed to the main nozzle
    pub main_events: usize,
    /// Unique events attributed to the auxiliary hose
    pub auxiliary_events: usize,
    /// Events whose tank level rose across the window (volume clamped to zero)
    pub clamped: usize,
    /// Largest valid event ID in the batch
    pub max_event_id: Option<u64>,
}

impl ReconciliationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} candidates | {} duplicate IDs | {} main / {} auxiliary | {} clamped | max ID {}",
            self.candidates,
            self.duplicates_removed,
            self.main_events,
            self.auxiliary_events,
            self.clamped,
            self.max_event_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        )
    }
}

/// Result of a reconciliation pass
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// Events of the requested point, in display order
    pub events: Vec<DispensingEvent>,
    pub stats: ReconciliationStats,
}
