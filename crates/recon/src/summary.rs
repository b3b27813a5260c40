use serde::Serialize;

use crate::model::Classification;

/// Per-category counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Rows with a usable key in each input.
    pub baseline_rows: usize,
    pub incoming_rows: usize,
    /// Rows dropped by preprocessing (missing or blank key).
    pub dropped_baseline: usize,
    pub dropped_incoming: usize,
    pub merged_rows: usize,
}

impl MergeSummary {
    /// Counts only; row totals are filled in by the caller.
    pub fn from_classification(classification: &Classification) -> Self {
        Self {
            added: classification.added.len(),
            removed: classification.removed.len(),
            updated: classification.updated.len(),
            unchanged: classification.unchanged.len(),
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0 || self.updated > 0
    }
}
