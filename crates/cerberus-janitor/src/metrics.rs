//! Metrics collection for Janitor operations

/// Metrics collected during Janitor operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JanitorMetrics {
    /// Artifacts promoted Quarantine → Accepted
    pub healed: usize,

    /// Artifacts moved Accepted → Archived
    pub archived: usize,

    /// Archived artifacts deleted past retention
    pub compacted: usize,

    /// Quarantined artifacts deleted past retention
    pub purged: usize,

    /// Artifacts skipped because another stage held their lease
    pub skipped_leased: usize,

    /// Per-artifact failures (left in place for the next sweep)
    pub failures: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Total records moved or deleted
    pub fn total_changed(&self) -> usize {
        self.healed + self.archived + self.compacted + self.purged
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Healed: {}", self.healed),
            format!("Archived: {}", self.archived),
            format!("Compacted: {}", self.compacted),
            format!("Purged: {}", self.purged),
            format!("Skipped (leased): {}", self.skipped_leased),
            format!("Failures: {}", self.failures),
        ]
        .join("\n")
    }
}
