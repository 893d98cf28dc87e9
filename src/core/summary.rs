//! Run summary tracking
//!
//! Every command accumulates counters over its run and logs a single
//! summary line at the end, so silent data gaps (missing partitions,
//! zero-filled aggregates, undefined growth rates) are always visible.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Counters accumulated over one command run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Start of the run, UTC
    pub started_at: DateTime<Utc>,
    /// Partitions found and read
    pub partitions_read: u64,
    /// Partitions absent from the store
    pub partitions_missing: u64,
    /// Aggregates that matched no rows and were reported as 0.0
    pub zero_aggregates: u64,
    /// Growth rates reported as null because the base value was zero
    pub null_growth_zero_base: u64,
    /// Growth rates reported as null because a year was missing
    pub null_growth_missing: u64,
    /// Codes that fell into the Unclassified category
    pub unclassified_codes: u64,
    /// Output files written (tables and JSON)
    pub outputs_written: u64,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            partitions_read: 0,
            partitions_missing: 0,
            zero_aggregates: 0,
            null_growth_zero_base: 0,
            null_growth_missing: 0,
            unclassified_codes: 0,
            outputs_written: 0,
        }
    }

    pub fn record_partition_read(&mut self) {
        self.partitions_read += 1;
    }

    pub fn record_partition_missing(&mut self) {
        self.partitions_missing += 1;
    }

    pub fn record_zero_aggregate(&mut self) {
        self.zero_aggregates += 1;
    }

    pub fn record_null_growth_zero_base(&mut self) {
        self.null_growth_zero_base += 1;
    }

    pub fn record_null_growth_missing(&mut self) {
        self.null_growth_missing += 1;
    }

    pub fn record_unclassified(&mut self, count: u64) {
        self.unclassified_codes += count;
    }

    pub fn record_output_written(&mut self) {
        self.outputs_written += 1;
    }

    /// True when every requested partition was present.
    pub fn is_complete(&self) -> bool {
        self.partitions_missing == 0
    }

    /// Logs the summary at INFO level and prints the completeness block.
    pub fn log_summary(&self, command: &str) {
        let elapsed = Utc::now() - self.started_at;
        println!();
        println!("Run summary ({command}):");
        println!(
            "  Partitions: {} read, {} missing",
            self.partitions_read, self.partitions_missing
        );
        println!(
            "  Aggregates: {} zero; growth undefined: {} zero base, {} missing year",
            self.zero_aggregates, self.null_growth_zero_base, self.null_growth_missing
        );
        println!(
            "  Unclassified codes: {}; outputs written: {}",
            self.unclassified_codes, self.outputs_written
        );
        info!(
            command = command,
            elapsed_ms = elapsed.num_milliseconds(),
            partitions_read = self.partitions_read,
            partitions_missing = self.partitions_missing,
            zero_aggregates = self.zero_aggregates,
            null_growth_zero_base = self.null_growth_zero_base,
            null_growth_missing = self.null_growth_missing,
            unclassified_codes = self.unclassified_codes,
            outputs_written = self.outputs_written,
            "Run summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_empty() {
        let summary = RunSummary::new();
        assert_eq!(summary.partitions_read, 0);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_counters_accumulate() {
        let mut summary = RunSummary::new();
        summary.record_partition_read();
        summary.record_partition_read();
        summary.record_partition_missing();
        summary.record_zero_aggregate();
        summary.record_unclassified(3);
        summary.record_output_written();

        assert_eq!(summary.partitions_read, 2);
        assert_eq!(summary.partitions_missing, 1);
        assert_eq!(summary.zero_aggregates, 1);
        assert_eq!(summary.unclassified_codes, 3);
        assert_eq!(summary.outputs_written, 1);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_serializes_to_json() {
        let summary = RunSummary::new();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["partitions_read"], 0);
    }
}
