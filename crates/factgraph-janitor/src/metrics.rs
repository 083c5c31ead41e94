//! Metrics collection for Janitor operations

use factgraph_domain::IssueKind;
use std::collections::BTreeMap;

/// Counters accumulated across scans and remediation calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorMetrics {
    /// Issues found per kind, summed over scans
    pub issues: BTreeMap<IssueKind, usize>,

    /// Rows removed while merging duplicates
    pub merged: usize,

    /// Facts removed for low confidence
    pub deleted: usize,

    /// Facts whose confidence was decayed
    pub decayed: usize,

    /// Total scans completed
    pub scan_count: usize,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed scan and its findings
    pub fn record_scan<'a>(&mut self, kinds: impl IntoIterator<Item = &'a IssueKind>) {
        self.scan_count += 1;
        for kind in kinds {
            *self.issues.entry(*kind).or_insert(0) += 1;
        }
    }

    /// Record rows removed by a duplicate merge
    pub fn record_merge(&mut self, count: usize) {
        self.merged += count;
    }

    /// Record low-confidence deletions
    pub fn record_deletion(&mut self, count: usize) {
        self.deleted += count;
    }

    /// Record decayed facts
    pub fn record_decay(&mut self, count: usize) {
        self.decayed += count;
    }

    /// Total issues across kinds
    pub fn total_issues(&self) -> usize {
        self.issues.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Scans: {}", self.scan_count),
            String::new(),
        ];

        if !self.issues.is_empty() {
            lines.push("Issues by kind:".to_string());
            for (kind, count) in &self.issues {
                lines.push(format!("  {}: {}", kind, count));
            }
            lines.push(format!("  Total: {}", self.total_issues()));
            lines.push(String::new());
        }

        lines.push(format!("Duplicates merged: {}", self.merged));
        lines.push(format!("Low-confidence deleted: {}", self.deleted));
        lines.push(format!("Stale decayed: {}", self.decayed));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.total_issues(), 0);
        assert_eq!(metrics.scan_count, 0);
        assert_eq!(metrics.deleted, 0);
    }

    #[test]
    fn test_record_scan() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_scan(&[IssueKind::Stale, IssueKind::Stale, IssueKind::Contradiction]);
        metrics.record_scan(&[IssueKind::Stale]);

        assert_eq!(metrics.scan_count, 2);
        assert_eq!(metrics.issues[&IssueKind::Stale], 3);
        assert_eq!(metrics.issues[&IssueKind::Contradiction], 1);
        assert_eq!(metrics.total_issues(), 4);
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_deletion(10);
        metrics.record_merge(2);
        metrics.record_scan(&[IssueKind::Duplicate]);

        metrics.reset();

        assert_eq!(metrics, JanitorMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_scan(&[IssueKind::LowConfidence]);
        metrics.record_deletion(5);
        metrics.record_decay(3);

        let summary = metrics.summary();
        assert!(summary.contains("Scans: 1"));
        assert!(summary.contains("low_confidence: 1"));
        assert!(summary.contains("Low-confidence deleted: 5"));
        assert!(summary.contains("Stale decayed: 3"));
    }
}
