//! Data-quality findings

use std::fmt;

use crate::FactId;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Worth reviewing eventually
    Low,
    /// Should be addressed
    Medium,
    /// Needs human attention
    High,
}

impl Severity {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueKind {
    /// More than one stored row for a triple key
    Duplicate,
    /// Same non-symmetric relation claimed in both directions
    Contradiction,
    /// Confidence below the review threshold
    LowConfidence,
    /// Unverified fact older than the staleness horizon
    Stale,
}

impl IssueKind {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Duplicate => "duplicate",
            IssueKind::Contradiction => "contradiction",
            IssueKind::LowConfidence => "low_confidence",
            IssueKind::Stale => "stale",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding of the quality scan
#[derive(Debug, Clone, PartialEq)]
pub struct QualityIssue {
    /// Category of the finding
    pub kind: IssueKind,
    /// How urgent it is
    pub severity: Severity,
    /// Facts involved
    pub affected_fact_ids: Vec<FactId>,
    /// What was found
    pub description: String,
    /// What to do about it
    pub recommendation: String,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.description)
    }
}
