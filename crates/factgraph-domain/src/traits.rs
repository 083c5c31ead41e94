//! Trait definitions for storage
//!
//! These traits define the boundary between the reasoning components and the
//! backing store. Implementations live in other crates.

use crate::{Fact, FactId, Relation, TriplePattern};

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No fact existed for the triple; the candidate was stored
    Inserted,
    /// The candidate had higher confidence and replaced the stored fact
    Updated,
    /// The stored fact was kept as-is
    Unchanged,
}

/// Per-outcome counts of a batch upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Candidates stored as new facts
    pub inserted: usize,
    /// Candidates that replaced a weaker fact
    pub updated: usize,
    /// Candidates that left the store untouched
    pub unchanged: usize,
}

impl BatchSummary {
    /// Count one outcome
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Number of candidates processed
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

/// A user vote on a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The fact was confirmed
    Correct,
    /// The fact was reported wrong
    Incorrect,
}

impl Feedback {
    /// Change applied to the feedback score
    pub fn delta(&self) -> i64 {
        match self {
            Feedback::Correct => 1,
            Feedback::Incorrect => -1,
        }
    }
}

/// Trait for storing and retrieving facts
///
/// Implemented by the infrastructure layer (factgraph-store)
pub trait FactStore {
    /// Error type for store operations
    type Error;

    /// Insert a fact, or replace the stored fact for the same triple only if
    /// the candidate's confidence is strictly higher
    fn upsert(&mut self, fact: Fact) -> Result<UpsertOutcome, Self::Error>;

    /// Upsert every candidate, all or nothing
    fn batch_upsert(&mut self, facts: Vec<Fact>) -> Result<BatchSummary, Self::Error>;

    /// Get a fact by id
    fn get_fact(&self, id: FactId) -> Result<Option<Fact>, Self::Error>;

    /// Facts matching `pattern` with `confidence >= min_confidence`, ordered by
    /// descending confidence then descending recency
    fn query(&self, pattern: &TriplePattern, min_confidence: f64) -> Result<Vec<Fact>, Self::Error>;

    /// Delete a fact; returns whether it existed
    fn delete(&mut self, id: FactId) -> Result<bool, Self::Error>;

    /// Decay a fact's confidence by `rate`; returns the new confidence
    fn decay_confidence(&mut self, id: FactId, rate: f64) -> Result<Option<f64>, Self::Error>;

    /// Apply a user vote; returns the updated fact
    fn record_feedback(&mut self, id: FactId, feedback: Feedback) -> Result<Option<Fact>, Self::Error>;

    /// Fully-bound lookup regardless of confidence
    fn find(&self, subject: &str, predicate: &Relation, object: &str) -> Result<Option<Fact>, Self::Error> {
        let pattern = TriplePattern::exact(subject, predicate.clone(), object);
        Ok(self.query(&pattern, 0.0)?.into_iter().next())
    }

    /// Every stored fact
    fn all_facts(&self) -> Result<Vec<Fact>, Self::Error> {
        self.query(&TriplePattern::any(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(UpsertOutcome::Inserted);
        summary.record(UpsertOutcome::Inserted);
        summary.record(UpsertOutcome::Unchanged);

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_feedback_delta() {
        assert_eq!(Feedback::Correct.delta(), 1);
        assert_eq!(Feedback::Incorrect.delta(), -1);
    }
}
