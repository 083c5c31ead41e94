//! Candidate facts as handed over by the extraction collaborator

use serde::{Deserialize, Serialize};

/// Who produced a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    /// Automatic extraction; unverified
    #[default]
    Extraction,
    /// Manual confirmation or correction
    User,
}

/// An unvalidated fact with free-text subject and object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFact {
    /// Subject name, alias, or id
    pub subject: String,

    /// Predicate name
    pub predicate: String,

    /// Object name, alias, id, or literal
    pub object: String,

    /// Certainty reported by the producer
    pub confidence: f64,

    /// Origin reference
    #[serde(default)]
    pub provenance: String,

    /// Producer of the candidate
    #[serde(default)]
    pub source: CandidateSource,

    /// Extraction time (seconds since Unix epoch); defaults to ingestion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<u64>,
}

impl CandidateFact {
    /// Create an extraction-sourced candidate
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        confidence: f64,
        provenance: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            confidence,
            provenance: provenance.into(),
            source: CandidateSource::Extraction,
            extracted_at: None,
        }
    }

    /// Mark the candidate as a user confirmation or correction
    pub fn from_user(mut self) -> Self {
        self.source = CandidateSource::User;
        self
    }

    /// Set the extraction time
    pub fn extracted_at(mut self, timestamp: u64) -> Self {
        self.extracted_at = Some(timestamp);
        self
    }
}
