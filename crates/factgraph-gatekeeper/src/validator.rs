//! Candidate validation and ingestion

use crate::{CandidateFact, CandidateSource, GatekeeperConfig, GatekeeperError};
use factgraph_domain::confidence::{self, BASELINE_CONFIDENCE};
use factgraph_domain::{current_timestamp, Fact, FactId, FactStore, Relation, Validation};
use factgraph_registry::EntityRegistry;
use std::fmt;
use std::sync::Arc;

/// Reasons a candidate is not stored
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Confidence is NaN or outside [0.0, 1.0]
    InvalidConfidence {
        /// Reported value
        value: f64,
    },

    /// Confidence below the configured minimum
    BelowThreshold {
        /// Reported value
        value: f64,
        /// Configured minimum
        minimum: f64,
    },

    /// Predicate is empty
    EmptyPredicate,

    /// Subject or object does not resolve against the registry
    UnresolvedEntity {
        /// `subject` or `object`
        field: &'static str,
        /// Text that failed to resolve
        value: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InvalidConfidence { value } => {
                write!(f, "confidence {} is outside [0.0, 1.0]", value)
            }
            RejectionReason::BelowThreshold { value, minimum } => {
                write!(f, "confidence {} is below the minimum {}", value, minimum)
            }
            RejectionReason::EmptyPredicate => write!(f, "predicate is empty"),
            RejectionReason::UnresolvedEntity { field, value } => {
                write!(f, "{} '{}' does not resolve to a known entity", field, value)
            }
        }
    }
}

/// A rejected candidate and why
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the candidate in the submitted batch
    pub index: usize,
    /// The candidate as submitted
    pub candidate: CandidateFact,
    /// Why it was rejected
    pub reason: RejectionReason,
}

/// Outcome of one ingestion call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Accepted candidates handed to the store
    pub processed: usize,
    /// Accepted candidates stored as new facts
    pub inserted: usize,
    /// Accepted candidates that replaced a weaker fact
    pub updated: usize,
    /// Accepted candidates that left the store untouched
    pub unchanged: usize,
    /// Candidates that failed validation
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    /// Number of rejected candidates
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Number of candidates submitted
    pub fn total(&self) -> usize {
        self.processed + self.rejected.len()
    }

    /// One-line report: "N facts processed, M rejected"
    pub fn summary(&self) -> String {
        format!("{} facts processed, {} rejected", self.processed, self.rejected.len())
    }
}

/// The Gatekeeper validates candidates before storage
pub struct Gatekeeper {
    registry: Arc<EntityRegistry>,
    config: GatekeeperConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper over a registry
    pub fn new(registry: Arc<EntityRegistry>, config: GatekeeperConfig) -> Self {
        Self { registry, config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config(registry: Arc<EntityRegistry>) -> Self {
        Self::new(registry, GatekeeperConfig::default())
    }

    /// The registry used for resolution
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Turn a candidate into a storable fact, or say why it cannot be stored
    ///
    /// Resolution maps names and aliases to canonical ids. A resolved triple
    /// matching the registry becomes `baseline` at confidence 1.0; a user
    /// candidate keeps its confidence as `user`; everything else is capped and
    /// tagged `model`.
    pub fn validate(&self, candidate: &CandidateFact) -> Result<Fact, RejectionReason> {
        if !confidence::is_valid_confidence(candidate.confidence) {
            return Err(RejectionReason::InvalidConfidence {
                value: candidate.confidence,
            });
        }
        if candidate.confidence < self.config.min_candidate_confidence {
            return Err(RejectionReason::BelowThreshold {
                value: candidate.confidence,
                minimum: self.config.min_candidate_confidence,
            });
        }
        if candidate.predicate.trim().is_empty() {
            return Err(RejectionReason::EmptyPredicate);
        }

        let predicate = Relation::parse(&candidate.predicate);

        let subject = self
            .registry
            .resolve(&candidate.subject)
            .ok_or_else(|| RejectionReason::UnresolvedEntity {
                field: "subject",
                value: candidate.subject.clone(),
            })?;

        // Literal objects only resolve on an exact name or alias
        let resolved = if predicate.is_entity_valued() || !self.config.allow_literal_objects {
            self.registry.resolve(&candidate.object)
        } else {
            self.registry.resolve_exact(&candidate.object)
        };
        let object = match resolved {
            Some(id) => id.to_string(),
            None if !predicate.is_entity_valued()
                && self.config.allow_literal_objects
                && !candidate.object.trim().is_empty() =>
            {
                candidate.object.trim().to_string()
            }
            None => {
                return Err(RejectionReason::UnresolvedEntity {
                    field: "object",
                    value: candidate.object.clone(),
                })
            }
        };

        let (confidence, validation) = if self.registry.is_baseline(subject.as_str(), &predicate, &object) {
            (BASELINE_CONFIDENCE, Validation::Baseline)
        } else {
            match candidate.source {
                CandidateSource::User => (candidate.confidence, Validation::User),
                CandidateSource::Extraction => (confidence::cap_model(candidate.confidence), Validation::Model),
            }
        };

        Ok(Fact {
            id: FactId::new(),
            subject: subject.to_string(),
            predicate,
            object,
            confidence,
            provenance: candidate.provenance.clone(),
            extracted_at: candidate.extracted_at.unwrap_or_else(current_timestamp),
            validation,
            feedback_score: 0,
        })
    }

    /// Validate every candidate and store the accepted ones in one batch
    ///
    /// Rejections are counted and returned, never silently dropped. A store
    /// failure aborts the call with nothing written.
    pub fn ingest<S: FactStore>(
        &self,
        store: &mut S,
        candidates: Vec<CandidateFact>,
    ) -> Result<IngestReport, GatekeeperError>
    where
        S::Error: std::fmt::Display,
    {
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            match self.validate(&candidate) {
                Ok(fact) => accepted.push(fact),
                Err(reason) => {
                    tracing::debug!(index, %reason, "candidate rejected");
                    rejected.push(Rejection {
                        index,
                        candidate,
                        reason,
                    });
                }
            }
        }

        let processed = accepted.len();
        let summary = store
            .batch_upsert(accepted)
            .map_err(|e| GatekeeperError::Store(e.to_string()))?;

        let report = IngestReport {
            processed,
            inserted: summary.inserted,
            updated: summary.updated,
            unchanged: summary.unchanged,
            rejected,
        };

        tracing::info!(
            processed = report.processed,
            rejected = report.rejected_count(),
            inserted = report.inserted,
            updated = report.updated,
            "ingestion complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factgraph_domain::{BatchSummary, Feedback, TriplePattern, UpsertOutcome};

    fn registry() -> Arc<EntityRegistry> {
        Arc::new(
            EntityRegistry::from_toml_str(
                r#"
                [[entities]]
                id = "samsung"
                name = "Samsung Electronics"
                aliases = ["Samsung"]
                competitors = ["sk-hynix"]

                [[entities]]
                id = "sk-hynix"
                name = "SK Hynix"

                [[entities]]
                id = "dell"
                name = "Dell Technologies"
                "#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_baseline_match_gets_full_confidence() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsung", "competes_with", "SK Hynix", 0.4, "doc:1");

        let fact = gatekeeper.validate(&candidate).unwrap();
        assert_eq!(fact.subject, "samsung");
        assert_eq!(fact.object, "sk-hynix");
        assert_eq!(fact.confidence, 1.0);
        assert_eq!(fact.validation, Validation::Baseline);
    }

    #[test]
    fn test_model_fact_is_capped() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsung", "supplies_to", "Dell", 0.97, "doc:1");

        let fact = gatekeeper.validate(&candidate).unwrap();
        assert_eq!(fact.confidence, 0.85);
        assert_eq!(fact.validation, Validation::Model);
    }

    #[test]
    fn test_user_fact_keeps_confidence() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsung", "supplies_to", "Dell", 0.97, "user:alice").from_user();

        let fact = gatekeeper.validate(&candidate).unwrap();
        assert_eq!(fact.confidence, 0.97);
        assert_eq!(fact.validation, Validation::User);
    }

    #[test]
    fn test_unresolved_subject_rejected() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Micron", "competes_with", "Samsung", 0.8, "doc:1");

        assert_eq!(
            gatekeeper.validate(&candidate),
            Err(RejectionReason::UnresolvedEntity {
                field: "subject",
                value: "Micron".to_string()
            })
        );
    }

    #[test]
    fn test_literal_object_allowed_for_unknown_predicate() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsung", "headquartered_in", "Suwon", 0.8, "doc:1");

        let fact = gatekeeper.validate(&candidate).unwrap();
        assert_eq!(fact.object, "Suwon");
        assert_eq!(fact.predicate, Relation::Other("headquartered_in".to_string()));

        let strict = Gatekeeper::new(registry(), GatekeeperConfig::strict());
        assert!(matches!(
            strict.validate(&candidate),
            Err(RejectionReason::UnresolvedEntity { field: "object", .. })
        ));
    }

    #[test]
    fn test_literal_object_mentioning_an_entity_is_kept() {
        let gatekeeper = Gatekeeper::default_config(registry());

        let literal = CandidateFact::new("Samsung", "headquartered_in", "Samsung Digital City, Suwon", 0.8, "doc:1");
        let fact = gatekeeper.validate(&literal).unwrap();
        assert_eq!(fact.object, "Samsung Digital City, Suwon");

        let alias = CandidateFact::new("SK Hynix", "customer_of_record", "Samsung", 0.8, "doc:1");
        assert_eq!(gatekeeper.validate(&alias).unwrap().object, "samsung");
    }

    #[test]
    fn test_unrelated_name_is_not_swallowed_by_short_alias() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsungite Labs", "competes_with", "Samsung", 0.8, "doc:1");

        assert_eq!(
            gatekeeper.validate(&candidate),
            Err(RejectionReason::UnresolvedEntity {
                field: "subject",
                value: "Samsungite Labs".to_string()
            })
        );
    }

    #[test]
    fn test_entity_valued_object_must_resolve() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let candidate = CandidateFact::new("Samsung", "supplies_to", "Acme Widgets", 0.8, "doc:1");

        assert!(matches!(
            gatekeeper.validate(&candidate),
            Err(RejectionReason::UnresolvedEntity { field: "object", .. })
        ));
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let gatekeeper = Gatekeeper::default_config(registry());

        for value in [1.5, -0.1, f64::NAN] {
            let candidate = CandidateFact::new("Samsung", "supplies_to", "Dell", value, "doc:1");
            assert!(matches!(
                gatekeeper.validate(&candidate),
                Err(RejectionReason::InvalidConfidence { .. })
            ));
        }
    }

    #[test]
    fn test_ingest_counts_rejections() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let mut store = MockStore::default();

        let report = gatekeeper
            .ingest(
                &mut store,
                vec![
                    CandidateFact::new("Samsung", "supplies_to", "Dell", 0.9, "doc:1"),
                    CandidateFact::new("Micron", "supplies_to", "Dell", 0.9, "doc:1"),
                    CandidateFact::new("SK Hynix", "competes_with", "Samsung", 0.7, "doc:2"),
                ],
            )
            .unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert_eq!(report.summary(), "2 facts processed, 1 rejected");
        assert_eq!(store.facts.len(), 2);
    }

    #[test]
    fn test_ingest_propagates_store_failure() {
        let gatekeeper = Gatekeeper::default_config(registry());
        let mut store = MockStore {
            fail: true,
            ..Default::default()
        };

        let result = gatekeeper.ingest(
            &mut store,
            vec![CandidateFact::new("Samsung", "supplies_to", "Dell", 0.9, "doc:1")],
        );
        assert!(matches!(result, Err(GatekeeperError::Store(_))));
    }

    // Mock store for testing (append-only, optional failure)
    #[derive(Default)]
    struct MockStore {
        facts: Vec<Fact>,
        fail: bool,
    }

    impl FactStore for MockStore {
        type Error = String;

        fn upsert(&mut self, fact: Fact) -> Result<UpsertOutcome, Self::Error> {
            self.facts.push(fact);
            Ok(UpsertOutcome::Inserted)
        }

        fn batch_upsert(&mut self, facts: Vec<Fact>) -> Result<BatchSummary, Self::Error> {
            if self.fail {
                return Err("store unavailable".to_string());
            }
            let mut summary = BatchSummary::default();
            for fact in facts {
                summary.record(self.upsert(fact)?);
            }
            Ok(summary)
        }

        fn get_fact(&self, id: FactId) -> Result<Option<Fact>, Self::Error> {
            Ok(self.facts.iter().find(|f| f.id == id).cloned())
        }

        fn query(&self, pattern: &TriplePattern, min_confidence: f64) -> Result<Vec<Fact>, Self::Error> {
            Ok(self
                .facts
                .iter()
                .filter(|f| pattern.matches(f) && f.confidence >= min_confidence)
                .cloned()
                .collect())
        }

        fn delete(&mut self, _id: FactId) -> Result<bool, Self::Error> {
            Ok(false)
        }

        fn decay_confidence(&mut self, _id: FactId, _rate: f64) -> Result<Option<f64>, Self::Error> {
            Ok(None)
        }

        fn record_feedback(&mut self, _id: FactId, _feedback: Feedback) -> Result<Option<Fact>, Self::Error> {
            Ok(None)
        }
    }
}
