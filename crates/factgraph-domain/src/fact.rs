//! Fact module - the fundamental unit of the fact graph

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Relation;

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Unique identifier for a fact based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability
/// - 128-bit uniqueness
/// - No coordination required between ingesting processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactId(u128);

impl FactId {
    /// Generate a new UUIDv7-based FactId
    ///
    /// # Examples
    ///
    /// ```
    /// use factgraph_domain::FactId;
    ///
    /// let id = FactId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a FactId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a FactId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use factgraph_domain::FactId;
    ///
    /// let id = FactId::new();
    /// let parsed = FactId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid fact id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// How a fact came to be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validation {
    /// Matches the curated entity registry; confidence is fixed at 1.0
    Baseline,
    /// Produced by the inference engine
    Derived,
    /// Supplied by the extraction collaborator, unverified
    Model,
    /// Manually confirmed or corrected by a user
    User,
}

impl Validation {
    /// Storage name of the validation tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Validation::Baseline => "baseline",
            Validation::Derived => "derived",
            Validation::Model => "model",
            Validation::User => "user",
        }
    }

    /// Parse a validation tag
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "baseline" => Some(Validation::Baseline),
            "derived" => Some(Validation::Derived),
            "model" => Some(Validation::Model),
            "user" => Some(Validation::User),
            _ => None,
        }
    }

    /// Whether this tag may lift a fact out of the feedback lock
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Validation::Baseline | Validation::User)
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Validation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid validation tag: {}", s))
    }
}

/// A fact - one subject–predicate–object statement with confidence
///
/// At most one fact exists per `(subject, predicate, object)` key; re-inserting
/// the same key merges through the store's upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    /// Unique identifier
    pub id: FactId,

    /// Subject entity id
    pub subject: String,

    /// Relation between subject and object
    pub predicate: Relation,

    /// Object entity id or literal
    pub object: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Origin reference (document id, URL, rule name)
    pub provenance: String,

    /// When the fact was extracted (seconds since Unix epoch)
    pub extracted_at: u64,

    /// How the fact is trusted
    pub validation: Validation,

    /// Net user feedback; negative values decay confidence
    pub feedback_score: i64,
}

impl Fact {
    /// Create a new fact stamped with a fresh id and the current time
    pub fn new(
        subject: impl Into<String>,
        predicate: Relation,
        object: impl Into<String>,
        confidence: f64,
        provenance: impl Into<String>,
        validation: Validation,
    ) -> Self {
        Self {
            id: FactId::new(),
            subject: subject.into(),
            predicate,
            object: object.into(),
            confidence,
            provenance: provenance.into(),
            extracted_at: current_timestamp(),
            validation,
            feedback_score: 0,
        }
    }

    /// Override the extraction timestamp
    pub fn extracted_at(mut self, timestamp: u64) -> Self {
        self.extracted_at = timestamp;
        self
    }

    /// The identity key of this fact
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.subject, self.predicate.as_str(), &self.object)
    }

    /// Whether two facts share the same `(subject, predicate, object)` key
    pub fn same_triple(&self, other: &Fact) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({:.2}, {})",
            self.subject, self.predicate, self.object, self.confidence, self.validation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_id_ordering() {
        let id1 = FactId::from_value(1000);
        let id2 = FactId::from_value(2000);

        assert!(id1 < id2);
    }

    #[test]
    fn test_fact_id_chronological() {
        let id1 = FactId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = FactId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort before later UUIDv7");
    }

    #[test]
    fn test_fact_id_invalid_string() {
        assert!(FactId::from_string("not-a-valid-uuid").is_err());
        assert!(FactId::from_string("").is_err());
    }

    #[test]
    fn test_validation_parse() {
        assert_eq!(Validation::parse("baseline"), Some(Validation::Baseline));
        assert_eq!(Validation::parse("MODEL"), Some(Validation::Model));
        assert_eq!(Validation::parse("guess"), None);
        assert!(Validation::User.is_authoritative());
        assert!(!Validation::Derived.is_authoritative());
    }

    #[test]
    fn test_same_triple_ignores_confidence() {
        let a = Fact::new("samsung", Relation::CompetesWith, "sk-hynix", 0.9, "doc:1", Validation::Model);
        let b = Fact::new("samsung", Relation::CompetesWith, "sk-hynix", 0.4, "doc:2", Validation::Model);
        let c = Fact::new("sk-hynix", Relation::CompetesWith, "samsung", 0.9, "doc:1", Validation::Model);

        assert!(a.same_triple(&b));
        assert!(!a.same_triple(&c));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: FactId ordering matches u128 ordering
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = FactId::from_value(a);
            let id_b = FactId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: Round-trip through string representation preserves the id
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = FactId::from_value(value);

            match FactId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
