//! Triple patterns for fact retrieval

use crate::{Fact, Relation};

/// A subject/predicate/object pattern where unset positions are wildcards
///
/// # Examples
///
/// ```
/// use factgraph_domain::{Relation, TriplePattern};
///
/// let outgoing = TriplePattern::any().subject("samsung");
/// let suppliers = TriplePattern::any().predicate(Relation::SuppliesTo).object("dell");
/// assert!(!outgoing.is_fully_bound());
/// assert!(suppliers.object.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriplePattern {
    /// Bound subject, if any
    pub subject: Option<String>,

    /// Bound predicate, if any
    pub predicate: Option<Relation>,

    /// Bound object, if any
    pub object: Option<String>,
}

impl TriplePattern {
    /// The empty pattern, matching every fact
    pub fn any() -> Self {
        Self::default()
    }

    /// Fully-bound pattern for an existence check
    pub fn exact(subject: impl Into<String>, predicate: Relation, object: impl Into<String>) -> Self {
        Self::any().subject(subject).predicate(predicate).object(object)
    }

    /// Bind the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Bind the predicate
    pub fn predicate(mut self, predicate: Relation) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Bind the object
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Whether all three positions are bound
    pub fn is_fully_bound(&self) -> bool {
        self.subject.is_some() && self.predicate.is_some() && self.object.is_some()
    }

    /// Whether no position is bound
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.predicate.is_none() && self.object.is_none()
    }

    /// Check a fact against the bound positions
    pub fn matches(&self, fact: &Fact) -> bool {
        self.subject.as_deref().map_or(true, |s| s == fact.subject)
            && self.predicate.as_ref().map_or(true, |p| *p == fact.predicate)
            && self.object.as_deref().map_or(true, |o| o == fact.object)
    }
}
