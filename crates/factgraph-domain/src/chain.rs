//! Impact chains - multi-hop paths through the fact graph

use crate::Relation;

/// One edge of an impact chain
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// Entity the edge leaves
    pub from: String,
    /// Entity the edge reaches
    pub to: String,
    /// Relation carried by the edge
    pub relation: Relation,
    /// Confidence of the underlying fact
    pub confidence: f64,
}

impl PathStep {
    /// Create a new step
    pub fn new(from: impl Into<String>, to: impl Into<String>, relation: Relation, confidence: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation,
            confidence,
        }
    }
}

/// How a chain was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    /// Edges of a single relation followed hop by hop
    Traversal,
    /// Competitor of a supplier (competitor-chain influence)
    CompetitorChain,
}

/// A path between two entities with an aggregate confidence and rationale
///
/// Ephemeral: computed on demand, never persisted by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactChain {
    /// Entity the chain starts from
    pub source: String,
    /// Entity the chain ends at
    pub target: String,
    /// Ordered steps from source to target
    pub path: Vec<PathStep>,
    /// Combined confidence of the steps
    pub aggregate_confidence: f64,
    /// How the chain was established
    pub kind: ChainKind,
    /// Human-readable justification
    pub explanation: String,
}

impl ImpactChain {
    /// Number of edges in the chain
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the chain has no edges
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Entities visited in order, source first
    pub fn entities(&self) -> Vec<&str> {
        let mut entities = Vec::with_capacity(self.path.len() + 1);
        entities.push(self.source.as_str());
        entities.extend(self.path.iter().map(|step| step.to.as_str()));
        entities
    }
}
