//! Forward-chaining inference rules

use crate::error::store_error;
use crate::{narrative, ReasonerConfig, ReasonerError};
use factgraph_domain::confidence::{
    chain_confidence, discount_derived, COMPETITOR_CHAIN_DISCOUNT, SYMMETRY_DISCOUNT,
};
use factgraph_domain::{BatchSummary, Fact, FactStore, PathStep, Relation, TriplePattern, Validation};
use factgraph_registry::EntityRegistry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;

/// Inference rules that produce storable facts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `A supplies_to B`, `B supplies_to C` => `A indirectly_supplies C`
    TransitiveSupply,
    /// `A competes_with B` => `B competes_with A`
    SymmetricCompetition,
    /// `A competes_with B`, `B supplies_to C` => `A influences C`
    CompetitorChain,
}

impl Rule {
    /// Rule name, used in provenance as `rule:<name>`
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::TransitiveSupply => "transitive_supply",
            Rule::SymmetricCompetition => "symmetric_competition",
            Rule::CompetitorChain => "competitor_chain",
        }
    }

    fn provenance(&self) -> String {
        format!("rule:{}", self.as_str())
    }
}

/// A fact derived by a rule, with the premises that justify it
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// The derived fact, validation `derived`
    pub fact: Fact,
    /// Rule that produced it
    pub rule: Rule,
    /// Premise edges in order
    pub steps: Vec<PathStep>,
    /// Human-readable justification
    pub explanation: String,
}

type TripleKey = (String, Relation, String);

/// Stateless rule engine over a [`FactStore`]
///
/// Every call re-reads the store; nothing is cached between calls.
pub struct InferenceEngine {
    registry: Arc<EntityRegistry>,
    config: ReasonerConfig,
}

impl InferenceEngine {
    /// Create an engine over a registry
    pub fn new(registry: Arc<EntityRegistry>, config: ReasonerConfig) -> Self {
        Self { registry, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// Registry used for name resolution and explanations
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Canonical id for a name, or the name itself when it does not resolve
    pub fn canonical(&self, entity: &str) -> String {
        match self.registry.resolve(entity) {
            Some(id) => id.to_string(),
            None => entity.trim().to_string(),
        }
    }

    fn edges<S>(&self, store: &S, pattern: TriplePattern, min_confidence: f64) -> Result<Vec<Fact>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        store.query(&pattern, min_confidence).map_err(store_error)
    }

    fn derive(&self, rule: Rule, subject: &str, relation: Relation, object: &str, confidence: f64) -> Fact {
        Fact::new(
            subject,
            relation,
            object,
            confidence,
            rule.provenance(),
            Validation::Derived,
        )
    }

    /// Rule 1: two-hop supply chains
    ///
    /// Confidence is the weaker of the two premises.
    pub fn transitive_supply_chain<S>(&self, store: &S) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let supplies = self.edges(
            store,
            TriplePattern::any().predicate(Relation::SuppliesTo),
            self.config.min_confidence,
        )?;
        let by_subject = group_by_subject(&supplies);

        let mut derived = Vec::new();
        for first in &supplies {
            let Some(next) = by_subject.get(first.object.as_str()) else {
                continue;
            };
            for second in next {
                if second.object == first.subject {
                    continue;
                }
                let confidence = chain_confidence(&[first.confidence, second.confidence]);
                let steps = vec![step(first), step(second)];
                let explanation =
                    narrative::describe_transitive_supply(&self.registry, &steps[0], &steps[1], confidence);
                derived.push(Derivation {
                    fact: self.derive(
                        Rule::TransitiveSupply,
                        &first.subject,
                        Relation::IndirectlySupplies,
                        &second.object,
                        confidence,
                    ),
                    rule: Rule::TransitiveSupply,
                    steps,
                    explanation,
                });
            }
        }

        self.finish(store, Rule::TransitiveSupply, derived)
    }

    /// Rule 2: reverse direction of every competition fact
    ///
    /// Single-premise, so every stored `competes_with` fact is considered
    /// regardless of the edge threshold.
    pub fn symmetric_competition<S>(&self, store: &S) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let competes = self.edges(store, TriplePattern::any().predicate(Relation::CompetesWith), 0.0)?;

        let derived = competes
            .iter()
            .filter(|fact| fact.subject != fact.object)
            .map(|fact| {
                let confidence = discount_derived(&[fact.confidence], SYMMETRY_DISCOUNT);
                let premise = step(fact);
                let explanation = narrative::describe_symmetry(&self.registry, &premise, confidence);
                Derivation {
                    fact: self.derive(
                        Rule::SymmetricCompetition,
                        &fact.object,
                        Relation::CompetesWith,
                        &fact.subject,
                        confidence,
                    ),
                    rule: Rule::SymmetricCompetition,
                    steps: vec![premise],
                    explanation,
                }
            })
            .collect();

        self.finish(store, Rule::SymmetricCompetition, derived)
    }

    /// Rule 4: competitors of a supplier influence its customers
    pub fn competitor_chain_influence<S>(&self, store: &S) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let derived = self.competitor_chains(store, None)?;
        self.finish(store, Rule::CompetitorChain, derived)
    }

    /// Competitor-chain derivations starting at one entity
    ///
    /// Unlike [`competitor_chain_influence`](Self::competitor_chain_influence)
    /// this does not skip chains whose conclusion is already stored.
    pub fn competitor_chains_from<S>(&self, store: &S, entity: &str) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let origin = self.canonical(entity);
        let derived = self.competitor_chains(store, Some(&origin))?;
        Ok(strongest_per_triple(derived))
    }

    fn competitor_chains<S>(&self, store: &S, origin: Option<&str>) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let min = self.config.min_confidence;
        let competes = match origin {
            Some(entity) => {
                let mut facts = self.edges(
                    store,
                    TriplePattern::any().subject(entity).predicate(Relation::CompetesWith),
                    min,
                )?;
                facts.extend(self.edges(
                    store,
                    TriplePattern::any().predicate(Relation::CompetesWith).object(entity),
                    min,
                )?);
                facts
            }
            None => self.edges(store, TriplePattern::any().predicate(Relation::CompetesWith), min)?,
        };

        // competition is read in both directions, strongest claim per ordered pair
        let mut rivals: BTreeMap<(String, String), f64> = BTreeMap::new();
        for fact in &competes {
            for (a, b) in [(&fact.subject, &fact.object), (&fact.object, &fact.subject)] {
                if a == b || origin.is_some_and(|o| o != a.as_str()) {
                    continue;
                }
                let entry = rivals.entry((a.clone(), b.clone())).or_insert(fact.confidence);
                *entry = entry.max(fact.confidence);
            }
        }

        let mut derived = Vec::new();
        for ((a, b), rival_confidence) in &rivals {
            let supplies = self.edges(
                store,
                TriplePattern::any().subject(b.as_str()).predicate(Relation::SuppliesTo),
                min,
            )?;
            for supply in supplies.iter().filter(|s| &s.object != a) {
                let confidence =
                    discount_derived(&[*rival_confidence, supply.confidence], COMPETITOR_CHAIN_DISCOUNT);
                let rival = PathStep::new(a.as_str(), b.as_str(), Relation::CompetesWith, *rival_confidence);
                let link = step(supply);
                let explanation =
                    narrative::describe_competitor_chain(&self.registry, &rival, &link, confidence);
                derived.push(Derivation {
                    fact: self.derive(Rule::CompetitorChain, a, Relation::Influences, &supply.object, confidence),
                    rule: Rule::CompetitorChain,
                    steps: vec![rival, link],
                    explanation,
                });
            }
        }
        Ok(derived)
    }

    /// Rule 3, read-time: what `entity` depends on
    ///
    /// Combines inverted `supplies_to` facts with stored `depends_on` facts.
    /// Each step runs from `entity` to one of its suppliers.
    pub fn dependencies_of<S>(&self, store: &S, entity: &str) -> Result<Vec<PathStep>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let entity = self.canonical(entity);
        let min = self.config.min_confidence;
        let mut strongest: HashMap<String, f64> = HashMap::new();

        let inverted = self.edges(
            store,
            TriplePattern::any().predicate(Relation::SuppliesTo).object(entity.as_str()),
            min,
        )?;
        let stored = self.edges(
            store,
            TriplePattern::any().subject(entity.as_str()).predicate(Relation::DependsOn),
            min,
        )?;
        for (supplier, confidence) in inverted
            .iter()
            .map(|f| (&f.subject, f.confidence))
            .chain(stored.iter().map(|f| (&f.object, f.confidence)))
        {
            keep_max(&mut strongest, supplier, confidence);
        }

        Ok(into_steps(strongest, |supplier| (entity.clone(), supplier)))
    }

    /// Rule 3, read-time: what depends on `entity`
    ///
    /// Each step runs from a dependent to `entity`.
    pub fn dependents_of<S>(&self, store: &S, entity: &str) -> Result<Vec<PathStep>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let entity = self.canonical(entity);
        let min = self.config.min_confidence;
        let mut strongest: HashMap<String, f64> = HashMap::new();

        let customers = self.edges(
            store,
            TriplePattern::any().subject(entity.as_str()).predicate(Relation::SuppliesTo),
            min,
        )?;
        let stored = self.edges(
            store,
            TriplePattern::any().predicate(Relation::DependsOn).object(entity.as_str()),
            min,
        )?;
        for (dependent, confidence) in customers
            .iter()
            .map(|f| (&f.object, f.confidence))
            .chain(stored.iter().map(|f| (&f.subject, f.confidence)))
        {
            keep_max(&mut strongest, dependent, confidence);
        }

        Ok(into_steps(strongest, |dependent| (dependent, entity.clone())))
    }

    /// Run every storable rule and merge the results
    pub fn run_all<S>(&self, store: &S) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let mut derived = self.transitive_supply_chain(store)?;
        derived.extend(self.symmetric_competition(store)?);
        derived.extend(self.competitor_chain_influence(store)?);
        Ok(strongest_per_triple(derived))
    }

    /// Write derivations through the store's batch upsert
    ///
    /// Derived facts follow the same merge rule as any other fact, so they
    /// never displace a stronger stored claim.
    pub fn persist<S>(&self, store: &mut S, derivations: &[Derivation]) -> Result<BatchSummary, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        if derivations.is_empty() {
            return Ok(BatchSummary::default());
        }
        let facts = derivations.iter().map(|d| d.fact.clone()).collect();
        let summary = store.batch_upsert(facts).map_err(store_error)?;
        tracing::info!(
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "derived facts persisted"
        );
        Ok(summary)
    }

    /// Deduplicate, then drop conclusions the store already holds at
    /// equal or higher confidence or as a `baseline`/`user` fact
    fn finish<S>(&self, store: &S, rule: Rule, derived: Vec<Derivation>) -> Result<Vec<Derivation>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let candidates = strongest_per_triple(derived);
        let considered = candidates.len();

        let mut fresh = Vec::with_capacity(considered);
        for derivation in candidates {
            let fact = &derivation.fact;
            let existing = store
                .find(&fact.subject, &fact.predicate, &fact.object)
                .map_err(store_error)?;
            if existing.is_some_and(|e| e.validation.is_authoritative() || e.confidence >= fact.confidence) {
                continue;
            }
            fresh.push(derivation);
        }

        tracing::debug!(
            rule = rule.as_str(),
            considered,
            derived = fresh.len(),
            "inference rule evaluated"
        );
        Ok(fresh)
    }
}

fn step(fact: &Fact) -> PathStep {
    PathStep::new(fact.subject.as_str(), fact.object.as_str(), fact.predicate.clone(), fact.confidence)
}

fn group_by_subject(facts: &[Fact]) -> HashMap<&str, Vec<&Fact>> {
    let mut grouped: HashMap<&str, Vec<&Fact>> = HashMap::new();
    for fact in facts {
        grouped.entry(fact.subject.as_str()).or_default().push(fact);
    }
    grouped
}

fn keep_max(map: &mut HashMap<String, f64>, key: &str, confidence: f64) {
    let entry = map.entry(key.to_string()).or_insert(confidence);
    *entry = entry.max(confidence);
}

fn into_steps(strongest: HashMap<String, f64>, ends: impl Fn(String) -> (String, String)) -> Vec<PathStep> {
    let mut steps: Vec<PathStep> = strongest
        .into_iter()
        .map(|(other, confidence)| {
            let (from, to) = ends(other);
            PathStep::new(from, to, Relation::DependsOn, confidence)
        })
        .collect();
    steps.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    steps
}

/// One derivation per triple, the highest confidence one, in triple order
fn strongest_per_triple(derived: Vec<Derivation>) -> Vec<Derivation> {
    let mut best: BTreeMap<TripleKey, Derivation> = BTreeMap::new();
    for derivation in derived {
        let key = (
            derivation.fact.subject.clone(),
            derivation.fact.predicate.clone(),
            derivation.fact.object.clone(),
        );
        match best.get(&key) {
            Some(current) if current.fact.confidence >= derivation.fact.confidence => {}
            _ => {
                best.insert(key, derivation);
            }
        }
    }
    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use factgraph_domain::{FactId, Feedback, UpsertOutcome};

    /// In-memory store that keeps one fact per triple, highest confidence
    #[derive(Default)]
    struct MockStore {
        facts: Vec<Fact>,
    }

    impl MockStore {
        fn with(facts: &[(&str, Relation, &str, f64)]) -> Self {
            let mut store = Self::default();
            for (s, p, o, c) in facts {
                store
                    .upsert(Fact::new(*s, p.clone(), *o, *c, "test", Validation::Baseline))
                    .unwrap();
            }
            store
        }
    }

    impl FactStore for MockStore {
        type Error = String;

        fn upsert(&mut self, fact: Fact) -> Result<UpsertOutcome, Self::Error> {
            match self.facts.iter_mut().find(|f| f.same_triple(&fact)) {
                Some(existing) if existing.validation.is_authoritative() && fact.validation == Validation::Derived => {
                    Ok(UpsertOutcome::Unchanged)
                }
                Some(existing) if fact.confidence > existing.confidence => {
                    existing.confidence = fact.confidence;
                    Ok(UpsertOutcome::Updated)
                }
                Some(_) => Ok(UpsertOutcome::Unchanged),
                None => {
                    self.facts.push(fact);
                    Ok(UpsertOutcome::Inserted)
                }
            }
        }

        fn batch_upsert(&mut self, facts: Vec<Fact>) -> Result<BatchSummary, Self::Error> {
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

        fn delete(&mut self, id: FactId) -> Result<bool, Self::Error> {
            let before = self.facts.len();
            self.facts.retain(|f| f.id != id);
            Ok(self.facts.len() != before)
        }

        fn decay_confidence(&mut self, _id: FactId, _rate: f64) -> Result<Option<f64>, Self::Error> {
            Ok(None)
        }

        fn record_feedback(&mut self, _id: FactId, _feedback: Feedback) -> Result<Option<Fact>, Self::Error> {
            Ok(None)
        }
    }

    fn engine() -> InferenceEngine {
        InferenceEngine::new(Arc::new(EntityRegistry::empty()), ReasonerConfig::default())
    }

    #[test]
    fn test_transitive_supply_uses_weakest_link() {
        let store = MockStore::with(&[
            ("a", Relation::SuppliesTo, "b", 0.9),
            ("b", Relation::SuppliesTo, "c", 0.8),
            ("c", Relation::SuppliesTo, "a", 0.95),
        ]);

        let derived = engine().transitive_supply_chain(&store).unwrap();
        let a_to_c = derived
            .iter()
            .find(|d| d.fact.subject == "a" && d.fact.object == "c")
            .unwrap();
        assert_eq!(a_to_c.fact.predicate, Relation::IndirectlySupplies);
        assert_eq!(a_to_c.fact.confidence, 0.8);
        assert_eq!(a_to_c.fact.validation, Validation::Derived);
        assert_eq!(a_to_c.fact.provenance, "rule:transitive_supply");
        assert_eq!(a_to_c.steps.len(), 2);
        // a cycle never yields a self-loop
        assert!(derived.iter().all(|d| d.fact.subject != d.fact.object));
    }

    #[test]
    fn test_transitive_supply_ignores_weak_edges() {
        let store = MockStore::with(&[
            ("a", Relation::SuppliesTo, "b", 0.9),
            ("b", Relation::SuppliesTo, "c", 0.5),
        ]);
        assert!(engine().transitive_supply_chain(&store).unwrap().is_empty());
    }

    #[test]
    fn test_symmetric_competition_skips_existing_reverse() {
        let store = MockStore::with(&[
            ("a", Relation::CompetesWith, "b", 1.0),
            ("b", Relation::CompetesWith, "a", 0.96),
            ("c", Relation::CompetesWith, "d", 0.6),
        ]);

        let derived = engine().symmetric_competition(&store).unwrap();
        // b->a at 0.96 already beats 0.95; a->b at 1.0 beats 0.912
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].fact.key(), ("d", "competes_with", "c"));
        assert!((derived[0].fact.confidence - 0.57).abs() < 1e-9);
    }

    #[test]
    fn test_weaker_user_fact_blocks_conclusion() {
        let mut store = MockStore::with(&[("a", Relation::CompetesWith, "b", 1.0)]);
        store
            .upsert(Fact::new("b", Relation::CompetesWith, "a", 0.4, "user:review", Validation::User))
            .unwrap();

        assert!(engine().symmetric_competition(&store).unwrap().is_empty());
    }

    #[test]
    fn test_competitor_chain_confidence() {
        let store = MockStore::with(&[
            ("samsung", Relation::CompetesWith, "sk-hynix", 1.0),
            ("sk-hynix", Relation::SuppliesTo, "dell", 0.9),
        ]);

        let derived = engine().competitor_chain_influence(&store).unwrap();
        assert_eq!(derived.len(), 1);
        let chain = &derived[0];
        assert_eq!(chain.fact.key(), ("samsung", "influences", "dell"));
        assert!((chain.fact.confidence - 0.72).abs() < 1e-9);
        assert!(chain.explanation.contains("competes with"));
    }

    #[test]
    fn test_competitor_chain_skips_own_customer_loop() {
        let store = MockStore::with(&[
            ("a", Relation::CompetesWith, "b", 1.0),
            ("b", Relation::SuppliesTo, "a", 0.9),
        ]);
        assert!(engine().competitor_chain_influence(&store).unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_are_inverted_supply() {
        let store = MockStore::with(&[
            ("samsung", Relation::SuppliesTo, "dell", 0.9),
            ("dell", Relation::DependsOn, "samsung", 0.8),
            ("dell", Relation::DependsOn, "intel", 0.75),
        ]);
        let engine = engine();

        let deps = engine.dependencies_of(&store, "dell").unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!((deps[0].to.as_str(), deps[0].confidence), ("samsung", 0.9));
        assert_eq!(deps[1].to, "intel");
        assert!(deps.iter().all(|s| s.from == "dell" && s.relation == Relation::DependsOn));

        let dependents = engine.dependents_of(&store, "samsung").unwrap();
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].from, "dell");
    }

    #[test]
    fn test_persist_then_rerun_is_empty() {
        let mut store = MockStore::with(&[
            ("a", Relation::SuppliesTo, "b", 0.9),
            ("b", Relation::SuppliesTo, "c", 0.8),
            ("x", Relation::CompetesWith, "a", 0.9),
        ]);
        let engine = engine();

        let first = engine.run_all(&store).unwrap();
        assert!(!first.is_empty());
        let summary = engine.persist(&mut store, &first).unwrap();
        assert_eq!(summary.inserted, first.len());

        assert!(engine.run_all(&store).unwrap().is_empty());
    }
}
