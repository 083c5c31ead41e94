//! Impact analysis: bounded path search, competitor networks and reports

use crate::error::store_error;
use crate::{narrative, InferenceEngine, ReasonerConfig, ReasonerError};
use factgraph_domain::confidence::chain_confidence;
use factgraph_domain::{ChainKind, FactStore, ImpactChain, PathStep, Relation, Severity, TriplePattern};
use factgraph_registry::EntityRegistry;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::sync::Arc;

/// Severity of one-hop relations
pub const DIRECT_SEVERITY: Severity = Severity::High;

/// Severity of multi-hop chains
pub const INDIRECT_SEVERITY: Severity = Severity::Medium;

/// Severity of same-industry ripple effects
pub const RIPPLE_SEVERITY: Severity = Severity::Low;

/// Relations reported as direct impact; derived predicates are excluded
const DIRECT_RELATIONS: [Relation; 5] = [
    Relation::CompetesWith,
    Relation::SuppliesTo,
    Relation::DependsOn,
    Relation::SubsidiaryOf,
    Relation::PartnersWith,
];

/// An entity one hop away from the analyzed one
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactedEntity {
    /// The affected entity
    pub entity: String,
    /// Relation of the connecting fact
    pub relation: Relation,
    /// Confidence of the connecting fact
    pub confidence: f64,
    /// Always [`DIRECT_SEVERITY`]
    pub severity: Severity,
    /// Description of the connecting fact
    pub reason: String,
}

/// An entity affected only through its industry
#[derive(Debug, Clone, PartialEq)]
pub struct RippleEffect {
    /// The affected entity
    pub entity: String,
    /// Name of the category linking it to the analyzed entity
    pub category: String,
    /// Always [`RIPPLE_SEVERITY`]
    pub severity: Severity,
}

/// Competitors and competitors-of-competitors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitorNetwork {
    /// One-hop competitors, sorted
    pub direct: Vec<String>,
    /// Competitors of direct competitors, minus the origin and `direct`, sorted
    pub indirect: Vec<String>,
}

/// Answer to "what does a change to X affect"
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactReport {
    /// Canonical id of the analyzed entity
    pub entity: String,
    /// One-hop relations
    pub direct: Vec<ImpactedEntity>,
    /// Multi-hop supply chains and competitor-chain influences, all
    /// [`INDIRECT_SEVERITY`]
    pub indirect: Vec<ImpactChain>,
    /// Same or related category members not reached otherwise
    pub industry_ripple: Vec<RippleEffect>,
    /// Plain-text summary
    pub narrative: String,
}

/// Path search and impact reporting over a [`FactStore`]
pub struct ImpactAnalyzer {
    registry: Arc<EntityRegistry>,
    config: ReasonerConfig,
    engine: InferenceEngine,
}

impl ImpactAnalyzer {
    /// Create an analyzer
    pub fn new(registry: Arc<EntityRegistry>, config: ReasonerConfig) -> Self {
        let engine = InferenceEngine::new(registry.clone(), config.clone());
        Self {
            registry,
            config,
            engine,
        }
    }

    /// The rule engine used for read-time inversions and competitor chains
    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    fn outgoing<S>(&self, store: &S, node: &str, relation: &Relation) -> Result<Vec<PathStep>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        if *relation == Relation::DependsOn {
            return self.engine.dependencies_of(store, node);
        }
        let facts = store
            .query(
                &TriplePattern::any().subject(node).predicate(relation.clone()),
                self.config.min_confidence,
            )
            .map_err(store_error)?;
        Ok(facts
            .into_iter()
            .map(|f| PathStep::new(f.subject, f.object, f.predicate, f.confidence))
            .collect())
    }

    /// Every simple path of 1..=`max_depth` edges along `relation` from `start`
    ///
    /// Paths never revisit an entity, so cycles cannot extend a path. Results
    /// are ordered by aggregate confidence (weakest link), strongest first,
    /// then shorter paths, then target id. `max_depth == 0` yields nothing.
    /// `depends_on` is followed through the read-time supply inversion.
    pub fn trace_chain<S>(
        &self,
        store: &S,
        start: &str,
        relation: &Relation,
        max_depth: usize,
    ) -> Result<Vec<ImpactChain>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let start = self.engine.canonical(start);
        let mut adjacency: HashMap<String, Vec<PathStep>> = HashMap::new();
        let mut queue: VecDeque<Vec<PathStep>> = VecDeque::from([Vec::new()]);
        let mut chains = Vec::new();

        while let Some(path) = queue.pop_front() {
            if path.len() >= max_depth {
                continue;
            }
            let node = path.last().map_or(start.as_str(), |s| s.to.as_str()).to_string();
            if !adjacency.contains_key(&node) {
                let edges = self.outgoing(store, &node, relation)?;
                adjacency.insert(node.clone(), edges);
            }
            let Some(edges) = adjacency.get(&node) else {
                continue;
            };

            for edge in edges {
                let revisits = edge.to == start || path.iter().any(|s| s.to == edge.to);
                if revisits {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(edge.clone());
                chains.push(self.chain(&start, &extended));
                queue.push_back(extended);
            }
        }

        chains.sort_by(|a, b| {
            b.aggregate_confidence
                .total_cmp(&a.aggregate_confidence)
                .then_with(|| a.len().cmp(&b.len()))
                .then_with(|| a.target.cmp(&b.target))
        });

        tracing::debug!(
            start = %start,
            relation = %relation,
            max_depth,
            paths = chains.len(),
            "chain traced"
        );
        Ok(chains)
    }

    fn chain(&self, start: &str, path: &[PathStep]) -> ImpactChain {
        let confidences: Vec<f64> = path.iter().map(|s| s.confidence).collect();
        let aggregate = chain_confidence(&confidences);
        ImpactChain {
            source: start.to_string(),
            target: path.last().map_or_else(|| start.to_string(), |s| s.to.clone()),
            path: path.to_vec(),
            aggregate_confidence: aggregate,
            kind: ChainKind::Traversal,
            explanation: narrative::describe_path(&self.registry, path, aggregate),
        }
    }

    fn competitors<S>(&self, store: &S, entity: &str) -> Result<BTreeSet<String>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let min = self.config.min_confidence;
        let outgoing = store
            .query(&TriplePattern::any().subject(entity).predicate(Relation::CompetesWith), min)
            .map_err(store_error)?;
        let incoming = store
            .query(&TriplePattern::any().predicate(Relation::CompetesWith).object(entity), min)
            .map_err(store_error)?;

        Ok(outgoing
            .into_iter()
            .map(|f| f.object)
            .chain(incoming.into_iter().map(|f| f.subject))
            .filter(|other| other != entity)
            .collect())
    }

    /// One-hop competitors and their competitors
    ///
    /// Competition is read in both directions. `indirect` never contains
    /// the origin or any member of `direct`.
    pub fn competitor_network<S>(&self, store: &S, entity: &str) -> Result<CompetitorNetwork, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let origin = self.engine.canonical(entity);
        let direct = self.competitors(store, &origin)?;

        let mut indirect = BTreeSet::new();
        for competitor in &direct {
            indirect.extend(self.competitors(store, competitor)?);
        }
        indirect.remove(&origin);
        let indirect = indirect.difference(&direct).cloned().collect();

        Ok(CompetitorNetwork {
            direct: direct.into_iter().collect(),
            indirect,
        })
    }

    fn direct_impacts<S>(&self, store: &S, origin: &str) -> Result<Vec<ImpactedEntity>, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let min = self.config.min_confidence;
        let outgoing = store
            .query(&TriplePattern::any().subject(origin), min)
            .map_err(store_error)?;
        let incoming = store
            .query(&TriplePattern::any().object(origin), min)
            .map_err(store_error)?;

        let mut strongest: HashMap<(String, Relation), ImpactedEntity> = HashMap::new();
        for fact in outgoing.iter().chain(incoming.iter()) {
            if !DIRECT_RELATIONS.contains(&fact.predicate) || fact.subject == fact.object {
                continue;
            }
            let other = if fact.subject == origin { &fact.object } else { &fact.subject };
            let step = PathStep::new(
                fact.subject.as_str(),
                fact.object.as_str(),
                fact.predicate.clone(),
                fact.confidence,
            );
            let candidate = ImpactedEntity {
                entity: other.clone(),
                relation: fact.predicate.clone(),
                confidence: fact.confidence,
                severity: DIRECT_SEVERITY,
                reason: narrative::describe_step(&self.registry, &step),
            };
            let key = (other.clone(), fact.predicate.clone());
            match strongest.get(&key) {
                Some(current) if current.confidence >= candidate.confidence => {}
                _ => {
                    strongest.insert(key, candidate);
                }
            }
        }

        let mut direct: Vec<ImpactedEntity> = strongest.into_values().collect();
        direct.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.entity.cmp(&b.entity))
                .then_with(|| a.relation.cmp(&b.relation))
        });
        Ok(direct)
    }

    fn industry_ripple(&self, origin: &str, reached: &HashSet<String>) -> Vec<RippleEffect> {
        let own = self.registry.categories_of(origin);
        let related: Vec<&str> = own
            .iter()
            .flat_map(|c| c.related.iter().map(String::as_str))
            .collect();

        let mut ripple = Vec::new();
        let mut seen = HashSet::new();
        let members = self
            .registry
            .same_category(origin)
            .into_iter()
            .map(|id| (id, true))
            .chain(self.registry.related_category_members(origin).into_iter().map(|id| (id, false)));

        for (member, shares_category) in members {
            let member = member.to_string();
            if reached.contains(&member) || !seen.insert(member.clone()) {
                continue;
            }
            let category = self.registry.categories_of(&member).into_iter().find(|c| {
                if shares_category {
                    own.iter().any(|o| o.id == c.id)
                } else {
                    related.contains(&c.id.as_str())
                }
            });
            if let Some(category) = category {
                ripple.push(RippleEffect {
                    entity: member,
                    category: category.name.clone(),
                    severity: RIPPLE_SEVERITY,
                });
            }
        }
        ripple
    }

    /// Direct relations, indirect chains and industry ripple of one entity
    pub fn analyze_impact<S>(&self, store: &S, entity: &str) -> Result<ImpactReport, ReasonerError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let origin = self.engine.canonical(entity);
        let direct = self.direct_impacts(store, &origin)?;

        let mut indirect: Vec<ImpactChain> = self
            .trace_chain(store, &origin, &Relation::SuppliesTo, self.config.max_depth)?
            .into_iter()
            .filter(|chain| chain.len() >= 2)
            .collect();
        indirect.extend(
            self.engine
                .competitor_chains_from(store, &origin)?
                .into_iter()
                .map(|d| ImpactChain {
                    source: d.fact.subject,
                    target: d.fact.object,
                    path: d.steps,
                    aggregate_confidence: d.fact.confidence,
                    kind: ChainKind::CompetitorChain,
                    explanation: d.explanation,
                }),
        );
        indirect.sort_by(|a, b| {
            b.aggregate_confidence
                .total_cmp(&a.aggregate_confidence)
                .then_with(|| a.target.cmp(&b.target))
                .then_with(|| a.len().cmp(&b.len()))
        });

        let mut reached: HashSet<String> = direct.iter().map(|d| d.entity.clone()).collect();
        reached.extend(indirect.iter().map(|c| c.target.clone()));
        reached.insert(origin.clone());
        let industry_ripple = self.industry_ripple(&origin, &reached);

        let mut report = ImpactReport {
            entity: origin,
            direct,
            indirect,
            industry_ripple,
            narrative: String::new(),
        };
        report.narrative = narrative::describe_report(&self.registry, &report);

        tracing::info!(
            entity = %report.entity,
            direct = report.direct.len(),
            indirect = report.indirect.len(),
            ripple = report.industry_ripple.len(),
            "impact analyzed"
        );
        Ok(report)
    }
}
