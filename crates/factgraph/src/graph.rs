//! The assembled system: store, registry and every component over them

use crate::{FactgraphConfig, Result};
use factgraph_domain::{
    BatchSummary, Fact, FactId, FactStore, Feedback, ImpactChain, QualityIssue, Relation, TriplePattern,
};
use factgraph_gatekeeper::{CandidateFact, Gatekeeper, IngestReport};
use factgraph_janitor::{Janitor, JanitorMetrics};
use factgraph_reasoner::{CompetitorNetwork, Derivation, ImpactAnalyzer, ImpactReport, InferenceEngine};
use factgraph_registry::EntityRegistry;
use factgraph_store::SqliteStore;
use std::sync::Arc;

/// A fact store wired to its registry, ingestion, reasoning and quality checks
///
/// # Examples
///
/// ```no_run
/// use factgraph::{CandidateFact, Factgraph, FactgraphConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = Factgraph::open(FactgraphConfig::from_file("factgraph.toml")?)?;
/// graph.seed_baseline()?;
///
/// let report = graph.ingest(vec![CandidateFact::new("SK Hynix", "supplies_to", "Dell", 0.9, "doc:1")])?;
/// println!("{}", report.summary());
///
/// let impact = graph.analyze_impact("Samsung")?;
/// println!("{}", impact.narrative);
/// # Ok(())
/// # }
/// ```
pub struct Factgraph {
    store: SqliteStore,
    registry: Arc<EntityRegistry>,
    gatekeeper: Gatekeeper,
    engine: InferenceEngine,
    analyzer: ImpactAnalyzer,
    janitor: Janitor,
}

impl Factgraph {
    /// Open the store and load the registry named by `config`
    pub fn open(config: FactgraphConfig) -> Result<Self> {
        let registry = match &config.registry_path {
            Some(path) => EntityRegistry::from_file(path)?,
            None => EntityRegistry::empty(),
        };
        let store = match &config.database_path {
            Some(path) => SqliteStore::new(path)?,
            None => SqliteStore::in_memory()?,
        };

        tracing::info!(
            database = ?config.database_path,
            entities = registry.len(),
            "factgraph opened"
        );
        Ok(Self::with_parts(store, registry, config))
    }

    /// Assemble from an already opened store and a constructed registry
    pub fn with_parts(store: SqliteStore, registry: EntityRegistry, config: FactgraphConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            store,
            gatekeeper: Gatekeeper::new(registry.clone(), config.gatekeeper),
            engine: InferenceEngine::new(registry.clone(), config.reasoner.clone()),
            analyzer: ImpactAnalyzer::new(registry.clone(), config.reasoner),
            janitor: Janitor::new(config.janitor),
            registry,
        }
    }

    /// The backing store
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// The backing store, for direct writes
    pub fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }

    /// The entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Materialize every curated registry relation as a `baseline` fact
    pub fn seed_baseline(&mut self) -> Result<BatchSummary> {
        let facts = self.registry.baseline_facts();
        let summary = self.store.batch_upsert(facts)?;
        tracing::info!(inserted = summary.inserted, updated = summary.updated, "baseline seeded");
        Ok(summary)
    }

    /// Resolve, tag and store extracted candidates
    pub fn ingest(&mut self, candidates: Vec<CandidateFact>) -> Result<IngestReport> {
        Ok(self.gatekeeper.ingest(&mut self.store, candidates)?)
    }

    /// Pattern query; bound entity names are resolved through the registry
    pub fn query(&self, pattern: &TriplePattern, min_confidence: f64) -> Result<Vec<Fact>> {
        let mut resolved = pattern.clone();
        resolved.subject = pattern.subject.as_deref().map(|s| self.engine.canonical(s));
        if pattern.predicate.as_ref().is_none_or(Relation::is_entity_valued) {
            resolved.object = pattern.object.as_deref().map(|o| self.engine.canonical(o));
        }
        Ok(self.store.query(&resolved, min_confidence)?)
    }

    /// Record a user vote on a fact
    pub fn record_feedback(&mut self, id: FactId, feedback: Feedback) -> Result<Option<Fact>> {
        Ok(self.store.record_feedback(id, feedback)?)
    }

    /// Run every inference rule without writing
    pub fn infer(&self) -> Result<Vec<Derivation>> {
        Ok(self.engine.run_all(&self.store)?)
    }

    /// Run every inference rule and store the conclusions
    pub fn infer_and_persist(&mut self) -> Result<BatchSummary> {
        let derivations = self.engine.run_all(&self.store)?;
        Ok(self.engine.persist(&mut self.store, &derivations)?)
    }

    /// Paths of up to `max_depth` edges along `relation` from `start`
    pub fn trace_chain(&self, start: &str, relation: &Relation, max_depth: usize) -> Result<Vec<ImpactChain>> {
        Ok(self.analyzer.trace_chain(&self.store, start, relation, max_depth)?)
    }

    /// Competitors and competitors-of-competitors
    pub fn competitor_network(&self, entity: &str) -> Result<CompetitorNetwork> {
        Ok(self.analyzer.competitor_network(&self.store, entity)?)
    }

    /// Direct, indirect and industry-level impact of a change at `entity`
    pub fn analyze_impact(&self, entity: &str) -> Result<ImpactReport> {
        Ok(self.analyzer.analyze_impact(&self.store, entity)?)
    }

    /// Read-only scan for duplicates, contradictions, weak and stale facts
    pub fn run_quality_scan(&mut self) -> Result<Vec<QualityIssue>> {
        Ok(self.janitor.run_quality_scan(&self.store)?)
    }

    /// Keep the strongest row of every duplicate group
    pub fn merge_duplicates(&mut self) -> Result<usize> {
        Ok(self.janitor.merge_duplicates(&mut self.store)?)
    }

    /// Delete facts below `threshold`
    pub fn delete_low_confidence(&mut self, threshold: f64) -> Result<usize> {
        Ok(self.janitor.delete_low_confidence(&mut self.store, threshold)?)
    }

    /// Decay `model` facts older than `age_days`
    pub fn decay_stale(&mut self, age_days: u64, rate: f64) -> Result<usize> {
        Ok(self.janitor.decay_stale(&mut self.store, age_days, rate)?)
    }

    /// Every automatic remediation with the configured values
    pub fn remediate(&mut self) -> Result<JanitorMetrics> {
        Ok(self.janitor.remediate(&mut self.store)?)
    }

    /// Counters accumulated by scans and remediation
    pub fn janitor_metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }
}
