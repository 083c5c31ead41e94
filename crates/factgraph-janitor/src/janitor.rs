//! Core Janitor implementation for quality scans and remediation

use crate::error::store_error;
use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use factgraph_domain::{
    current_timestamp, Fact, FactId, FactStore, IssueKind, QualityIssue, Relation, Severity, Validation,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

const SECONDS_PER_DAY: u64 = 86_400;

type TripleKey<'a> = (&'a str, &'a Relation, &'a str);

/// Data-quality monitor over a [`FactStore`]
///
/// Responsible for:
/// - Detecting duplicate rows, contradictions, low-confidence and stale facts
/// - Merging duplicates and deleting low-confidence facts on request
/// - Decaying stale model facts on request
/// - Collecting metrics on scans and remediation
///
/// Detection never writes. Remediation only happens through the explicit
/// `merge_duplicates`, `delete_low_confidence` and `decay_stale` calls;
/// contradictions are reported, never resolved.
///
/// # Examples
///
/// ```no_run
/// use factgraph_janitor::{Janitor, JanitorConfig};
/// use factgraph_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("facts.db")?;
/// let mut janitor = Janitor::new(JanitorConfig::default());
///
/// for issue in janitor.run_quality_scan(&store)? {
///     println!("{issue}");
/// }
/// janitor.decay_stale(&mut store, 90, 0.1)?;
/// println!("{}", janitor.metrics().summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    fn load<S>(store: &S) -> Result<Vec<Fact>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        store.all_facts().map_err(store_error)
    }

    /// Triple keys with more than one stored row
    pub fn detect_duplicates<S>(&self, store: &S) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;
        Ok(duplicate_issues(&facts))
    }

    /// Non-symmetric relations claimed in both directions
    pub fn detect_contradictions<S>(&self, store: &S) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;
        Ok(contradiction_issues(&facts))
    }

    /// Facts below the configured review threshold
    pub fn detect_low_confidence<S>(&self, store: &S) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;
        Ok(self.low_confidence_issues(&facts))
    }

    /// `model` facts older than the configured horizon at time `now`
    pub fn detect_stale<S>(&self, store: &S, now: u64) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;
        Ok(self.stale_issues(&facts, now))
    }

    /// Every detector over one snapshot, at time `now`
    ///
    /// Read-only. Issues are ordered by kind, then by affected ids.
    pub fn scan_at<S>(&self, store: &S, now: u64) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;

        let mut issues = duplicate_issues(&facts);
        issues.extend(contradiction_issues(&facts));
        issues.extend(self.low_confidence_issues(&facts));
        issues.extend(self.stale_issues(&facts, now));
        issues.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.affected_fact_ids.cmp(&b.affected_fact_ids))
        });
        Ok(issues)
    }

    /// Scan the store now and record the findings in the metrics
    pub fn run_quality_scan<S>(&mut self, store: &S) -> Result<Vec<QualityIssue>, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let issues = self.scan_at(store, current_timestamp())?;
        self.metrics.record_scan(issues.iter().map(|i| &i.kind));

        let high = issues.iter().filter(|i| i.severity == Severity::High).count();
        tracing::info!(issues = issues.len(), high, "quality scan complete");
        Ok(issues)
    }

    /// Keep the highest-confidence row of each duplicate group, delete the rest
    ///
    /// Returns the number of rows removed (or that would be, in dry-run mode).
    pub fn merge_duplicates<S>(&mut self, store: &mut S) -> Result<usize, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        let facts = Self::load(store)?;
        let mut redundant = Vec::new();
        for mut group in group_by_triple(&facts).into_values().filter(|g| g.len() > 1) {
            group.sort_by(|a, b| {
                b.confidence
                    .total_cmp(&a.confidence)
                    .then_with(|| b.extracted_at.cmp(&a.extracted_at))
                    .then_with(|| a.id.cmp(&b.id))
            });
            redundant.extend(group.iter().skip(1).map(|f| f.id));
        }

        let removed = self.delete_all(store, &redundant, "duplicate")?;
        if !self.config.dry_run {
            self.metrics.record_merge(removed);
        }
        Ok(removed)
    }

    /// Delete every fact with confidence strictly below `threshold`
    pub fn delete_low_confidence<S>(&mut self, store: &mut S, threshold: f64) -> Result<usize, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(JanitorError::Config(format!(
                "deletion threshold must be within [0, 1], got {threshold}"
            )));
        }
        let doomed: Vec<FactId> = Self::load(store)?
            .into_iter()
            .filter(|f| f.confidence < threshold)
            .map(|f| f.id)
            .collect();

        let removed = self.delete_all(store, &doomed, "low confidence")?;
        if !self.config.dry_run {
            self.metrics.record_deletion(removed);
        }
        Ok(removed)
    }

    /// Decay `model` facts older than `age_days` by `rate`
    ///
    /// Confidence becomes `confidence * (1 - rate)`, floored at 0.1. Facts are
    /// never deleted here.
    pub fn decay_stale<S>(&mut self, store: &mut S, age_days: u64, rate: f64) -> Result<usize, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        if !(0.0..=1.0).contains(&rate) {
            return Err(JanitorError::Config(format!(
                "decay rate must be within [0, 1], got {rate}"
            )));
        }
        let now = current_timestamp();
        let horizon = age_days.saturating_mul(SECONDS_PER_DAY);
        let stale: Vec<Fact> = Self::load(store)?
            .into_iter()
            .filter(|f| is_stale(f, now, horizon))
            .collect();

        if self.config.dry_run {
            for fact in &stale {
                tracing::info!(id = %fact.id, fact = %fact, rate, "[DRY RUN] Would decay stale fact");
            }
            return Ok(stale.len());
        }

        let mut decayed = 0;
        for fact in &stale {
            if let Some(confidence) = store.decay_confidence(fact.id, rate).map_err(store_error)? {
                tracing::debug!(id = %fact.id, from = fact.confidence, to = confidence, "decayed stale fact");
                decayed += 1;
            }
        }
        self.metrics.record_decay(decayed);
        tracing::info!(decayed, age_days, rate, "stale facts decayed");
        Ok(decayed)
    }

    /// Merge duplicates, delete below `delete_threshold`, then decay stale
    /// facts, all with the configured values
    ///
    /// Contradictions are left for review.
    pub fn remediate<S>(&mut self, store: &mut S) -> Result<JanitorMetrics, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        self.config.validate()?;
        self.merge_duplicates(store)?;
        self.delete_low_confidence(store, self.config.delete_threshold)?;
        self.decay_stale(store, self.config.stale_after_days, self.config.stale_decay_rate)?;
        Ok(self.metrics.clone())
    }

    fn delete_all<S>(&self, store: &mut S, ids: &[FactId], reason: &str) -> Result<usize, JanitorError>
    where
        S: FactStore,
        S::Error: Display,
    {
        if self.config.dry_run {
            for id in ids {
                tracing::info!(id = %id, reason, "[DRY RUN] Would delete fact");
            }
            return Ok(ids.len());
        }

        let mut removed = 0;
        for id in ids {
            if store.delete(*id).map_err(store_error)? {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, reason, "facts deleted");
        }
        Ok(removed)
    }

    fn low_confidence_issues(&self, facts: &[Fact]) -> Vec<QualityIssue> {
        let threshold = self.config.low_confidence_threshold;
        facts
            .iter()
            .filter(|f| f.confidence < threshold)
            .map(|f| QualityIssue {
                kind: IssueKind::LowConfidence,
                severity: Severity::Low,
                affected_fact_ids: vec![f.id],
                description: format!("{f} is below the review threshold {threshold:.2}"),
                recommendation: "Corroborate the fact or delete it".to_string(),
            })
            .collect()
    }

    fn stale_issues(&self, facts: &[Fact], now: u64) -> Vec<QualityIssue> {
        let days = self.config.stale_after_days;
        let horizon = days.saturating_mul(SECONDS_PER_DAY);
        facts
            .iter()
            .filter(|f| is_stale(f, now, horizon))
            .map(|f| QualityIssue {
                kind: IssueKind::Stale,
                severity: Severity::Low,
                affected_fact_ids: vec![f.id],
                description: format!(
                    "{f} was extracted {} days ago and never verified",
                    now.saturating_sub(f.extracted_at) / SECONDS_PER_DAY
                ),
                recommendation: format!("Re-verify the fact or decay it (older than {days} days)"),
            })
            .collect()
    }
}

fn is_stale(fact: &Fact, now: u64, horizon: u64) -> bool {
    fact.validation == Validation::Model && now.saturating_sub(fact.extracted_at) > horizon
}

fn group_by_triple(facts: &[Fact]) -> BTreeMap<TripleKey<'_>, Vec<&Fact>> {
    let mut groups: BTreeMap<TripleKey<'_>, Vec<&Fact>> = BTreeMap::new();
    for fact in facts {
        groups
            .entry((fact.subject.as_str(), &fact.predicate, fact.object.as_str()))
            .or_default()
            .push(fact);
    }
    groups
}

fn sorted_ids<'a>(facts: impl IntoIterator<Item = &'a Fact>) -> Vec<FactId> {
    let mut ids: Vec<FactId> = facts.into_iter().map(|f| f.id).collect();
    ids.sort();
    ids
}

fn duplicate_issues(facts: &[Fact]) -> Vec<QualityIssue> {
    group_by_triple(facts)
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|((subject, predicate, object), group)| QualityIssue {
            kind: IssueKind::Duplicate,
            severity: Severity::Medium,
            affected_fact_ids: sorted_ids(group.iter().copied()),
            description: format!("{} rows stored for {subject} {predicate} {object}", group.len()),
            recommendation: "Merge, keeping the highest-confidence row".to_string(),
        })
        .collect()
}

fn contradiction_issues(facts: &[Fact]) -> Vec<QualityIssue> {
    let mut by_key: HashMap<TripleKey<'_>, Vec<&Fact>> = HashMap::new();
    for fact in facts.iter().filter(|f| !f.predicate.is_symmetric() && f.subject != f.object) {
        by_key
            .entry((fact.subject.as_str(), &fact.predicate, fact.object.as_str()))
            .or_default()
            .push(fact);
    }

    let mut issues = Vec::new();
    for (&(subject, predicate, object), forward) in &by_key {
        // each pair is reported once, from its lexicographically smaller subject
        if subject > object {
            continue;
        }
        let Some(backward) = by_key.get(&(object, predicate, subject)) else {
            continue;
        };
        issues.push(QualityIssue {
            kind: IssueKind::Contradiction,
            severity: Severity::High,
            affected_fact_ids: sorted_ids(forward.iter().chain(backward.iter()).copied()),
            description: format!("{subject} {predicate} {object} and {object} {predicate} {subject} are both stored"),
            recommendation: "Review both directions; only one can hold".to_string(),
        });
    }
    issues.sort_by(|a, b| a.affected_fact_ids.cmp(&b.affected_fact_ids));
    issues
}
