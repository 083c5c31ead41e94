//! End-to-end tests through the facade

use factgraph::{
    CandidateFact, ChainKind, Factgraph, FactgraphConfig, FactStore, Feedback, IssueKind, Relation,
    Severity, TriplePattern, Validation,
};
use std::fs;
use tempfile::TempDir;

const REGISTRY: &str = r#"
[[categories]]
id = "memory"
name = "Memory semiconductors"
related = ["pc"]

[[categories]]
id = "pc"
name = "Personal computers"

[[entities]]
id = "samsung"
name = "Samsung Electronics"
aliases = ["Samsung"]
categories = ["memory"]
competitors = ["sk-hynix"]

[[entities]]
id = "sk-hynix"
name = "SK Hynix"
aliases = ["SKHynix"]
categories = ["memory"]

[[entities]]
id = "micron"
name = "Micron Technology"
categories = ["memory"]

[[entities]]
id = "dell"
name = "Dell Technologies"
aliases = ["Dell"]
categories = ["pc"]
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn open(dir: &TempDir) -> Factgraph {
    init_tracing();
    let registry = dir.path().join("registry.toml");
    fs::write(&registry, REGISTRY).unwrap();
    fs::write(
        dir.path().join("factgraph.toml"),
        "database_path = \"facts.db\"\nregistry_path = \"registry.toml\"\n",
    )
    .unwrap();

    let config = FactgraphConfig::from_file(dir.path().join("factgraph.toml")).unwrap();
    Factgraph::open(config).unwrap()
}

#[test]
fn test_samsung_impact_scenario() {
    let dir = TempDir::new().unwrap();
    let mut graph = open(&dir);

    let seeded = graph.seed_baseline().unwrap();
    assert_eq!(seeded.inserted, 1);

    let report = graph
        .ingest(vec![
            CandidateFact::new("SKHynix", "supplies_to", "Dell", 0.9, "review:1").from_user(),
            CandidateFact::new("Initech", "supplies_to", "Dell", 0.8, "doc:2"),
        ])
        .unwrap();
    assert_eq!(report.summary(), "1 facts processed, 1 rejected");

    let impact = graph.analyze_impact("Samsung").unwrap();
    assert_eq!(impact.entity, "samsung");

    let chain = impact
        .indirect
        .iter()
        .find(|c| c.kind == ChainKind::CompetitorChain)
        .unwrap();
    assert_eq!(chain.target, "dell");
    assert!((chain.aggregate_confidence - 0.72).abs() < 1e-9);
    assert!(chain.explanation.contains("SK Hynix"));

    assert_eq!(impact.direct[0].entity, "sk-hynix");
    assert_eq!(impact.direct[0].severity, Severity::High);
    let ripple: Vec<&str> = impact.industry_ripple.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(ripple, vec!["micron"]);
}

#[test]
fn test_query_resolves_names() {
    let dir = TempDir::new().unwrap();
    let mut graph = open(&dir);
    graph.seed_baseline().unwrap();

    let facts = graph
        .query(&TriplePattern::any().subject("Samsung Electronics"), 0.0)
        .unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].key(), ("samsung", "competes_with", "sk-hynix"));
    assert_eq!(facts[0].validation, Validation::Baseline);
}

#[test]
fn test_inference_persists_through_upsert() {
    let dir = TempDir::new().unwrap();
    let mut graph = open(&dir);
    graph.seed_baseline().unwrap();
    graph
        .ingest(vec![CandidateFact::new("SKHynix", "supplies_to", "Dell", 0.9, "review:1").from_user()])
        .unwrap();

    let summary = graph.infer_and_persist().unwrap();
    assert_eq!(summary.inserted, 2);
    assert!(graph.infer().unwrap().is_empty());

    let reverse = graph
        .store()
        .find("sk-hynix", &Relation::CompetesWith, "samsung")
        .unwrap()
        .unwrap();
    assert_eq!(reverse.validation, Validation::Derived);
    assert!((reverse.confidence - 0.95).abs() < 1e-9);

    let network = graph.competitor_network("Samsung").unwrap();
    assert_eq!(network.direct, vec!["sk-hynix"]);
    assert!(network.indirect.is_empty());
}

#[test]
fn test_feedback_lock_and_quality_scan() {
    let dir = TempDir::new().unwrap();
    let mut graph = open(&dir);
    graph
        .ingest(vec![
            CandidateFact::new("Micron", "supplies_to", "Dell", 0.8, "doc:1"),
            CandidateFact::new("Dell", "supplies_to", "Micron", 0.7, "doc:2"),
        ])
        .unwrap();

    let fact = graph
        .store()
        .find("micron", &Relation::SuppliesTo, "dell")
        .unwrap()
        .unwrap();
    for _ in 0..3 {
        graph.record_feedback(fact.id, Feedback::Incorrect).unwrap();
    }
    let locked = graph.store().get_fact(fact.id).unwrap().unwrap();
    assert_eq!(locked.confidence, 0.5);

    let issues = graph.run_quality_scan().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Contradiction);
    assert_eq!(graph.janitor_metrics().scan_count, 1);

    assert_eq!(graph.delete_low_confidence(0.6).unwrap(), 1);
    assert!(graph.run_quality_scan().unwrap().is_empty());
}

#[test]
fn test_reopen_keeps_facts() {
    let dir = TempDir::new().unwrap();
    {
        let mut graph = open(&dir);
        graph.seed_baseline().unwrap();
    }

    let graph = open(&dir);
    assert_eq!(graph.store().count().unwrap(), 1);
    assert_eq!(graph.registry().len(), 4);
}
