//! Human-readable justifications for chains and reports

use crate::ImpactReport;
use factgraph_domain::{PathStep, Relation};
use factgraph_registry::EntityRegistry;
use std::fmt::Write;

fn verb(relation: &Relation) -> &str {
    match relation {
        Relation::CompetesWith => "competes with",
        Relation::SuppliesTo => "supplies",
        Relation::DependsOn => "depends on",
        Relation::SubsidiaryOf => "is a subsidiary of",
        Relation::PartnersWith => "partners with",
        Relation::IndirectlySupplies => "indirectly supplies",
        Relation::Influences => "influences",
        Relation::Other(name) => name,
    }
}

/// "Samsung supplies Dell (0.90)"
pub(crate) fn describe_step(registry: &EntityRegistry, step: &PathStep) -> String {
    format!(
        "{} {} {} ({:.2})",
        registry.display_name(&step.from),
        verb(&step.relation),
        registry.display_name(&step.to),
        step.confidence
    )
}

/// Justification of a hop-by-hop traversal
pub(crate) fn describe_path(registry: &EntityRegistry, steps: &[PathStep], aggregate: f64) -> String {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return String::new();
    };
    let hops: Vec<String> = steps.iter().map(|s| describe_step(registry, s)).collect();
    format!(
        "{}; a change at {} reaches {} in {} hop{} (confidence {:.2}, limited by the weakest link)",
        hops.join(", then "),
        registry.display_name(&first.from),
        registry.display_name(&last.to),
        steps.len(),
        if steps.len() == 1 { "" } else { "s" },
        aggregate
    )
}

/// Justification of a competitor-chain influence
pub(crate) fn describe_competitor_chain(
    registry: &EntityRegistry,
    rival: &PathStep,
    supply: &PathStep,
    confidence: f64,
) -> String {
    format!(
        "{} competes with {} ({:.2}), which supplies {} ({:.2}); shifts at {} can influence {} through its competitor (confidence {:.2})",
        registry.display_name(&rival.from),
        registry.display_name(&rival.to),
        rival.confidence,
        registry.display_name(&supply.to),
        supply.confidence,
        registry.display_name(&rival.from),
        registry.display_name(&supply.to),
        confidence
    )
}

/// Justification of a two-hop supply derivation
pub(crate) fn describe_transitive_supply(
    registry: &EntityRegistry,
    first: &PathStep,
    second: &PathStep,
    confidence: f64,
) -> String {
    format!(
        "{} supplies {} ({:.2}), which supplies {} ({:.2}); {} indirectly supplies {} (confidence {:.2})",
        registry.display_name(&first.from),
        registry.display_name(&first.to),
        first.confidence,
        registry.display_name(&second.to),
        second.confidence,
        registry.display_name(&first.from),
        registry.display_name(&second.to),
        confidence
    )
}

/// Justification of a symmetric derivation
pub(crate) fn describe_symmetry(registry: &EntityRegistry, step: &PathStep, confidence: f64) -> String {
    format!(
        "{}; competition runs both ways, so {} competes with {} (confidence {:.2})",
        describe_step(registry, step),
        registry.display_name(&step.to),
        registry.display_name(&step.from),
        confidence
    )
}

/// Plain-text summary of an impact report, strongest findings first
pub(crate) fn describe_report(registry: &EntityRegistry, report: &ImpactReport) -> String {
    let name = registry.display_name(&report.entity);
    if report.direct.is_empty() && report.indirect.is_empty() && report.industry_ripple.is_empty() {
        return format!("No known relations for {name}.");
    }

    let mut text = format!(
        "A change at {name} has {} direct, {} indirect and {} industry-level effect{}.",
        report.direct.len(),
        report.indirect.len(),
        report.industry_ripple.len(),
        if report.industry_ripple.len() == 1 { "" } else { "s" }
    );
    if let Some(strongest) = report.direct.first() {
        let _ = write!(text, " Most directly: {}.", strongest.reason);
    }
    if let Some(chain) = report.indirect.first() {
        let _ = write!(text, " Strongest indirect path: {}.", chain.explanation);
    }
    if !report.industry_ripple.is_empty() {
        let names: Vec<&str> = report
            .industry_ripple
            .iter()
            .map(|r| registry.display_name(&r.entity))
            .collect();
        let _ = write!(text, " Industry peers that may feel it: {}.", names.join(", "));
    }
    text
}
