//! The entity registry: resolution and baseline lookups

use crate::{Category, EntityId, EntityRecord, RegistryError, RelationKind};
use factgraph_domain::confidence::BASELINE_CONFIDENCE;
use factgraph_domain::{Fact, Relation, Validation};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Provenance stamped on facts materialized from the registry
const REGISTRY_PROVENANCE: &str = "registry:baseline";

/// On-disk layout of a registry document
#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

/// Immutable reference graph of curated entities
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<EntityRecord>,
    categories: Vec<Category>,
    index: HashMap<EntityId, usize>,
}

impl EntityRegistry {
    /// Build a registry, validating ids and references
    pub fn new(entities: Vec<EntityRecord>, categories: Vec<Category>) -> Result<Self, RegistryError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(RegistryError::DuplicateCategory(category.id.clone()));
            }
        }
        for category in &categories {
            if let Some(missing) = category.related.iter().find(|r| !category_ids.contains(r.as_str())) {
                return Err(RegistryError::UnknownCategory {
                    owner: category.id.clone(),
                    category: missing.clone(),
                });
            }
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (position, record) in entities.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateEntity(record.id.to_string()));
            }
        }

        for record in &entities {
            if let Some(missing) = record.references().find(|r| !index.contains_key(*r)) {
                return Err(RegistryError::UnknownEntity {
                    entity: record.id.to_string(),
                    reference: missing.to_string(),
                });
            }
            if let Some(missing) = record.categories.iter().find(|c| !category_ids.contains(c.as_str())) {
                return Err(RegistryError::UnknownCategory {
                    owner: record.id.to_string(),
                    category: missing.clone(),
                });
            }
        }

        tracing::debug!(
            entities = entities.len(),
            categories = categories.len(),
            "entity registry loaded"
        );

        Ok(Self {
            entities,
            categories,
            index,
        })
    }

    /// A registry with no entities (everything is unverified)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a registry from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = toml::from_str(contents)?;
        Self::new(document.entities, document.categories)
    }

    /// Load a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Number of curated entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All records in registry order
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.iter()
    }

    /// Look up a record by canonical id
    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.index
            .get(&EntityId::from(id))
            .map(|&position| &self.entities[position])
    }

    /// Whether `id` is a canonical entity id
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Display name for an id, falling back to the id itself
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |record| record.name.as_str())
    }

    /// Resolve a name, alias or partially-qualified id to a canonical id
    ///
    /// Priority: exact id or name match, then case-insensitive name/alias
    /// match, then a partial match on word boundaries. The first match in
    /// registry order wins within each tier.
    pub fn resolve(&self, name_or_alias: &str) -> Option<EntityId> {
        self.resolve_exact(name_or_alias).or_else(|| {
            let lowered = name_or_alias.trim().to_lowercase();
            self.entities
                .iter()
                .find(|r| r.matches_partially(&lowered))
                .map(|r| r.id.clone())
        })
    }

    /// Resolve by id, name or alias only, never by partial match
    pub fn resolve_exact(&self, name_or_alias: &str) -> Option<EntityId> {
        let query = name_or_alias.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(record) = self.get(query) {
            return Some(record.id.clone());
        }
        if let Some(record) = self.entities.iter().find(|r| r.name == query) {
            return Some(record.id.clone());
        }

        let lowered = query.to_lowercase();
        self.entities
            .iter()
            .find(|r| r.is_named(&lowered))
            .map(|r| r.id.clone())
    }

    /// Curated relation list of an entity; empty for unknown ids
    pub fn related_entities(&self, id: &str, kind: RelationKind) -> Vec<EntityId> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        match kind {
            RelationKind::Competitors => record.competitors.clone(),
            RelationKind::Suppliers => record.suppliers.clone(),
            RelationKind::Customers => record.customers.clone(),
            RelationKind::Subsidiaries => record.subsidiaries.clone(),
            RelationKind::Parent => record.parent.iter().cloned().collect(),
        }
    }

    fn lists(&self, id: &str, kind: RelationKind, other: &str) -> bool {
        self.related_entities(id, kind).iter().any(|e| e.as_str() == other)
    }

    /// Whether a triple matches a curated relation
    pub fn is_baseline(&self, subject: &str, relation: &Relation, object: &str) -> bool {
        use RelationKind::*;
        match Relation::parse(relation.as_str()) {
            Relation::CompetesWith => {
                self.lists(subject, Competitors, object) || self.lists(object, Competitors, subject)
            }
            Relation::SuppliesTo => {
                self.lists(subject, Customers, object) || self.lists(object, Suppliers, subject)
            }
            Relation::DependsOn => {
                self.lists(subject, Suppliers, object) || self.lists(object, Customers, subject)
            }
            Relation::SubsidiaryOf => {
                self.lists(subject, Parent, object) || self.lists(object, Subsidiaries, subject)
            }
            _ => false,
        }
    }

    /// Categories an entity belongs to
    pub fn categories_of(&self, id: &str) -> Vec<&Category> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        self.categories
            .iter()
            .filter(|c| record.categories.contains(&c.id))
            .collect()
    }

    /// Other entities sharing at least one category with `id`
    pub fn same_category(&self, id: &str) -> Vec<EntityId> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|other| other.id != record.id)
            .filter(|other| other.categories.iter().any(|c| record.categories.contains(c)))
            .map(|other| other.id.clone())
            .collect()
    }

    /// Entities in categories linked to `id`'s categories, excluding those
    /// that already share a category with it
    pub fn related_category_members(&self, id: &str) -> Vec<EntityId> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        let linked: HashSet<&str> = self
            .categories_of(id)
            .iter()
            .flat_map(|c| c.related.iter().map(String::as_str))
            .filter(|c| !record.categories.iter().any(|own| own == c))
            .collect();

        self.entities
            .iter()
            .filter(|other| other.id != record.id)
            .filter(|other| !other.categories.iter().any(|c| record.categories.contains(c)))
            .filter(|other| other.categories.iter().any(|c| linked.contains(c.as_str())))
            .map(|other| other.id.clone())
            .collect()
    }

    /// Every curated relation as a `baseline` fact, one per triple
    pub fn baseline_facts(&self) -> Vec<Fact> {
        let mut triples: BTreeSet<(String, Relation, String)> = BTreeSet::new();

        for record in &self.entities {
            let id = record.id.to_string();
            for competitor in &record.competitors {
                triples.insert((id.clone(), Relation::CompetesWith, competitor.to_string()));
            }
            for customer in &record.customers {
                triples.insert((id.clone(), Relation::SuppliesTo, customer.to_string()));
            }
            for supplier in &record.suppliers {
                triples.insert((supplier.to_string(), Relation::SuppliesTo, id.clone()));
            }
            for subsidiary in &record.subsidiaries {
                triples.insert((subsidiary.to_string(), Relation::SubsidiaryOf, id.clone()));
            }
            if let Some(parent) = &record.parent {
                triples.insert((id.clone(), Relation::SubsidiaryOf, parent.to_string()));
            }
        }

        triples
            .into_iter()
            .map(|(subject, relation, object)| {
                Fact::new(
                    subject,
                    relation,
                    object,
                    BASELINE_CONFIDENCE,
                    REGISTRY_PROVENANCE,
                    Validation::Baseline,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EntityRegistry {
        EntityRegistry::from_toml_str(
            r#"
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
            aliases = ["Samsung", "SEC"]
            categories = ["memory"]
            competitors = ["sk-hynix"]
            customers = ["dell"]

            [[entities]]
            id = "sk-hynix"
            name = "SK Hynix"
            aliases = ["Hynix"]
            categories = ["memory"]
            customers = ["dell"]

            [[entities]]
            id = "dell"
            name = "Dell Technologies"
            categories = ["pc"]
            suppliers = ["samsung"]
            subsidiaries = ["alienware"]

            [[entities]]
            id = "alienware"
            name = "Alienware"
            categories = ["pc"]
            parent = "dell"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_priority() {
        let registry = registry();

        assert_eq!(registry.resolve("samsung").unwrap().as_str(), "samsung");
        assert_eq!(registry.resolve("Samsung Electronics").unwrap().as_str(), "samsung");
        assert_eq!(registry.resolve("hynix").unwrap().as_str(), "sk-hynix");
        assert_eq!(registry.resolve("sec").unwrap().as_str(), "samsung");
        assert_eq!(registry.resolve("Dell Technologies Inc.").unwrap().as_str(), "dell");
        assert_eq!(registry.resolve("Alien").unwrap().as_str(), "alienware");
        assert!(registry.resolve("Micron").is_none());
        assert!(registry.resolve("   ").is_none());
    }

    #[test]
    fn test_partial_match_respects_word_boundaries() {
        let registry = EntityRegistry::from_toml_str(
            r#"
            [[entities]]
            id = "samsung"
            name = "Samsung Electronics"
            aliases = ["SEC"]

            [[entities]]
            id = "lg"
            name = "LG"
            "#,
        )
        .unwrap();

        assert!(registry.resolve("Secure Networks").is_none());
        assert!(registry.resolve("Algorand").is_none());
        assert!(registry.resolve("Hamsung").is_none());
        assert_eq!(registry.resolve("lg").unwrap().as_str(), "lg");
        assert_eq!(registry.resolve("SEC Korea").unwrap().as_str(), "samsung");
        assert_eq!(registry.resolve("samsung elec").unwrap().as_str(), "samsung");
    }

    #[test]
    fn test_resolve_exact_skips_partial_matches() {
        let registry = registry();

        assert_eq!(registry.resolve_exact("SEC").unwrap().as_str(), "samsung");
        assert_eq!(registry.resolve_exact("sk-hynix").unwrap().as_str(), "sk-hynix");
        assert!(registry.resolve_exact("Dell Technologies Inc.").is_none());
        assert!(registry.resolve_exact("Samsung Digital City, Suwon").is_none());
    }

    #[test]
    fn test_related_entities() {
        let registry = registry();

        assert_eq!(
            registry.related_entities("samsung", RelationKind::Competitors),
            vec![EntityId::from("sk-hynix")]
        );
        assert_eq!(
            registry.related_entities("alienware", RelationKind::Parent),
            vec![EntityId::from("dell")]
        );
        assert!(registry.related_entities("unknown", RelationKind::Customers).is_empty());
    }

    #[test]
    fn test_is_baseline() {
        let registry = registry();

        assert!(registry.is_baseline("samsung", &Relation::CompetesWith, "sk-hynix"));
        assert!(registry.is_baseline("sk-hynix", &Relation::CompetesWith, "samsung"));
        assert!(registry.is_baseline("samsung", &Relation::SuppliesTo, "dell"));
        assert!(registry.is_baseline("dell", &Relation::DependsOn, "samsung"));
        assert!(registry.is_baseline("alienware", &Relation::SubsidiaryOf, "dell"));
        assert!(!registry.is_baseline("dell", &Relation::SuppliesTo, "samsung"));
        assert!(!registry.is_baseline("samsung", &Relation::Influences, "dell"));
        assert!(registry.is_baseline("samsung", &Relation::Other("competes_with".into()), "sk-hynix"));
    }

    #[test]
    fn test_categories() {
        let registry = registry();

        assert_eq!(registry.same_category("samsung"), vec![EntityId::from("sk-hynix")]);
        assert_eq!(
            registry.related_category_members("samsung"),
            vec![EntityId::from("dell"), EntityId::from("alienware")]
        );
        assert!(registry.related_category_members("dell").is_empty());
    }

    #[test]
    fn test_baseline_facts_are_deduplicated() {
        let registry = registry();
        let facts = registry.baseline_facts();

        // samsung->dell is listed on both sides but materialized once
        let samsung_dell = facts
            .iter()
            .filter(|f| f.subject == "samsung" && f.object == "dell")
            .count();
        assert_eq!(samsung_dell, 1);
        assert_eq!(facts.len(), 4);
        assert!(facts.iter().all(|f| f.validation == Validation::Baseline && f.confidence == 1.0));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let result = EntityRegistry::from_toml_str(
            r#"
            [[entities]]
            id = "samsung"
            name = "Samsung"
            competitors = ["micron"]
            "#,
        );
        assert!(matches!(result, Err(RegistryError::UnknownEntity { .. })));
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let result = EntityRegistry::new(
            vec![EntityRecord::new("a", "A"), EntityRecord::new("a", "Also A")],
            Vec::new(),
        );
        assert!(matches!(result, Err(RegistryError::DuplicateEntity(id)) if id == "a"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut record = EntityRecord::new("a", "A");
        record.categories.push("ghost".to_string());
        let result = EntityRegistry::new(vec![record], Vec::new());
        assert!(matches!(result, Err(RegistryError::UnknownCategory { .. })));
    }
}
