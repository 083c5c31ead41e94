//! Relation module - predicates connecting subjects to objects

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Predicate of a fact
///
/// The named variants are the relations the reasoner understands. Any other
/// predicate is stored lowercased as [`Relation::Other`] and is queryable but
/// never reasoned over. Build `Other` through [`Relation::parse`] or
/// [`Relation::other`]. Relations compare, hash and order by storage name, so
/// `Other("competes_with")` equals [`Relation::CompetesWith`].
#[derive(Debug, Clone)]
pub enum Relation {
    /// Subject competes with object (symmetric)
    CompetesWith,

    /// Subject supplies goods or services to object
    SuppliesTo,

    /// Subject depends on object as a supplier (inverse of `SuppliesTo`)
    DependsOn,

    /// Subject is a subsidiary of object
    SubsidiaryOf,

    /// Subject partners with object (symmetric)
    PartnersWith,

    /// Subject reaches object through a chain of suppliers (derived)
    IndirectlySupplies,

    /// Subject potentially influences object (derived)
    Influences,

    /// Unrecognized predicate, stored but not reasoned over
    Other(String),
}

impl Relation {
    /// All reasoned-over relations
    pub const KNOWN: [Relation; 7] = [
        Relation::CompetesWith,
        Relation::SuppliesTo,
        Relation::DependsOn,
        Relation::SubsidiaryOf,
        Relation::PartnersWith,
        Relation::IndirectlySupplies,
        Relation::Influences,
    ];

    /// Storage name of the relation
    pub fn as_str(&self) -> &str {
        match self {
            Relation::CompetesWith => "competes_with",
            Relation::SuppliesTo => "supplies_to",
            Relation::DependsOn => "depends_on",
            Relation::SubsidiaryOf => "subsidiary_of",
            Relation::PartnersWith => "partners_with",
            Relation::IndirectlySupplies => "indirectly_supplies",
            Relation::Influences => "influences",
            Relation::Other(name) => name,
        }
    }

    /// Parse a predicate name, ignoring case; unknown names become
    /// [`Relation::Other`] in lowercase
    pub fn parse(s: &str) -> Self {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "competes_with" => Relation::CompetesWith,
            "supplies_to" => Relation::SuppliesTo,
            "depends_on" => Relation::DependsOn,
            "subsidiary_of" => Relation::SubsidiaryOf,
            "partners_with" => Relation::PartnersWith,
            "indirectly_supplies" => Relation::IndirectlySupplies,
            "influences" => Relation::Influences,
            _ => Relation::Other(name),
        }
    }

    /// Unrecognized predicate by name; known names map to their variant
    pub fn other(name: impl AsRef<str>) -> Self {
        Relation::parse(name.as_ref())
    }

    /// Whether `A rel B` implies `B rel A`
    pub fn is_symmetric(&self) -> bool {
        matches!(self.as_str(), "competes_with" | "partners_with")
    }

    /// Whether the object of this relation must be a registry entity
    pub fn is_entity_valued(&self) -> bool {
        Relation::KNOWN.contains(self)
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for Relation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Relation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Relation {
    fn from(s: &str) -> Self {
        Relation::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_relations_round_trip() {
        for relation in Relation::KNOWN {
            assert_eq!(Relation::parse(relation.as_str()), relation);
        }
    }

    #[test]
    fn test_unknown_predicate_is_kept() {
        let relation = Relation::parse("headquartered_in");
        assert_eq!(relation, Relation::Other("headquartered_in".to_string()));
        assert_eq!(relation.as_str(), "headquartered_in");
        assert!(!relation.is_entity_valued());
    }

    #[test]
    fn test_unknown_predicate_case_is_normalised() {
        assert_eq!(Relation::parse(" Headquartered_In "), Relation::parse("headquartered_in"));
        assert_eq!(Relation::parse("Headquartered_In").as_str(), "headquartered_in");
        assert_eq!(Relation::other("HQ_City").as_str(), "hq_city");
        assert_eq!(Relation::other("Competes_With"), Relation::CompetesWith);
    }

    #[test]
    fn test_equality_follows_storage_name() {
        use std::collections::HashSet;

        assert_eq!(Relation::Other("competes_with".to_string()), Relation::CompetesWith);
        let set: HashSet<Relation> = [Relation::CompetesWith, Relation::Other("competes_with".into())]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
        assert!(Relation::CompetesWith < Relation::SuppliesTo);
    }

    #[test]
    fn test_symmetry() {
        assert!(Relation::CompetesWith.is_symmetric());
        assert!(Relation::PartnersWith.is_symmetric());
        assert!(!Relation::SuppliesTo.is_symmetric());
        assert!(!Relation::Other("x".into()).is_symmetric());
        assert!(Relation::Other("partners_with".into()).is_symmetric());
    }
}
