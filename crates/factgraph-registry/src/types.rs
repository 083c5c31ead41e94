//! Registry record types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a registry entity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Coarse classification with links to neighbouring categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: String,

    /// Display name
    pub name: String,

    /// Ids of related categories
    #[serde(default)]
    pub related: Vec<String>,
}

/// One curated entity and its canonical relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Canonical id
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Alternative names
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Category ids
    #[serde(default)]
    pub categories: Vec<String>,

    /// Known competitors
    #[serde(default)]
    pub competitors: Vec<EntityId>,

    /// Entities supplying this one
    #[serde(default)]
    pub suppliers: Vec<EntityId>,

    /// Entities this one supplies
    #[serde(default)]
    pub customers: Vec<EntityId>,

    /// Entities owned by this one
    #[serde(default)]
    pub subsidiaries: Vec<EntityId>,

    /// Owning entity
    #[serde(default)]
    pub parent: Option<EntityId>,
}

impl EntityRecord {
    /// Minimal record with no relations
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            name: name.into(),
            aliases: Vec::new(),
            categories: Vec::new(),
            competitors: Vec::new(),
            suppliers: Vec::new(),
            customers: Vec::new(),
            subsidiaries: Vec::new(),
            parent: None,
        }
    }

    /// Every entity id this record refers to
    pub(crate) fn references(&self) -> impl Iterator<Item = &EntityId> {
        self.competitors
            .iter()
            .chain(&self.suppliers)
            .chain(&self.customers)
            .chain(&self.subsidiaries)
            .chain(self.parent.iter())
    }

    /// Whether `needle` is a name this record is known by, ignoring case
    pub(crate) fn is_named(&self, needle: &str) -> bool {
        self.name.to_lowercase() == needle
            || self.id.as_str().to_lowercase() == needle
            || self.aliases.iter().any(|a| a.to_lowercase() == needle)
    }

    /// Whether `needle` partially matches one of this record's names
    ///
    /// Either the needle starts a word of a name ("hynix" in "sk hynix"), or
    /// a whole name appears as separate words in the needle ("dell
    /// technologies" in "dell technologies inc."). Both sides must be at
    /// least [`MIN_PARTIAL_MATCH`] characters long.
    pub(crate) fn matches_partially(&self, needle: &str) -> bool {
        if needle.chars().count() < MIN_PARTIAL_MATCH {
            return false;
        }
        std::iter::once(&self.name)
            .chain(&self.aliases)
            .map(|n| n.to_lowercase())
            .filter(|n| n.chars().count() >= MIN_PARTIAL_MATCH)
            .any(|n| contains_word(&n, needle, false) || contains_word(needle, &n, true))
    }
}

/// Shortest name or query considered for partial matching
pub const MIN_PARTIAL_MATCH: usize = 3;

/// Whether `needle` occurs in `haystack` starting at a word boundary, and
/// when `whole` is set, also ending at one
fn contains_word(haystack: &str, needle: &str, whole: bool) -> bool {
    let boundary = |c: Option<char>| c.is_none_or(|c| !c.is_alphanumeric());
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        boundary(haystack[..start].chars().next_back()) && (!whole || boundary(haystack[end..].chars().next()))
    })
}

/// Curated relation lists of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// `competitors`
    Competitors,
    /// `suppliers`
    Suppliers,
    /// `customers`
    Customers,
    /// `subsidiaries`
    Subsidiaries,
    /// `parent`
    Parent,
}
