//! Entity identifiers and knowledge-base access.
//!
//! Entities are opaque identifiers owned by an external knowledge base. The
//! engine never mutates them; it only reads a handful of attributes, each
//! with a documented default when absent:
//!
//! | Attribute | Default when absent |
//! |-------------|---------------------|
//! | name | `None` |
//! | description | `None` |
//! | popularity | `1.0` |
//! | fanin | `None` |
//! | links | empty slice |
//!
//! The default policy replaces the implicit null-propagation of frame-based
//! stores: callers never see an absent popularity or link list.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque entity identifier.
///
/// Cheap to copy and hash; the external identifier string (e.g., a Wikidata
/// QID) is recovered through [`KnowledgeBase::id`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an entity id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        EntityId(index)
    }

    /// The raw index backing this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only access to entity attributes.
///
/// Implemented by knowledge-base adapters. All methods take `&self`; the
/// knowledge base is shared read-only across documents without locking.
pub trait KnowledgeBase {
    /// External identifier string for the entity, if known.
    fn id(&self, entity: EntityId) -> Option<&str> {
        let _ = entity;
        None
    }

    /// Human-readable name, if present.
    fn name(&self, entity: EntityId) -> Option<&str>;

    /// Short description, if present.
    fn description(&self, entity: EntityId) -> Option<&str>;

    /// Popularity score. Returns `1.0` when the entity has none recorded.
    fn popularity(&self, entity: EntityId) -> f64;

    /// Number of incoming links, if recorded.
    fn fanin(&self, entity: EntityId) -> Option<u32>;

    /// Outgoing links with co-occurrence counts. Empty when none recorded.
    fn links(&self, entity: EntityId) -> &[(EntityId, u32)];

    /// Best display string for an entity: name, else id, else `"?"`.
    fn display_name(&self, entity: EntityId) -> String {
        self.name(entity)
            .or_else(|| self.id(entity))
            .unwrap_or("?")
            .to_string()
    }

    /// One-line description for diagnostics: id, name, and a truncated
    /// description when present.
    fn describe(&self, entity: EntityId) -> String {
        let mut s = self.id(entity).unwrap_or("?").to_string();
        if let Some(name) = self.name(entity) {
            s.push(' ');
            s.push_str(name);
        }
        if let Some(descr) = self.description(entity) {
            if descr.chars().count() > 40 {
                let head: String = descr.chars().take(40).collect();
                s.push_str(&format!(" ({head}...)"));
            } else {
                s.push_str(&format!(" ({descr})"));
            }
        }
        s
    }
}

#[derive(Debug, Clone, Default)]
struct EntityRecord {
    id: String,
    name: Option<String>,
    description: Option<String>,
    popularity: Option<f64>,
    fanin: Option<u32>,
    links: Vec<(EntityId, u32)>,
}

/// In-memory knowledge base.
///
/// Backs tests and small drivers; production stores implement
/// [`KnowledgeBase`] over their own storage.
///
/// # Example
///
/// ```rust
/// use evoke::{KnowledgeBase, MemoryKb};
///
/// let mut kb = MemoryKb::new();
/// let paris = kb.add_entity("Q90");
/// kb.set_name(paris, "Paris");
/// kb.set_popularity(paris, 50.0);
///
/// assert_eq!(kb.name(paris), Some("Paris"));
/// assert_eq!(kb.popularity(paris), 50.0);
/// assert!(kb.links(paris).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryKb {
    entities: Vec<EntityRecord>,
    by_id: HashMap<String, EntityId>,
}

impl MemoryKb {
    /// Create an empty knowledge base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity by external identifier, returning its id.
    ///
    /// Adding the same identifier twice returns the existing id.
    pub fn add_entity(&mut self, id: &str) -> EntityId {
        if let Some(&existing) = self.by_id.get(id) {
            return existing;
        }
        let entity = EntityId::new(self.entities.len() as u32);
        self.entities.push(EntityRecord {
            id: id.to_string(),
            ..EntityRecord::default()
        });
        self.by_id.insert(id.to_string(), entity);
        entity
    }

    /// Look up an entity by external identifier.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<EntityId> {
        self.by_id.get(id).copied()
    }

    /// Set the human-readable name.
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        if let Some(rec) = self.entities.get_mut(entity.index()) {
            rec.name = Some(name.into());
        }
    }

    /// Set the description.
    pub fn set_description(&mut self, entity: EntityId, description: impl Into<String>) {
        if let Some(rec) = self.entities.get_mut(entity.index()) {
            rec.description = Some(description.into());
        }
    }

    /// Set the popularity score.
    pub fn set_popularity(&mut self, entity: EntityId, popularity: f64) {
        if let Some(rec) = self.entities.get_mut(entity.index()) {
            rec.popularity = Some(popularity);
        }
    }

    /// Set the fan-in count.
    pub fn set_fanin(&mut self, entity: EntityId, fanin: u32) {
        if let Some(rec) = self.entities.get_mut(entity.index()) {
            rec.fanin = Some(fanin);
        }
    }

    /// Add an outgoing link with a co-occurrence count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when either entity is not in this
    /// knowledge base.
    pub fn add_link(&mut self, from: EntityId, to: EntityId, count: u32) -> Result<()> {
        if to.index() >= self.entities.len() {
            return Err(Error::invalid_input(format!(
                "link target {to} is not in the knowledge base"
            )));
        }
        let Some(rec) = self.entities.get_mut(from.index()) else {
            return Err(Error::invalid_input(format!(
                "link source {from} is not in the knowledge base"
            )));
        };
        rec.links.push((to, count));
        Ok(())
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the knowledge base is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl KnowledgeBase for MemoryKb {
    fn id(&self, entity: EntityId) -> Option<&str> {
        self.entities.get(entity.index()).map(|r| r.id.as_str())
    }

    fn name(&self, entity: EntityId) -> Option<&str> {
        self.entities
            .get(entity.index())
            .and_then(|r| r.name.as_deref())
    }

    fn description(&self, entity: EntityId) -> Option<&str> {
        self.entities
            .get(entity.index())
            .and_then(|r| r.description.as_deref())
    }

    fn popularity(&self, entity: EntityId) -> f64 {
        self.entities
            .get(entity.index())
            .and_then(|r| r.popularity)
            .unwrap_or(1.0)
    }

    fn fanin(&self, entity: EntityId) -> Option<u32> {
        self.entities.get(entity.index()).and_then(|r| r.fanin)
    }

    fn links(&self, entity: EntityId) -> &[(EntityId, u32)] {
        self.entities
            .get(entity.index())
            .map(|r| r.links.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_entity_is_idempotent() {
        let mut kb = MemoryKb::new();
        let a = kb.add_entity("Q1");
        let b = kb.add_entity("Q1");
        assert_eq!(a, b);
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_attribute_defaults() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q1");
        assert_eq!(kb.name(e), None);
        assert_eq!(kb.description(e), None);
        assert_eq!(kb.popularity(e), 1.0);
        assert_eq!(kb.fanin(e), None);
        assert!(kb.links(e).is_empty());
    }

    #[test]
    fn test_link_to_unknown_entity_fails() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q1");
        let bogus = EntityId::new(99);
        assert!(kb.add_link(e, bogus, 3).is_err());
        assert!(kb.add_link(bogus, e, 3).is_err());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q90");
        assert_eq!(kb.display_name(e), "Q90");
        kb.set_name(e, "Paris");
        assert_eq!(kb.display_name(e), "Paris");
    }

    #[test]
    fn test_describe_truncates_long_descriptions() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q90");
        kb.set_name(e, "Paris");
        kb.set_description(e, "x".repeat(60));
        let text = kb.describe(e);
        assert!(text.starts_with("Q90 Paris ("));
        assert!(text.ends_with("...)"));
        assert!(text.len() < 60);
    }

    #[test]
    fn test_lookup() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q42");
        assert_eq!(kb.lookup("Q42"), Some(e));
        assert_eq!(kb.lookup("Q43"), None);
    }
}
