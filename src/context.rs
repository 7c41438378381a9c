//! Per-document context model.
//!
//! The context model accumulates relevance weight per entity while a single
//! document is being processed. It is seeded from document-level signals
//! (the document's own subject entity and, optionally, unanchored themes)
//! and grows as mentions resolve. Weights only increase: there is no decay
//! and no removal, so resolution order matters and processing within one
//! document is strictly sequential.
//!
//! The model is created empty per document and discarded afterwards;
//! nothing carries over between documents.

use crate::entity::{EntityId, KnowledgeBase};
use std::collections::HashMap;

/// Additive per-document entity relevance accumulator.
#[derive(Debug, Clone, Default)]
pub struct ContextModel {
    weights: HashMap<EntityId, f64>,
}

impl ContextModel {
    /// Create an empty context model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated weight for an entity, or `default` when absent.
    #[must_use]
    pub fn get(&self, entity: EntityId, default: f64) -> f64 {
        self.weights.get(&entity).copied().unwrap_or(default)
    }

    /// Increase an entity's weight by `delta`, starting from zero if absent.
    ///
    /// `delta` must be non-negative; weights are monotonically
    /// non-decreasing for the life of the model.
    pub fn add(&mut self, entity: EntityId, delta: f64) {
        debug_assert!(delta >= 0.0, "context weights only increase");
        *self.weights.entry(entity).or_insert(0.0) += delta;
    }

    /// Number of entities with accumulated weight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no entity has accumulated weight yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Seed the model with the document's subject entity.
    pub fn seed_topic(&mut self, topic: EntityId, topic_weight: f64) {
        self.add(topic, topic_weight);
    }

    /// Seed the model with unanchored document themes.
    ///
    /// Disabled when `thematic_weight` is not positive (the observed
    /// configuration). Each theme receives the weight divided by its
    /// popularity.
    pub fn seed_themes(
        &mut self,
        kb: &dyn KnowledgeBase,
        themes: &[EntityId],
        thematic_weight: f64,
    ) {
        if thematic_weight <= 0.0 {
            return;
        }
        for &theme in themes {
            let popularity = kb.popularity(theme).max(1.0);
            self.add(theme, thematic_weight / popularity);
        }
    }

    /// Absorb a resolved mention's entity into the model.
    ///
    /// The entity receives `mention_weight / popularity`, and every entity
    /// it links to receives its co-occurrence count divided by the linked
    /// entity's popularity. Popularity is clamped to at least 1.
    pub fn absorb(&mut self, kb: &dyn KnowledgeBase, entity: EntityId, mention_weight: f64) {
        let popularity = kb.popularity(entity).max(1.0);
        self.add(entity, mention_weight / popularity);
        for &(link, count) in kb.links(entity) {
            let popularity = kb.popularity(link).max(1.0);
            self.add(link, f64::from(count) / popularity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MemoryKb;

    #[test]
    fn test_get_default() {
        let context = ContextModel::new();
        let e = EntityId::new(0);
        assert_eq!(context.get(e, 0.5), 0.5);
    }

    #[test]
    fn test_add_accumulates() {
        let mut context = ContextModel::new();
        let e = EntityId::new(0);
        context.add(e, 1.0);
        context.add(e, 2.5);
        assert_eq!(context.get(e, 0.0), 3.5);
    }

    #[test]
    fn test_absorb_divides_by_popularity() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q1");
        kb.set_popularity(e, 2.0);

        let mut context = ContextModel::new();
        context.absorb(&kb, e, 500.0);
        assert_eq!(context.get(e, 0.0), 250.0);
    }

    #[test]
    fn test_absorb_propagates_links() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q1");
        let l = kb.add_entity("Q2");
        kb.set_popularity(l, 4.0);
        kb.add_link(e, l, 8).unwrap();

        let mut context = ContextModel::new();
        context.absorb(&kb, e, 500.0);
        assert_eq!(context.get(e, 0.0), 500.0);
        assert_eq!(context.get(l, 0.0), 2.0); // 8 / 4
    }

    #[test]
    fn test_theme_seeding_gated_on_weight() {
        let mut kb = MemoryKb::new();
        let theme = kb.add_entity("Q1");

        let mut context = ContextModel::new();
        context.seed_themes(&kb, &[theme], 0.0);
        assert!(context.is_empty());

        context.seed_themes(&kb, &[theme], 10.0);
        assert_eq!(context.get(theme, 0.0), 10.0);
    }

    #[test]
    fn test_popularity_clamped_to_one() {
        let mut kb = MemoryKb::new();
        let e = kb.add_entity("Q1");
        kb.set_popularity(e, 0.25);

        let mut context = ContextModel::new();
        context.absorb(&kb, e, 500.0);
        assert_eq!(context.get(e, 0.0), 500.0);
    }
}
