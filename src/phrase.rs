//! Phrase-table lookup.
//!
//! The phrase table maps surface phrases to the entities they have been
//! observed to refer to, with a prior frequency count and the case-form the
//! phrase had at each observation. Building the table from a corpus is an
//! external concern; the engine only queries it.

use crate::case::CaseForm;
use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A candidate referent for a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// The referenced entity.
    pub entity: EntityId,
    /// Case-form the phrase had when referring to this entity.
    pub form: CaseForm,
    /// Observed corpus frequency of this phrase referring to this entity.
    pub count: u64,
}

impl CandidateMatch {
    /// Create a candidate match.
    #[must_use]
    pub fn new(entity: EntityId, form: CaseForm, count: u64) -> Self {
        Self {
            entity,
            form,
            count,
        }
    }
}

/// Phrase-table query interface.
///
/// The order of the candidate list returned by [`query`](Self::query) is
/// meaningful: the resolver compares re-ranked results against the first
/// candidate in table order, and ties in scoring preserve table order.
/// Implementations make no promise that the order is frequency-descending.
pub trait PhraseTable {
    /// All candidate matches for a phrase. Empty when the phrase is unknown.
    fn query(&self, phrase: &str) -> Vec<CandidateMatch>;

    /// Dominant observed case-form of a phrase.
    fn form(&self, phrase: &str) -> CaseForm;
}

/// In-memory phrase table.
///
/// Candidates are returned in insertion order. The dominant case-form is
/// derived from the queried surface string itself, which matches how small
/// test fixtures are written.
#[derive(Debug, Clone, Default)]
pub struct MemoryPhraseTable {
    entries: HashMap<String, Vec<CandidateMatch>>,
}

impl MemoryPhraseTable {
    /// Create an empty phrase table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate for a phrase, keeping insertion order.
    pub fn insert(&mut self, phrase: &str, entity: EntityId, form: CaseForm, count: u64) {
        self.entries
            .entry(phrase.to_string())
            .or_default()
            .push(CandidateMatch::new(entity, form, count));
    }

    /// Number of distinct phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no phrases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PhraseTable for MemoryPhraseTable {
    fn query(&self, phrase: &str) -> Vec<CandidateMatch> {
        self.entries.get(phrase).cloned().unwrap_or_default()
    }

    fn form(&self, phrase: &str) -> CaseForm {
        CaseForm::of(phrase)
    }
}
