//! # evoke
//!
//! Entity disambiguation for Rust.
//!
//! Given a document whose mentions have been pre-linked to candidate
//! knowledge-base entities, `evoke` picks the most likely referent for each
//! mention using a per-document context model that accumulates relevance as
//! the document is read.
//!
//! - **Scoring**: prior frequency × contextual relevance, with link-graph
//!   propagation and a case-form mismatch penalty
//! - **Context**: additive per-document model seeded from the document's
//!   subject and updated with every resolved mention
//! - **Evaluation**: coverage and precision-at-rank over a whole run, with
//!   per-document statistics that merge for parallel drivers
//!
//! ## Quick Start
//!
//! ```rust
//! use evoke::prelude::*;
//!
//! let mut kb = MemoryKb::new();
//! let city = kb.add_entity("Q90");
//! let town = kb.add_entity("Q830149");
//! kb.set_name(city, "Paris");
//!
//! let mut phrases = MemoryPhraseTable::new();
//! phrases.insert("Paris", city, CaseForm::Title, 9000);
//! phrases.insert("Paris", town, CaseForm::Title, 100);
//!
//! let doc = Document {
//!     title: "Paris".into(),
//!     subject: Some(city),
//!     themes: vec![],
//!     mentions: vec![Mention::new(0, 1, "Paris", false, vec![city])],
//! };
//!
//! let resolver = Resolver::new(&kb, &phrases);
//! let mut context = ContextModel::new();
//! let result = resolver.resolve_document(&doc, &mut context);
//!
//! assert_eq!(result.stats.resolved, 1);
//! assert_eq!(result.stats.coverage(), Some(1.0));
//! ```
//!
//! ## Design
//!
//! - **Trait seams**: the knowledge base and phrase table are consumed
//!   through the [`KnowledgeBase`] and [`PhraseTable`] traits; storage,
//!   corpus iteration, and table construction live elsewhere. The bundled
//!   [`MemoryKb`] and [`MemoryPhraseTable`] back tests and small drivers.
//! - **Defaults over nulls**: missing entity attributes resolve to
//!   documented defaults (popularity 1, empty links); nothing propagates
//!   `None` implicitly.
//! - **Oracle context**: the context model absorbs the evoked
//!   (ground-truth) entity after each mention, not the prediction, so runs
//!   measure how far context gets you rather than compounding errors.
//! - **Events over prints**: diagnostics are structured
//!   [`ResolveEvent`]s delivered to a [`ResolveObserver`];
//!   [`LogObserver`] renders them through the `log` facade.
//! - **Sequential within a document, mergeable across**: context
//!   accumulation makes mention order significant, so a document is a
//!   strictly sequential unit; documents are independent and their
//!   [`AggregateStats`] merge.

#![warn(missing_docs)]

pub mod case;
pub mod context;
mod entity;
mod error;
pub mod phrase;
pub mod resolver;
pub mod score;
pub mod stats;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use evoke::prelude::*;
    //!
    //! let mut kb = MemoryKb::new();
    //! let e = kb.add_entity("Q1");
    //! assert_eq!(kb.popularity(e), 1.0);
    //! ```
    pub use crate::case::{compatible, CaseForm};
    pub use crate::context::ContextModel;
    pub use crate::entity::{EntityId, KnowledgeBase, MemoryKb};
    pub use crate::error::{Error, Result};
    pub use crate::phrase::{CandidateMatch, MemoryPhraseTable, PhraseTable};
    pub use crate::resolver::{
        Document, DocumentResult, LogObserver, Mention, MentionOutcome, ResolveEvent,
        ResolveObserver, Resolver, ResolverConfig,
    };
    pub use crate::score::{score_candidates, ScoreRecord};
    pub use crate::stats::{merge_statistics, AggregateStats};
}

// Re-exports
pub use case::{compatible, CaseForm};
pub use context::ContextModel;
pub use entity::{EntityId, KnowledgeBase, MemoryKb};
pub use error::{Error, Result};
pub use phrase::{CandidateMatch, MemoryPhraseTable, PhraseTable};
pub use resolver::{
    Document, DocumentResult, LogObserver, Mention, MentionOutcome, ResolveEvent, ResolveObserver,
    Resolver, ResolverConfig,
};
pub use score::{score_candidates, ScoreRecord};
pub use stats::{merge_statistics, AggregateStats, DEFAULT_RANK_BUCKETS};
