//! Per-mention resolution and ranking.
//!
//! For each mention the resolver queries the phrase table, scores every
//! candidate against the per-document context model, ranks them, and
//! classifies the outcome: either the evoked (ground-truth) entity was not
//! among the candidates at all ("unknown"), or it landed at some rank in
//! the score-sorted list. The context model then absorbs the evoked entity
//! regardless of whether it was top-ranked, so the model tracks the correct
//! reading of the document rather than reinforcing its own predictions.
//!
//! Documents are processed strictly sequentially: later mentions are scored
//! against context accumulated from earlier ones. Distinct documents share
//! nothing except the read-only knowledge base and phrase table, so a
//! surrounding driver may parallelize across documents and reduce the
//! per-document statistics with [`AggregateStats::merge`].

use crate::context::ContextModel;
use crate::entity::{EntityId, KnowledgeBase};
use crate::phrase::PhraseTable;
use crate::score::{score_candidates, ScoreRecord};
use crate::stats::AggregateStats;
use serde::{Deserialize, Serialize};

/// Scoring and context weights.
///
/// Defaults match the observed production configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Multiplier applied to the context score on case-form mismatch.
    pub form_penalty: f64,
    /// Context-score floor for candidates never seen in context.
    pub base_context_score: f64,
    /// Weight given to the document's subject entity at document start.
    pub topic_weight: f64,
    /// Weight absorbed by an evoked entity when a mention resolves.
    pub mention_weight: f64,
    /// Weight for unanchored document themes; zero disables theme seeding.
    pub thematic_weight: f64,
    /// Number of rank-histogram buckets; deeper ranks share the last bucket.
    pub max_rank: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            form_penalty: 0.1,
            base_context_score: 1e-3,
            topic_weight: 1.0,
            mention_weight: 500.0,
            thematic_weight: 0.0,
            max_rank: 20,
        }
    }
}

impl ResolverConfig {
    /// Set the case-form mismatch penalty.
    #[must_use]
    pub fn with_form_penalty(mut self, penalty: f64) -> Self {
        self.form_penalty = penalty;
        self
    }

    /// Set the context-score floor.
    #[must_use]
    pub fn with_base_context_score(mut self, floor: f64) -> Self {
        self.base_context_score = floor;
        self
    }

    /// Set the document-subject seed weight.
    #[must_use]
    pub fn with_topic_weight(mut self, weight: f64) -> Self {
        self.topic_weight = weight;
        self
    }

    /// Set the per-resolution absorption weight.
    #[must_use]
    pub fn with_mention_weight(mut self, weight: f64) -> Self {
        self.mention_weight = weight;
        self
    }

    /// Set the theme seed weight (zero disables theme seeding).
    #[must_use]
    pub fn with_thematic_weight(mut self, weight: f64) -> Self {
        self.thematic_weight = weight;
        self
    }

    /// Set the rank-histogram depth.
    #[must_use]
    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank.max(1);
        self
    }
}

/// A pre-linked mention: a token span with its surface phrase and the
/// entities upstream annotation says it evokes.
///
/// Anonymous (unresolved) evocations are excluded upstream; `evoked` holds
/// only real knowledge-base entities, in annotation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    /// First token of the span.
    pub begin: usize,
    /// One past the last token of the span.
    pub end: usize,
    /// Surface phrase of the span.
    pub phrase: String,
    /// Whether the span starts a sentence.
    pub sentence_initial: bool,
    /// Evoked (ground-truth) entities, non-empty and ordered.
    pub evoked: Vec<EntityId>,
}

impl Mention {
    /// Create a mention.
    #[must_use]
    pub fn new(
        begin: usize,
        end: usize,
        phrase: impl Into<String>,
        sentence_initial: bool,
        evoked: Vec<EntityId>,
    ) -> Self {
        Self {
            begin,
            end,
            phrase: phrase.into(),
            sentence_initial,
            evoked,
        }
    }
}

/// A document ready for resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document title, used for diagnostics only.
    pub title: String,
    /// The entity this document is about, if any.
    pub subject: Option<EntityId>,
    /// Unanchored document-level theme entities.
    pub themes: Vec<EntityId>,
    /// Pre-linked mentions in document order.
    pub mentions: Vec<Mention>,
}

/// Outcome of resolving one (mention, evoked entity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentionOutcome {
    /// The evoked entity was not among the phrase table's candidates.
    Unknown {
        /// Surface phrase of the mention.
        phrase: String,
        /// The evoked entity the phrase table does not cover.
        evoked: EntityId,
    },
    /// The evoked entity ranked at `rank` in the scored candidate list.
    Resolved {
        /// Surface phrase of the mention.
        phrase: String,
        /// The evoked entity.
        evoked: EntityId,
        /// Zero-based position in the score-sorted candidate list.
        rank: usize,
        /// Whether the first candidate in raw table order was the evoked
        /// entity while context re-ranking demoted it.
        prior_loss: bool,
    },
}

/// Per-document resolution result.
///
/// The context model the document was resolved against is updated in place
/// by the caller's `&mut` borrow; this struct carries the per-mention
/// outcomes and the document's statistics for later reduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document title.
    pub title: String,
    /// One outcome per (mention, evoked entity) pair, in document order.
    pub outcomes: Vec<MentionOutcome>,
    /// Statistics for this document alone (`docs == 1`).
    pub stats: AggregateStats,
}

/// Structured resolution event, replacing print-while-computing diagnostics.
#[derive(Debug)]
pub enum ResolveEvent<'a> {
    /// A document's resolution began.
    DocumentStarted {
        /// Document title.
        title: &'a str,
    },
    /// A mention's evoked entity was not covered by the phrase table.
    MentionUnknown {
        /// Surface phrase.
        phrase: &'a str,
        /// The uncovered evoked entity.
        evoked: EntityId,
    },
    /// A mention resolved at some rank.
    MentionResolved {
        /// Surface phrase.
        phrase: &'a str,
        /// The evoked entity.
        evoked: EntityId,
        /// Zero-based rank of the evoked entity.
        rank: usize,
        /// Whether raw table order alone would have ranked it first.
        prior_loss: bool,
        /// Score records sorted descending by score.
        records: &'a [ScoreRecord],
    },
    /// A document's resolution finished.
    DocumentFinished {
        /// Document title.
        title: &'a str,
        /// Entities with accumulated context weight.
        context_size: usize,
        /// Mentions in the document.
        mentions: usize,
    },
}

/// Observer for resolution events.
pub trait ResolveObserver {
    /// Called for every resolution event, in document order.
    fn on_event(&mut self, event: &ResolveEvent<'_>);
}

/// No-op observer.
impl ResolveObserver for () {
    fn on_event(&mut self, _event: &ResolveEvent<'_>) {}
}

/// Observer that renders events through the `log` facade.
///
/// Reproduces the classic diagnostic listing: ranked candidates are logged
/// only when the top-ranked entity is not the evoked one, truncated after
/// the evoked entity's row.
pub struct LogObserver<'a> {
    kb: &'a dyn KnowledgeBase,
}

impl<'a> LogObserver<'a> {
    /// Create a log observer that renders entity names from `kb`.
    #[must_use]
    pub fn new(kb: &'a dyn KnowledgeBase) -> Self {
        Self { kb }
    }
}

impl ResolveObserver for LogObserver<'_> {
    fn on_event(&mut self, event: &ResolveEvent<'_>) {
        match event {
            ResolveEvent::DocumentStarted { title } => {
                log::info!("Document: {title}");
            }
            ResolveEvent::MentionUnknown { phrase, evoked } => {
                log::debug!("N/A {phrase} {}", self.kb.describe(*evoked));
            }
            ResolveEvent::MentionResolved {
                phrase,
                evoked,
                rank,
                records,
                ..
            } => {
                if *rank == 0 {
                    return;
                }
                log::debug!("{phrase} {}", self.kb.display_name(*evoked));
                for (shown, record) in records.iter().enumerate() {
                    let hint = match record.clue {
                        Some(clue) => {
                            format!(" {{{}:{}}}", self.kb.display_name(clue), record.clue_weight)
                        }
                        None => String::new(),
                    };
                    log::debug!(
                        "{:>11.4} {} {:>5} {:>8.4} {}{}",
                        record.score,
                        record.candidate.form.as_label(),
                        record.candidate.count,
                        record.context_score,
                        self.kb.describe(record.candidate.entity),
                        hint
                    );
                    if record.candidate.entity == *evoked {
                        let remaining = records.len() - shown - 1;
                        if remaining > 0 {
                            log::debug!("... and {remaining} more");
                        }
                        break;
                    }
                }
            }
            ResolveEvent::DocumentFinished {
                title,
                context_size,
                mentions,
            } => {
                log::info!("{title}: {context_size} entities in context, {mentions} mentions");
            }
        }
    }
}

/// Entity disambiguation resolver.
///
/// Borrows the knowledge base and phrase table read-only; one resolver can
/// serve many documents.
///
/// # Example
///
/// ```rust
/// use evoke::prelude::*;
///
/// let mut kb = MemoryKb::new();
/// let city = kb.add_entity("Q90");
/// let town = kb.add_entity("Q830149");
///
/// let mut phrases = MemoryPhraseTable::new();
/// phrases.insert("Paris", city, CaseForm::Title, 9000);
/// phrases.insert("Paris", town, CaseForm::Title, 100);
///
/// let doc = Document {
///     title: "Paris".into(),
///     subject: Some(city),
///     themes: vec![],
///     mentions: vec![Mention::new(0, 1, "Paris", false, vec![city])],
/// };
///
/// let resolver = Resolver::new(&kb, &phrases);
/// let mut context = ContextModel::new();
/// let result = resolver.resolve_document(&doc, &mut context);
/// assert_eq!(result.stats.resolved, 1);
/// assert_eq!(result.stats.unknown, 0);
/// ```
pub struct Resolver<'a> {
    kb: &'a dyn KnowledgeBase,
    phrases: &'a dyn PhraseTable,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with the default configuration.
    #[must_use]
    pub fn new(kb: &'a dyn KnowledgeBase, phrases: &'a dyn PhraseTable) -> Self {
        Self {
            kb,
            phrases,
            config: ResolverConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a document against a fresh or caller-managed context model.
    pub fn resolve_document(
        &self,
        doc: &Document,
        context: &mut ContextModel,
    ) -> DocumentResult {
        self.resolve_document_observed(doc, context, &mut ())
    }

    /// Resolve a document, reporting structured events to `observer`.
    pub fn resolve_document_observed(
        &self,
        doc: &Document,
        context: &mut ContextModel,
        observer: &mut dyn ResolveObserver,
    ) -> DocumentResult {
        observer.on_event(&ResolveEvent::DocumentStarted { title: &doc.title });

        let mut stats = AggregateStats::with_buckets(self.config.max_rank);
        stats.docs = 1;
        let mut outcomes = Vec::new();

        if let Some(subject) = doc.subject {
            context.seed_topic(subject, self.config.topic_weight);
        }
        context.seed_themes(self.kb, &doc.themes, self.config.thematic_weight);

        for mention in &doc.mentions {
            let matches = self.phrases.query(&mention.phrase);
            let form = self
                .phrases
                .form(&mention.phrase)
                .normalized(mention.sentence_initial);

            for &evoked in &mention.evoked {
                let mut records =
                    score_candidates(self.kb, context, form, &matches, &self.config);
                records.sort_by(|a, b| b.score.total_cmp(&a.score));

                let Some(rank) = records
                    .iter()
                    .position(|r| r.candidate.entity == evoked)
                else {
                    // Phrase table does not cover this entity for this
                    // phrase; count it and move on without touching context.
                    stats.unknown += 1;
                    observer.on_event(&ResolveEvent::MentionUnknown {
                        phrase: &mention.phrase,
                        evoked,
                    });
                    outcomes.push(MentionOutcome::Unknown {
                        phrase: mention.phrase.clone(),
                        evoked,
                    });
                    continue;
                };

                // Prior loss is measured against the first candidate in raw
                // table order, not an explicit frequency maximum.
                let prior_loss =
                    rank > 0 && matches.first().map(|m| m.entity) == Some(evoked);

                stats.record_rank(rank);
                if prior_loss {
                    stats.prior_losses += 1;
                }

                observer.on_event(&ResolveEvent::MentionResolved {
                    phrase: &mention.phrase,
                    evoked,
                    rank,
                    prior_loss,
                    records: &records,
                });
                outcomes.push(MentionOutcome::Resolved {
                    phrase: mention.phrase.clone(),
                    evoked,
                    rank,
                    prior_loss,
                });

                // The model learns the ground-truth entity, not the
                // prediction.
                context.absorb(self.kb, evoked, self.config.mention_weight);
            }
        }

        observer.on_event(&ResolveEvent::DocumentFinished {
            title: &doc.title,
            context_size: context.len(),
            mentions: doc.mentions.len(),
        });

        DocumentResult {
            title: doc.title.clone(),
            outcomes,
            stats,
        }
    }
}
