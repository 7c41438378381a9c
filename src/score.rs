//! Candidate scoring.
//!
//! Each candidate gets a context score (accumulated relevance plus weight
//! propagated over the entity's link graph, penalized on case-form
//! mismatch) multiplied by its prior frequency. Either signal can dominate
//! only while the other is near its floor: an extremely frequent candidate
//! still loses to a rarer one with strong context support, and vice versa.

use crate::case::{compatible, CaseForm};
use crate::context::ContextModel;
use crate::entity::{EntityId, KnowledgeBase};
use crate::phrase::CandidateMatch;
use crate::resolver::ResolverConfig;

/// Score for one candidate match, with the context evidence that produced it.
///
/// Ephemeral: exists only while one mention is being ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    /// The scored candidate.
    pub candidate: CandidateMatch,
    /// Final score: context score times prior count.
    pub score: f64,
    /// Context score before the prior multiplier.
    pub context_score: f64,
    /// The linked entity that contributed the most context mass, if any
    /// contribution exceeded the base floor.
    pub clue: Option<EntityId>,
    /// The clue's contribution (base floor when there is no clue).
    pub clue_weight: f64,
}

/// Score all candidate matches for a phrase against the current context.
///
/// `form` is the mention's case-form after sentence-initial normalization.
/// The output is unsorted; ranking is the resolver's concern. Candidates
/// unseen in context score from `base_context_score`, so every candidate
/// has a nonzero score.
#[must_use]
pub fn score_candidates(
    kb: &dyn KnowledgeBase,
    context: &ContextModel,
    form: CaseForm,
    matches: &[CandidateMatch],
    config: &ResolverConfig,
) -> Vec<ScoreRecord> {
    matches
        .iter()
        .map(|m| {
            let mut context_score = context.get(m.entity, config.base_context_score);
            let mut clue = None;
            let mut clue_weight = config.base_context_score;
            for &(link, count) in kb.links(m.entity) {
                let contribution = context.get(link, 0.0) * f64::from(count);
                context_score += contribution;
                if contribution > clue_weight {
                    clue = Some(link);
                    clue_weight = contribution;
                }
            }
            if !compatible(form, m.form) {
                context_score *= config.form_penalty;
            }
            ScoreRecord {
                candidate: *m,
                score: context_score * m.count as f64,
                context_score,
                clue,
                clue_weight,
            }
        })
        .collect()
}
