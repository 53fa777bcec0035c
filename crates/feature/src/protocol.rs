//! The feature-function contract shared by every scorer.
//!
//! A feature function keeps one private `State` per document. The driver asks
//! for a speculative score of a [`SearchStep`] with
//! [`estimate_score_update`](FeatureFunction::estimate_score_update), which
//! borrows the committed state immutably and returns a `Modifications` value
//! describing the candidate. Most candidates are simply dropped. The accepted
//! one optionally passes through [`update_score`](FeatureFunction::update_score)
//! and is then moved into the committed state by
//! [`apply_state_modifications`](FeatureFunction::apply_state_modifications).
//!
//! Each implementation names its own state and modification types, so the
//! protocol never needs to downcast a state handed back by the driver.

use crate::document::Document;
use crate::step::SearchStep;

pub trait FeatureFunction: Send + Sync {
    /// Per-document memory owned by the committed slot.
    type State: Send + Sync;
    /// Pending change produced by estimation and consumed by commit.
    type Modifications: Send;

    /// Short identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Number of score slots this feature function writes.
    fn score_count(&self) -> usize {
        1
    }

    /// Build the committed state for a fresh document and write its scores.
    fn init_document(&self, doc: &Document, scores: &mut [f64]) -> Self::State;

    /// Scores attributable to a single sentence.
    fn compute_sentence_scores(&self, doc: &Document, sentence: usize, scores: &mut [f64]);

    /// Score `step` applied to `doc` without touching `state`.
    ///
    /// `prev_scores` are the committed scores; `scores` receives the estimate.
    fn estimate_score_update(
        &self,
        doc: &Document,
        step: &SearchStep,
        state: &Self::State,
        prev_scores: &[f64],
        scores: &mut [f64],
    ) -> Self::Modifications;

    /// Finalize an estimate, possibly replacing an approximate score with an
    /// exact one. `scores` holds the estimate on entry.
    fn update_score(
        &self,
        _doc: &Document,
        _step: &SearchStep,
        _state: &Self::State,
        estimate: Self::Modifications,
        _prev_scores: &[f64],
        _scores: &mut [f64],
    ) -> Self::Modifications {
        estimate
    }

    /// Fold an accepted candidate into the committed state.
    fn apply_state_modifications(&self, state: &mut Self::State, modifications: Self::Modifications);
}
