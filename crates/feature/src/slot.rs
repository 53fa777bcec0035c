//! Ownership wrappers around the committed state of one feature function.
//!
//! [`StateSlot::estimate`] borrows the slot immutably, so any number of
//! candidates can be produced from the same committed state (also from
//! several threads). [`StateSlot::commit`] needs `&mut self` and consumes the
//! [`Candidate`], which makes "reuse a candidate after commit" and "commit
//! while estimating" compile errors. Candidates estimated against an older
//! generation or another slot are rejected at runtime.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::document::Document;
use crate::error::ProtocolError;
use crate::protocol::FeatureFunction;
use crate::step::SearchStep;

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Committed state and scores of one feature function for one document.
pub struct StateSlot<F: FeatureFunction> {
    state: F::State,
    scores: Vec<f64>,
    slot_id: u64,
    generation: u64,
}

/// A speculative evaluation waiting to be committed or dropped.
pub struct Candidate<M> {
    modifications: M,
    scores: Vec<f64>,
    slot_id: u64,
    generation: u64,
}

impl<M> Candidate<M> {
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Committed generation this candidate was estimated against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn modifications(&self) -> &M {
        &self.modifications
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Candidate<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("scores", &self.scores)
            .field("slot_id", &self.slot_id)
            .field("generation", &self.generation)
            .field("modifications", &self.modifications)
            .finish()
    }
}

impl<F: FeatureFunction> StateSlot<F> {
    /// Initialize the committed state for `doc`.
    pub fn init(feature: &F, doc: &Document) -> Self {
        let mut scores = vec![0.0; feature.score_count()];
        let state = feature.init_document(doc, &mut scores);
        Self {
            state,
            scores,
            slot_id: NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    pub fn state(&self) -> &F::State {
        &self.state
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Estimate and finalize `step` against the committed state.
    ///
    /// `doc` must be the hypothesis the committed state was built from.
    pub fn estimate(
        &self,
        feature: &F,
        doc: &Document,
        step: &SearchStep,
    ) -> Result<Candidate<F::Modifications>, ProtocolError> {
        step.validate(doc)?;

        let mut scores = self.scores.clone();
        let estimate =
            feature.estimate_score_update(doc, step, &self.state, &self.scores, &mut scores);
        let modifications =
            feature.update_score(doc, step, &self.state, estimate, &self.scores, &mut scores);

        Ok(Candidate {
            modifications,
            scores,
            slot_id: self.slot_id,
            generation: self.generation,
        })
    }

    /// Verify that `candidate` can be committed into this slot.
    pub fn check<M>(&self, candidate: &Candidate<M>) -> Result<(), ProtocolError> {
        if candidate.slot_id != self.slot_id {
            return Err(ProtocolError::ForeignCandidate);
        }
        if candidate.generation != self.generation {
            return Err(ProtocolError::StaleCandidate {
                expected: self.generation,
                found: candidate.generation,
            });
        }
        Ok(())
    }

    /// Move `candidate` into the committed slot.
    pub fn commit(
        &mut self,
        feature: &F,
        candidate: Candidate<F::Modifications>,
    ) -> Result<(), ProtocolError> {
        self.check(&candidate)?;

        let Candidate {
            modifications,
            scores,
            ..
        } = candidate;
        feature.apply_state_modifications(&mut self.state, modifications);
        self.scores = scores;
        self.generation += 1;

        trace!(
            feature = feature.name(),
            generation = self.generation,
            "state_committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Sentence;
    use crate::step::Modification;

    /// Counts sentences that still have a final word.
    struct NonEmptySentences;

    impl FeatureFunction for NonEmptySentences {
        type State = Vec<bool>;
        type Modifications = Vec<(usize, bool)>;

        fn name(&self) -> &'static str {
            "non-empty"
        }

        fn init_document(&self, doc: &Document, scores: &mut [f64]) -> Self::State {
            let state: Vec<bool> = doc.sentences().iter().map(|s| !s.is_empty()).collect();
            scores[0] = state.iter().filter(|b| **b).count() as f64;
            state
        }

        fn compute_sentence_scores(&self, doc: &Document, sentence: usize, scores: &mut [f64]) {
            scores[0] = f64::from(u8::from(doc.final_word(sentence).is_some()));
        }

        fn estimate_score_update(
            &self,
            _doc: &Document,
            step: &SearchStep,
            state: &Self::State,
            prev_scores: &[f64],
            scores: &mut [f64],
        ) -> Self::Modifications {
            let mut total = prev_scores[0];
            let mut changes = Vec::new();
            for m in step.modifications() {
                let now = m.proposed_final_word().is_some();
                total += f64::from(u8::from(now)) - f64::from(u8::from(state[m.sentence]));
                changes.push((m.sentence, now));
            }
            scores[0] = total;
            changes
        }

        fn apply_state_modifications(&self, state: &mut Self::State, modifications: Self::Modifications) {
            for (sentence, now) in modifications {
                state[sentence] = now;
            }
        }
    }

    fn doc() -> Document {
        Document::from_lines("doc", ["a b", "c", "d e f"])
    }

    #[test]
    fn estimate_leaves_committed_state_untouched() {
        let feature = NonEmptySentences;
        let doc = doc();
        let slot = StateSlot::init(&feature, &doc);
        assert_eq!(slot.scores(), &[3.0]);

        let step = SearchStep::single(Modification::remove(1));
        let candidate = slot.estimate(&feature, &doc, &step).expect("valid step");

        assert_eq!(candidate.scores(), &[2.0]);
        assert_eq!(slot.scores(), &[3.0]);
        assert_eq!(slot.state(), &vec![true, true, true]);
    }

    #[test]
    fn commit_adopts_candidate_and_bumps_generation() {
        let feature = NonEmptySentences;
        let mut doc = doc();
        let mut slot = StateSlot::init(&feature, &doc);

        let step = SearchStep::single(Modification::remove(0));
        let candidate = slot.estimate(&feature, &doc, &step).expect("valid step");
        slot.commit(&feature, candidate).expect("fresh candidate");
        doc.apply(step);

        assert_eq!(slot.generation(), 1);
        assert_eq!(slot.scores(), &[2.0]);
        assert_eq!(slot.state(), &vec![false, true, true]);
    }

    #[test]
    fn stale_candidate_rejected() {
        let feature = NonEmptySentences;
        let doc = doc();
        let mut slot = StateSlot::init(&feature, &doc);

        let first = slot
            .estimate(&feature, &doc, &SearchStep::single(Modification::remove(0)))
            .expect("valid");
        let second = slot
            .estimate(&feature, &doc, &SearchStep::single(Modification::remove(2)))
            .expect("valid");

        slot.commit(&feature, first).expect("first commit");
        let err = slot.commit(&feature, second).expect_err("second is stale");
        assert_eq!(
            err,
            ProtocolError::StaleCandidate {
                expected: 1,
                found: 0
            }
        );
        assert_eq!(slot.state(), &vec![false, true, true]);
    }

    #[test]
    fn foreign_candidate_rejected() {
        let feature = NonEmptySentences;
        let doc = doc();
        let slot_a = StateSlot::init(&feature, &doc);
        let mut slot_b = StateSlot::init(&feature, &doc);

        let candidate = slot_a
            .estimate(&feature, &doc, &SearchStep::single(Modification::remove(0)))
            .expect("valid");
        assert_eq!(
            slot_b.commit(&feature, candidate),
            Err(ProtocolError::ForeignCandidate)
        );
    }

    #[test]
    fn out_of_range_step_rejected_before_estimation() {
        let feature = NonEmptySentences;
        let doc = doc();
        let slot = StateSlot::init(&feature, &doc);
        let step = SearchStep::single(Modification::replace(9, Sentence::from_text("x")));
        assert!(matches!(
            slot.estimate(&feature, &doc, &step),
            Err(ProtocolError::SentenceOutOfRange { sentence: 9, len: 3 })
        ));
    }

    #[test]
    fn concurrent_estimates_share_one_slot() {
        let feature = NonEmptySentences;
        let doc = doc();
        let slot = StateSlot::init(&feature, &doc);

        let totals: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..3)
                .map(|i| {
                    let (feature, doc, slot) = (&feature, &doc, &slot);
                    scope.spawn(move || {
                        let step = SearchStep::single(Modification::remove(i));
                        slot.estimate(feature, doc, &step).expect("valid").scores()[0]
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(totals, vec![2.0, 2.0, 2.0]);
        assert_eq!(slot.generation(), 0);
    }
}
