//! N-gram language model feature function.
//!
//! The state stores, for every sentence, the backend context and
//! log-probability after each token (plus the closing `</s>`). An edited
//! sentence is rescored from the end of its longest common token prefix with
//! the committed sentence, so the cost of an estimate follows the size of the
//! edit rather than the length of the document.

use feature::{Document, FeatureFunction, SearchStep, Sentence};
use tracing::{debug, trace};

use crate::lm::LanguageModel;

/// Per-sentence scoring trail.
#[derive(Debug, Clone)]
pub struct SentenceState<C> {
    /// `(context after, log-prob)` per token, then one entry for `</s>`.
    words: Vec<(C, f64)>,
    score: f64,
}

impl<C> SentenceState<C> {
    fn empty() -> Self {
        Self {
            words: Vec::new(),
            score: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Scored positions, including the sentence end.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NgramState<C> {
    sentences: Vec<SentenceState<C>>,
    total: f64,
}

impl<C> NgramState<C> {
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn sentence(&self, index: usize) -> Option<&SentenceState<C>> {
        self.sentences.get(index)
    }
}

/// Rescored sentences of a candidate and the document total they imply.
#[derive(Debug, Clone)]
pub struct NgramModifications<C> {
    rescored: Vec<(usize, SentenceState<C>)>,
    total: f64,
}

impl<C> NgramModifications<C> {
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn rescored(&self) -> impl Iterator<Item = (usize, &SentenceState<C>)> {
        self.rescored.iter().map(|(index, state)| (*index, state))
    }
}

pub struct NgramModel<M> {
    lm: M,
}

impl<M: LanguageModel> NgramModel<M> {
    pub fn new(lm: M) -> Self {
        Self { lm }
    }

    pub fn language_model(&self) -> &M {
        &self.lm
    }

    /// Score `tokens` from scratch. Empty sentences score 0.
    pub fn score_tokens(&self, tokens: &[String]) -> SentenceState<M::Context> {
        self.rescore(tokens, &[], &SentenceState::empty())
    }

    /// Score `tokens`, reusing the trail of `previous` for the prefix shared
    /// with `previous_tokens`.
    fn rescore(
        &self,
        tokens: &[String],
        previous_tokens: &[String],
        previous: &SentenceState<M::Context>,
    ) -> SentenceState<M::Context> {
        if tokens.is_empty() {
            return SentenceState::empty();
        }

        let keep = tokens
            .iter()
            .zip(previous_tokens)
            .take_while(|(new, old)| new == old)
            .count()
            .min(previous.words.len());

        let mut words = Vec::with_capacity(tokens.len() + 1);
        words.extend_from_slice(&previous.words[..keep]);
        let mut context = match words.last() {
            Some((context, _)) => context.clone(),
            None => self.lm.begin_sentence(),
        };

        let indices = tokens[keep..]
            .iter()
            .map(|token| self.lm.index(token))
            .chain(std::iter::once(self.lm.end_sentence_index()));
        for index in indices {
            let (log_prob, next) = self.lm.score(&context, index);
            words.push((next.clone(), log_prob));
            context = next;
        }

        let score: f64 = words.iter().map(|(_, log_prob)| log_prob).sum();
        SentenceState { words, score }
    }
}

impl<M: LanguageModel> FeatureFunction for NgramModel<M> {
    type State = NgramState<M::Context>;
    type Modifications = NgramModifications<M::Context>;

    fn name(&self) -> &'static str {
        "ngram"
    }

    fn init_document(&self, doc: &Document, scores: &mut [f64]) -> Self::State {
        let sentences: Vec<_> = doc
            .sentences()
            .iter()
            .map(|sentence| self.score_tokens(sentence.tokens()))
            .collect();
        let total: f64 = sentences.iter().map(SentenceState::score).sum();

        debug!(
            doc_id = doc.id(),
            sentences = sentences.len(),
            order = self.lm.order(),
            total,
            "ngram_document_initialized"
        );
        scores[0] = total;
        NgramState { sentences, total }
    }

    fn compute_sentence_scores(&self, doc: &Document, sentence: usize, scores: &mut [f64]) {
        let tokens = doc.sentence(sentence).map(Sentence::tokens).unwrap_or(&[]);
        scores[0] = self.score_tokens(tokens).score;
    }

    fn estimate_score_update(
        &self,
        doc: &Document,
        step: &SearchStep,
        state: &Self::State,
        _prev_scores: &[f64],
        scores: &mut [f64],
    ) -> Self::Modifications {
        let mut rescored = Vec::with_capacity(step.len());
        let mut total = state.total;

        for modification in step.modifications() {
            let Some(committed) = state.sentences.get(modification.sentence) else {
                continue;
            };
            let committed_tokens = doc
                .sentence(modification.sentence)
                .map(Sentence::tokens)
                .unwrap_or(&[]);
            let next = self.rescore(modification.proposed_tokens(), committed_tokens, committed);
            trace!(
                sentence = modification.sentence,
                old = committed.score,
                new = next.score,
                "ngram_sentence_rescored"
            );
            total += next.score - committed.score;
            rescored.push((modification.sentence, next));
        }

        scores[0] = total;
        NgramModifications { rescored, total }
    }

    fn apply_state_modifications(&self, state: &mut Self::State, modifications: Self::Modifications) {
        for (index, sentence) in modifications.rescored {
            if let Some(slot) = state.sentences.get_mut(index) {
                *slot = sentence;
            }
        }
        state.total = modifications.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lm::WordIndex;
    use crate::stub::StubLanguageModel;
    use feature::{Modification, StateSlot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn lm() -> StubLanguageModel {
        StubLanguageModel::new(3)
            .with_ngram(&["the"], -1.0)
            .with_ngram(&["cat"], -2.0)
            .with_ngram(&["sat"], -2.5)
            .with_ngram(&["dog"], -2.2)
            .with_ngram(&["<s>", "the"], -0.3)
            .with_ngram(&["the", "cat"], -0.7)
            .with_ngram(&["<s>", "the", "cat"], -0.5)
            .with_ngram(&["cat", "sat"], -0.6)
            .with_ngram(&["sat", "</s>"], -0.1)
            .with_ngram(&["</s>"], -1.2)
    }

    /// Counts backend lookups.
    struct Counting {
        inner: StubLanguageModel,
        calls: AtomicUsize,
    }

    impl LanguageModel for Counting {
        type Context = Vec<WordIndex>;

        fn order(&self) -> usize {
            self.inner.order()
        }
        fn begin_sentence(&self) -> Self::Context {
            self.inner.begin_sentence()
        }
        fn index(&self, word: &str) -> WordIndex {
            self.inner.index(word)
        }
        fn end_sentence_index(&self) -> WordIndex {
            self.inner.end_sentence_index()
        }
        fn score(&self, context: &Self::Context, word: WordIndex) -> (f64, Self::Context) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.inner.score(context, word)
        }
    }

    fn doc() -> Document {
        Document::from_lines(
            "lm-doc",
            ["the cat sat", "the dog sat", "a cat", "the cat sat down"],
        )
    }

    #[test]
    fn sentence_score_sums_log_probs() {
        let model = NgramModel::new(lm());
        let tokens: Vec<String> = ["the", "cat", "sat"].map(String::from).to_vec();
        let state = model.score_tokens(&tokens);
        assert_eq!(state.len(), 4);
        // "sat" and "</s>" back off from the trigram once each.
        assert!((state.score() - (-0.3 - 0.5 - 1.1 - 0.6)).abs() < 1e-12);
    }

    #[test]
    fn empty_sentence_scores_zero() {
        let model = NgramModel::new(lm());
        let state = model.score_tokens(&[]);
        assert!(state.is_empty());
        assert_eq!(state.score(), 0.0);
    }

    #[test]
    fn init_total_matches_sentence_scores() {
        let model = NgramModel::new(lm());
        let d = doc();
        let slot = StateSlot::init(&model, &d);
        let mut expected = 0.0;
        for i in 0..d.len() {
            let mut s = [0.0];
            model.compute_sentence_scores(&d, i, &mut s);
            expected += s[0];
        }
        assert!((slot.scores()[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn incremental_estimate_matches_full_rescore() {
        let model = NgramModel::new(lm());
        let d = doc();
        let slot = StateSlot::init(&model, &d);

        let step = SearchStep::new(vec![
            Modification::replace(0, Sentence::from_text("the cat sat down")),
            Modification::replace(1, Sentence::from_text("the cat")),
            Modification::remove(2),
        ])
        .unwrap();
        let candidate = slot.estimate(&model, &d, &step).unwrap();

        let mut edited = d.clone();
        edited.apply(step);
        let fresh = StateSlot::init(&model, &edited);
        assert!((candidate.scores()[0] - fresh.scores()[0]).abs() < 1e-9);

        for (index, rescored) in candidate.modifications().rescored() {
            let expected = fresh.state().sentence(index).unwrap().score();
            assert_eq!(rescored.score(), expected, "sentence {index}");
        }
    }

    #[test]
    fn shared_prefix_is_not_rescored() {
        let model = NgramModel::new(Counting {
            inner: lm(),
            calls: AtomicUsize::new(0),
        });
        let d = doc();
        let slot = StateSlot::init(&model, &d);
        model.language_model().calls.store(0, Ordering::Relaxed);

        // "the cat sat" → "the cat sat down": one new token plus </s>.
        let step = SearchStep::single(Modification::replace(
            0,
            Sentence::from_text("the cat sat down"),
        ));
        slot.estimate(&model, &d, &step).unwrap();
        assert_eq!(model.language_model().calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn commit_replaces_rescored_sentences() {
        let model = NgramModel::new(lm());
        let mut d = doc();
        let mut slot = StateSlot::init(&model, &d);

        let step = SearchStep::single(Modification::replace(2, Sentence::from_text("the cat")));
        let candidate = slot.estimate(&model, &d, &step).unwrap();
        let expected = candidate.scores()[0];
        slot.commit(&model, candidate).unwrap();
        d.apply(step);

        assert_eq!(slot.scores()[0], expected);
        assert_eq!(slot.state().total(), expected);
        let mut s = [0.0];
        model.compute_sentence_scores(&d, 2, &mut s);
        assert_eq!(slot.state().sentence(2).unwrap().score(), s[0]);
    }
}
