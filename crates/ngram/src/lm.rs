//! Backend seam for n-gram log-probabilities.

use std::fmt::Debug;

/// Vocabulary id assigned by a backend.
pub type WordIndex = u32;

/// An n-gram language model queried one word at a time.
///
/// The backend threads its own `Context` (the truncated history) through
/// successive calls, so a sentence can be resumed from any stored position.
/// Scores are base-10 log-probabilities, as produced by ARPA-style models.
pub trait LanguageModel: Send + Sync {
    type Context: Clone + Debug + Send + Sync;

    fn order(&self) -> usize;

    /// Context at the start of a sentence, after `<s>`.
    fn begin_sentence(&self) -> Self::Context;

    /// Vocabulary id of `word`; unknown words map to the backend's `<unk>`.
    fn index(&self, word: &str) -> WordIndex;

    fn end_sentence_index(&self) -> WordIndex;

    /// Log-probability of `word` after `context`, and the context that
    /// follows it.
    fn score(&self, context: &Self::Context, word: WordIndex) -> (f64, Self::Context);
}
