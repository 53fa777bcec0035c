use fxhash::FxHashMap;

use crate::lm::{LanguageModel, WordIndex};

pub const UNK: WordIndex = 0;
pub const BOS: WordIndex = 1;
pub const EOS: WordIndex = 2;

/// Deterministic table-driven backoff model used in tests and demos.
///
/// Each lookup tries the longest history first. Every history word dropped on
/// the way down adds `backoff_penalty`; a word with no unigram entry scores
/// `unknown_log_prob` plus the penalties.
#[derive(Debug, Clone)]
pub struct StubLanguageModel {
    order: usize,
    vocab: FxHashMap<String, WordIndex>,
    ngrams: FxHashMap<Vec<WordIndex>, f64>,
    backoff_penalty: f64,
    unknown_log_prob: f64,
}

impl StubLanguageModel {
    pub fn new(order: usize) -> Self {
        let mut vocab = FxHashMap::default();
        vocab.insert("<unk>".to_string(), UNK);
        vocab.insert("<s>".to_string(), BOS);
        vocab.insert("</s>".to_string(), EOS);
        Self {
            order: order.max(1),
            vocab,
            ngrams: FxHashMap::default(),
            backoff_penalty: -0.5,
            unknown_log_prob: -7.0,
        }
    }

    /// Add an explicit n-gram (history words followed by the predicted word).
    pub fn with_ngram(mut self, words: &[&str], log_prob: f64) -> Self {
        let key = words.iter().map(|word| self.intern(word)).collect();
        self.ngrams.insert(key, log_prob);
        self
    }

    pub fn with_backoff_penalty(mut self, penalty: f64) -> Self {
        self.backoff_penalty = penalty;
        self
    }

    pub fn with_unknown_log_prob(mut self, log_prob: f64) -> Self {
        self.unknown_log_prob = log_prob;
        self
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    fn intern(&mut self, word: &str) -> WordIndex {
        let next = self.vocab.len() as WordIndex;
        *self.vocab.entry(word.to_string()).or_insert(next)
    }
}

impl LanguageModel for StubLanguageModel {
    type Context = Vec<WordIndex>;

    fn order(&self) -> usize {
        self.order
    }

    fn begin_sentence(&self) -> Vec<WordIndex> {
        vec![BOS]
    }

    fn index(&self, word: &str) -> WordIndex {
        self.vocab.get(word).copied().unwrap_or(UNK)
    }

    fn end_sentence_index(&self) -> WordIndex {
        EOS
    }

    fn score(&self, context: &Vec<WordIndex>, word: WordIndex) -> (f64, Vec<WordIndex>) {
        let history = &context[context.len().saturating_sub(self.order - 1)..];

        let mut log_prob = None;
        let mut key = Vec::with_capacity(history.len() + 1);
        for dropped in 0..=history.len() {
            key.clear();
            key.extend_from_slice(&history[dropped..]);
            key.push(word);
            if let Some(lp) = self.ngrams.get(&key) {
                log_prob = Some(lp + self.backoff_penalty * dropped as f64);
                break;
            }
        }
        let log_prob = log_prob
            .unwrap_or(self.unknown_log_prob + self.backoff_penalty * history.len() as f64);

        let mut next = history.to_vec();
        next.push(word);
        let keep = self.order - 1;
        if next.len() > keep {
            next.drain(..next.len() - keep);
        }
        (log_prob, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bigram() -> StubLanguageModel {
        StubLanguageModel::new(2)
            .with_ngram(&["the"], -1.0)
            .with_ngram(&["cat"], -2.0)
            .with_ngram(&["<s>", "the"], -0.3)
            .with_ngram(&["the", "cat"], -0.4)
            .with_ngram(&["cat", "</s>"], -0.2)
    }

    #[test]
    fn special_tokens_are_preinterned() {
        let lm = bigram();
        assert_eq!(lm.index("<s>"), BOS);
        assert_eq!(lm.index("</s>"), EOS);
        assert_eq!(lm.index("zebra"), UNK);
        assert_eq!(lm.vocab_size(), 5);
    }

    #[test]
    fn longest_history_wins() {
        let lm = bigram();
        let start = lm.begin_sentence();
        let (lp, ctx) = lm.score(&start, lm.index("the"));
        assert_eq!(lp, -0.3);
        let (lp, ctx) = lm.score(&ctx, lm.index("cat"));
        assert_eq!(lp, -0.4);
        let (lp, _) = lm.score(&ctx, lm.end_sentence_index());
        assert_eq!(lp, -0.2);
    }

    #[test]
    fn backoff_adds_penalty() {
        let lm = bigram();
        let (_, ctx) = lm.score(&lm.begin_sentence(), lm.index("cat"));
        // No "cat the" bigram: unigram plus one backoff step.
        let (lp, _) = lm.score(&ctx, lm.index("the"));
        assert_eq!(lp, -1.0 + -0.5);
    }

    #[test]
    fn unknown_words_use_floor() {
        let lm = bigram().with_unknown_log_prob(-9.0);
        let (lp, ctx) = lm.score(&lm.begin_sentence(), lm.index("zebra"));
        assert_eq!(lp, -9.0 + -0.5);
        assert_eq!(ctx, vec![UNK]);
    }

    #[test]
    fn context_is_truncated_to_order() {
        let lm = StubLanguageModel::new(3);
        let (_, ctx) = lm.score(&lm.begin_sentence(), 7);
        let (_, ctx) = lm.score(&ctx, 8);
        let (_, ctx) = lm.score(&ctx, 9);
        assert_eq!(ctx, vec![8, 9]);
    }

    #[test]
    fn unigram_model_ignores_history() {
        let lm = StubLanguageModel::new(1).with_ngram(&["a"], -1.5);
        let (lp, ctx) = lm.score(&lm.begin_sentence(), lm.index("a"));
        assert_eq!(lp, -1.5);
        assert!(ctx.is_empty());
    }
}
