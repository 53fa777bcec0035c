//! Incremental rhyme bookkeeping for one document.
//!
//! For every rhyme key the state keeps a membership bitset over sentence
//! positions and a cached entropy of the gaps between consecutive members.
//! Edits only recompute the keys they touch; the aggregate is refreshed with
//! [`RhymeState::update_score`] once all touched keys are recomputed.

use bitvec::prelude::*;
use fxhash::FxHashMap;
use tracing::{debug, trace, Level};

use crate::config::{CoverageFold, KeyReconciliation, ScoringPolicy};

/// Rhyme model state. Cloned on every estimate, moved in on commit.
#[derive(Debug, Clone)]
pub struct RhymeState {
    doc_size: usize,
    max_gap_size: usize,
    policy: ScoringPolicy,
    words: Vec<String>,
    membership: FxHashMap<String, BitVec>,
    entropy: FxHashMap<String, f64>,
    aggregate: f64,
}

impl RhymeState {
    pub fn new(doc_size: usize, max_gap_size: usize, policy: ScoringPolicy) -> Self {
        Self {
            doc_size,
            max_gap_size,
            policy,
            words: vec![String::new(); doc_size],
            membership: FxHashMap::default(),
            entropy: FxHashMap::default(),
            aggregate: 0.0,
        }
    }

    /// Record that `word` at `sentence` carries `key`.
    ///
    /// A key equal to the word is ignored.
    pub fn set_membership(&mut self, sentence: usize, word: &str, key: &str) {
        if key == word || sentence >= self.doc_size {
            return;
        }
        let doc_size = self.doc_size;
        self.membership
            .entry(key.to_string())
            .or_insert_with(|| bitvec![0; doc_size])
            .set(sentence, true);
        word.clone_into(&mut self.words[sentence]);
    }

    /// Drop `sentence` from `key`'s members.
    ///
    /// The word table keeps the old word; it is overwritten by the next
    /// [`set_membership`](Self::set_membership) at that position.
    pub fn clear_membership(&mut self, sentence: usize, word: &str, key: &str) {
        if key == word || sentence >= self.doc_size {
            return;
        }
        let doc_size = self.doc_size;
        let bits = self.membership.entry(key.to_string()).or_insert_with(|| {
            debug!(key, sentence, word, "clear_unseen_rhyme_key");
            bitvec![0; doc_size]
        });
        bits.set(sentence, false);
    }

    /// Recompute the cached entropy of `key`. Unknown keys are ignored.
    pub fn recompute_entropy(&mut self, key: &str) {
        let Some(bits) = self.membership.get(key) else {
            return;
        };
        let entropy = gap_entropy(bits, &self.words, self.max_gap_size);
        match self.entropy.get_mut(key) {
            Some(slot) => *slot = entropy,
            None => {
                self.entropy.insert(key.to_string(), entropy);
            }
        }
    }

    /// Recompute every key. Only needed when a document is initialized.
    pub fn recompute_all_entropies(&mut self) {
        for (key, bits) in &self.membership {
            let entropy = gap_entropy(bits, &self.words, self.max_gap_size);
            self.entropy.insert(key.clone(), entropy);
        }
    }

    /// Refresh the aggregate from the entropy cache and document coverage.
    pub fn update_score(&mut self) {
        let mut coverage = bitvec![0; self.doc_size];
        let mut total = 0.0;
        for (key, entropy) in &self.entropy {
            total += entropy;
            let Some(bits) = self.membership.get(key) else {
                continue;
            };
            for i in bits.iter_ones() {
                let covered = match self.policy.coverage {
                    CoverageFold::Toggle => !coverage[i],
                    CoverageFold::Union => true,
                };
                coverage.set(i, covered);
            }
        }

        let ratio = if self.doc_size == 0 {
            0.0
        } else {
            coverage.count_ones() as f64 / self.doc_size as f64
        };
        let previous = self.aggregate;
        self.aggregate = total * ratio;

        if self.aggregate > previous {
            debug!(
                old_score = self.exposed(previous),
                new_score = self.exposed(self.aggregate),
                covered = coverage.count_ones(),
                doc_size = self.doc_size,
                "rhyme_score_improved"
            );
            if tracing::enabled!(Level::TRACE) {
                self.dump();
            }
        }
    }

    /// Apply a final-word change at `sentence`.
    ///
    /// Absent words are passed as `""` with no keys. Returns the keys whose
    /// membership changed and whose entropy was recomputed; the aggregate is
    /// left for the caller to refresh.
    pub fn change_word(
        &mut self,
        sentence: usize,
        old_word: &str,
        old_keys: &[&str],
        new_word: &str,
        new_keys: &[&str],
    ) -> Vec<String> {
        let touched: Vec<&str> = match self.policy.reconciliation {
            KeyReconciliation::AllKeys => {
                for key in old_keys {
                    self.clear_membership(sentence, old_word, key);
                }
                for key in new_keys {
                    self.set_membership(sentence, new_word, key);
                }
                if let Some(slot) = self.words.get_mut(sentence) {
                    new_word.clone_into(slot);
                }
                let mut union = old_keys.to_vec();
                union.extend(
                    new_keys
                        .iter()
                        .copied()
                        .filter(|key| !old_keys.contains(key)),
                );
                union
            }
            KeyReconciliation::SharedKeys => {
                let shared: Vec<&str> = old_keys
                    .iter()
                    .copied()
                    .filter(|key| new_keys.contains(key))
                    .collect();
                for key in &shared {
                    self.clear_membership(sentence, old_word, key);
                    self.set_membership(sentence, new_word, key);
                }
                shared
            }
        };

        for key in &touched {
            self.recompute_entropy(key);
        }
        touched.into_iter().map(str::to_string).collect()
    }

    /// Exposed score: `-1 / aggregate`, or the degenerate score when that is
    /// not a finite number.
    pub fn score(&self) -> f64 {
        self.exposed(self.aggregate)
    }

    fn exposed(&self, aggregate: f64) -> f64 {
        if aggregate > 0.0 && aggregate.is_finite() {
            let score = -1.0 / aggregate;
            if score.is_finite() {
                return score;
            }
        }
        self.policy.degenerate_score
    }

    pub fn aggregate(&self) -> f64 {
        self.aggregate
    }

    pub fn doc_size(&self) -> usize {
        self.doc_size
    }

    pub fn max_gap_size(&self) -> usize {
        self.max_gap_size
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Cached entropy of `key`.
    pub fn entropy(&self, key: &str) -> Option<f64> {
        self.entropy.get(key).copied()
    }

    pub fn entropies(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entropy.iter().map(|(key, entropy)| (key.as_str(), *entropy))
    }

    pub fn membership(&self, key: &str) -> Option<&BitSlice> {
        self.membership.get(key).map(BitVec::as_bitslice)
    }

    /// Sentence positions currently carrying `key`.
    pub fn members(&self, key: &str) -> Vec<usize> {
        self.membership
            .get(key)
            .map(|bits| bits.iter_ones().collect())
            .unwrap_or_default()
    }

    /// Word last recorded at `sentence`.
    ///
    /// Under [`KeyReconciliation::SharedKeys`] this is the word of the last
    /// membership set at that position.
    pub fn word_at(&self, sentence: usize) -> Option<&str> {
        self.words
            .get(sentence)
            .map(String::as_str)
            .filter(|word| !word.is_empty())
    }

    pub fn key_count(&self) -> usize {
        self.membership.len()
    }

    fn dump(&self) {
        for (key, bits) in &self.membership {
            if bits.count_ones() > 1 {
                let members: Vec<usize> = bits.iter_ones().collect();
                trace!(key = key.as_str(), members = ?members, "rhyme_key_members");
            }
        }
        for (key, entropy) in &self.entropy {
            if *entropy > 0.0 {
                trace!(key = key.as_str(), entropy, "rhyme_key_entropy");
            }
        }
    }
}

/// Entropy of the gap distribution between consecutive members, scaled by how
/// often the rhyming word actually changes.
///
/// Only gaps up to `max_gap` are observations, but probabilities are taken
/// over all adjacent member pairs.
fn gap_entropy(bits: &BitSlice, words: &[String], max_gap: usize) -> f64 {
    let mut gap_counts: FxHashMap<usize, usize> = FxHashMap::default();
    let mut pairs = 0usize;
    let mut changes = 0usize;
    let mut previous: Option<usize> = None;

    for i in bits.iter_ones() {
        if let Some(p) = previous {
            let gap = i - p;
            if gap <= max_gap {
                *gap_counts.entry(gap).or_insert(0) += 1;
                pairs += 1;
                if words[p] != words[i] {
                    changes += 1;
                }
            }
        }
        previous = Some(i);
    }

    let adjacent = bits.count_ones().saturating_sub(1);
    let mut entropy = 0.0;
    if adjacent > 0 {
        for &count in gap_counts.values() {
            let p = count as f64 / adjacent as f64;
            entropy -= p * p.log2();
        }
    }
    if pairs > 0 {
        entropy *= (changes + 1) as f64 / (pairs + 1) as f64;
    }
    entropy
}
