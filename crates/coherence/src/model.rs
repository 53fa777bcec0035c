//! Final-word rhyme feature function.
//!
//! Rewards documents whose sentence-final words rhyme at varied, short
//! distances. The candidate state clone is itself the modification payload:
//! estimation edits a private copy, commit moves that copy in.

use feature::{Document, FeatureFunction, SearchStep};
use rhyme::RhymeClassifier;
use tracing::debug;

use crate::config::{RhymeModelConfig, ScoringPolicy};
use crate::error::CoherenceError;
use crate::state::RhymeState;

pub struct FinalWordRhymeModel {
    classifier: RhymeClassifier,
    max_rhyme_distance: usize,
    policy: ScoringPolicy,
}

impl FinalWordRhymeModel {
    pub fn new(classifier: RhymeClassifier, max_rhyme_distance: usize, policy: ScoringPolicy) -> Self {
        Self {
            classifier,
            max_rhyme_distance,
            policy,
        }
    }

    /// Validate `cfg`, compile its rules and load its dictionary.
    pub fn from_config(cfg: &RhymeModelConfig) -> Result<Self, CoherenceError> {
        cfg.validate()?;
        let classifier = RhymeClassifier::from_config(&cfg.rhyme)?;
        classifier.log_pronunciation_table();
        debug!(
            max_rhyme_distance = cfg.max_rhyme_distance,
            coverage = ?cfg.coverage,
            reconciliation = ?cfg.reconciliation,
            "rhyme_model_ready"
        );
        Ok(Self::new(classifier, cfg.max_rhyme_distance, cfg.policy()))
    }

    pub fn classifier(&self) -> &RhymeClassifier {
        &self.classifier
    }

    pub fn max_rhyme_distance(&self) -> usize {
        self.max_rhyme_distance
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    fn keys<'a>(&'a self, word: Option<&'a str>) -> Vec<&'a str> {
        word.map(|word| self.classifier.rhyme_keys(word))
            .unwrap_or_default()
    }
}

impl Default for FinalWordRhymeModel {
    fn default() -> Self {
        let cfg = RhymeModelConfig::default();
        Self::new(RhymeClassifier::english(), cfg.max_rhyme_distance, cfg.policy())
    }
}

impl FeatureFunction for FinalWordRhymeModel {
    type State = RhymeState;
    type Modifications = RhymeState;

    fn name(&self) -> &'static str {
        "final-word-rhyme"
    }

    fn init_document(&self, doc: &Document, scores: &mut [f64]) -> RhymeState {
        let mut state = RhymeState::new(doc.len(), self.max_rhyme_distance, self.policy);
        for (sentence, word) in doc
            .sentences()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.final_word().map(|word| (i, word)))
        {
            for key in self.classifier.rhyme_keys(word) {
                state.set_membership(sentence, word, key);
            }
        }
        state.recompute_all_entropies();
        state.update_score();

        debug!(
            doc_id = doc.id(),
            sentences = doc.len(),
            rhyme_keys = state.key_count(),
            score = state.score(),
            "rhyme_document_initialized"
        );
        scores[0] = state.score();
        state
    }

    fn compute_sentence_scores(&self, _doc: &Document, _sentence: usize, scores: &mut [f64]) {
        scores[0] = 0.0;
    }

    fn estimate_score_update(
        &self,
        doc: &Document,
        step: &SearchStep,
        state: &RhymeState,
        _prev_scores: &[f64],
        scores: &mut [f64],
    ) -> RhymeState {
        let mut candidate = state.clone();
        let mut touched = false;

        for modification in step.modifications() {
            let old_word = doc.final_word(modification.sentence);
            let new_word = modification.proposed_final_word();
            if old_word == new_word {
                continue;
            }
            let old_keys = self.keys(old_word);
            let new_keys = self.keys(new_word);
            let changed = candidate.change_word(
                modification.sentence,
                old_word.unwrap_or_default(),
                &old_keys,
                new_word.unwrap_or_default(),
                &new_keys,
            );
            touched |= !changed.is_empty();
        }

        if touched {
            candidate.update_score();
        }
        scores[0] = candidate.score();
        candidate
    }

    fn apply_state_modifications(&self, state: &mut RhymeState, modifications: RhymeState) {
        *state = modifications;
    }
}
