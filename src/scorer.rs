//! Drives the configured feature functions over one document.
//!
//! The set of feature functions is closed: the final-word rhyme model is
//! always present and an n-gram model can be added. Scores are laid out in
//! that order, one slot each.

use std::fmt;
use std::time::Instant;

use coherence::{FinalWordRhymeModel, RhymeState};
use feature::{Candidate, Document, FeatureFunction, ProtocolError, SearchStep, StateSlot};
use ngram::{LanguageModel, NgramModel, NgramModifications, NgramState, StubLanguageModel};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{ConfigLoadError, DocentConfig};
use crate::metrics::MetricsSpan;

/// Errors returned while estimating or committing search steps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScorerError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Feature functions applied to every document.
pub struct DocumentScorer<M: LanguageModel = StubLanguageModel> {
    rhyme: FinalWordRhymeModel,
    ngram: Option<NgramModel<M>>,
    parallel_estimation: bool,
}

/// A document together with the committed state of every feature function.
pub struct ScoredDocument<M: LanguageModel = StubLanguageModel> {
    document: Document,
    rhyme: StateSlot<FinalWordRhymeModel>,
    ngram: Option<StateSlot<NgramModel<M>>>,
}

/// Estimated scores for one search step, ready to be committed.
pub struct StepCandidate<M: LanguageModel = StubLanguageModel> {
    step: SearchStep,
    rhyme: Candidate<RhymeState>,
    ngram: Option<Candidate<NgramModifications<M::Context>>>,
}

impl DocumentScorer<StubLanguageModel> {
    /// Scorer with the rhyme model only.
    pub fn new(rhyme: FinalWordRhymeModel) -> Self {
        Self {
            rhyme,
            ngram: None,
            parallel_estimation: false,
        }
    }

    /// Build the rhyme model described by `cfg`.
    pub fn from_config(cfg: &DocentConfig) -> Result<Self, ConfigLoadError> {
        cfg.validate()?;
        let rhyme = FinalWordRhymeModel::from_config(&cfg.rhyme)?;
        Ok(Self::new(rhyme).with_parallel_estimation(cfg.parallel_estimation))
    }
}

impl<M: LanguageModel> DocumentScorer<M> {
    /// Add an n-gram model after the rhyme model.
    pub fn with_ngram<N: LanguageModel>(self, ngram: NgramModel<N>) -> DocumentScorer<N> {
        DocumentScorer {
            rhyme: self.rhyme,
            ngram: Some(ngram),
            parallel_estimation: self.parallel_estimation,
        }
    }

    pub fn with_parallel_estimation(mut self, parallel: bool) -> Self {
        self.parallel_estimation = parallel;
        self
    }

    pub fn rhyme_model(&self) -> &FinalWordRhymeModel {
        &self.rhyme
    }

    pub fn ngram_model(&self) -> Option<&NgramModel<M>> {
        self.ngram.as_ref()
    }

    /// Total number of score slots.
    pub fn score_count(&self) -> usize {
        self.rhyme.score_count() + self.ngram.as_ref().map_or(0, |m| m.score_count())
    }

    /// Feature names in score order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.rhyme.name()];
        names.extend(self.ngram.as_ref().map(|m| m.name()));
        names
    }

    /// Initialize every feature function for `document`.
    pub fn init(&self, document: Document) -> ScoredDocument<M> {
        let span = MetricsSpan::start();
        let rhyme = StateSlot::init(&self.rhyme, &document);
        let ngram = self
            .ngram
            .as_ref()
            .map(|model| StateSlot::init(model, &document));
        let scored = ScoredDocument {
            document,
            rhyme,
            ngram,
        };

        debug!(
            doc_id = scored.document.id(),
            sentences = scored.document.len(),
            scores = ?scored.scores(),
            "document_initialized"
        );
        if let Some(span) = span {
            span.record_init(scored.document.len());
        }
        scored
    }

    /// Score `step` against the committed state of `doc` without changing it.
    pub fn estimate(
        &self,
        doc: &ScoredDocument<M>,
        step: SearchStep,
    ) -> Result<StepCandidate<M>, ScorerError> {
        let span = MetricsSpan::start();
        let modifications = step.len();
        let result = self.estimate_inner(doc, step);

        if let Some(span) = span {
            span.record_estimate(modifications, result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        result
    }

    fn estimate_inner(
        &self,
        doc: &ScoredDocument<M>,
        step: SearchStep,
    ) -> Result<StepCandidate<M>, ScorerError> {
        let rhyme = doc.rhyme.estimate(&self.rhyme, &doc.document, &step)?;
        let ngram = match (&self.ngram, &doc.ngram) {
            (Some(model), Some(slot)) => Some(slot.estimate(model, &doc.document, &step)?),
            (None, None) => None,
            _ => return Err(ProtocolError::ForeignCandidate.into()),
        };
        Ok(StepCandidate { step, rhyme, ngram })
    }

    /// Estimate a batch of alternative steps against the same committed
    /// state. Results keep the order of `steps`.
    pub fn estimate_all(
        &self,
        doc: &ScoredDocument<M>,
        steps: Vec<SearchStep>,
    ) -> Vec<Result<StepCandidate<M>, ScorerError>> {
        let start = Instant::now();
        let count = steps.len();
        let results: Vec<_> = if self.parallel_estimation {
            steps
                .into_par_iter()
                .map(|step| self.estimate(doc, step))
                .collect()
        } else {
            steps
                .into_iter()
                .map(|step| self.estimate(doc, step))
                .collect()
        };
        trace!(
            doc_id = doc.document.id(),
            steps = count,
            parallel = self.parallel_estimation,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "steps_estimated"
        );
        results
    }

    /// Commit `candidate` into every feature function and apply its step to
    /// the document. Either everything is committed or nothing is.
    pub fn commit(
        &self,
        doc: &mut ScoredDocument<M>,
        candidate: StepCandidate<M>,
    ) -> Result<(), ScorerError> {
        let span = MetricsSpan::start();
        let result = self.commit_inner(doc, candidate);
        if let Some(span) = span {
            span.record_commit(result.clone());
        }
        result
    }

    fn commit_inner(
        &self,
        doc: &mut ScoredDocument<M>,
        candidate: StepCandidate<M>,
    ) -> Result<(), ScorerError> {
        doc.rhyme.check(&candidate.rhyme)?;
        match (&self.ngram, &doc.ngram, &candidate.ngram) {
            (Some(_), Some(slot), Some(ngram)) => slot.check(ngram)?,
            (None, None, None) => {}
            _ => return Err(ProtocolError::ForeignCandidate.into()),
        }

        let StepCandidate { step, rhyme, ngram } = candidate;
        doc.rhyme.commit(&self.rhyme, rhyme)?;
        if let (Some(model), Some(slot), Some(ngram)) = (&self.ngram, doc.ngram.as_mut(), ngram) {
            slot.commit(model, ngram)?;
        }
        doc.document.apply(step);

        debug!(
            doc_id = doc.document.id(),
            generation = doc.generation(),
            scores = ?doc.scores(),
            "step_committed"
        );
        Ok(())
    }
}

impl<M: LanguageModel> fmt::Debug for DocumentScorer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentScorer")
            .field("features", &self.feature_names())
            .field("parallel_estimation", &self.parallel_estimation)
            .finish()
    }
}

impl<M: LanguageModel> ScoredDocument<M> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Committed scores of every feature function, rhyme first.
    pub fn scores(&self) -> Vec<f64> {
        let mut scores = self.rhyme.scores().to_vec();
        if let Some(slot) = &self.ngram {
            scores.extend_from_slice(slot.scores());
        }
        scores
    }

    /// Number of steps committed so far.
    pub fn generation(&self) -> u64 {
        self.rhyme.generation()
    }

    pub fn rhyme_state(&self) -> &RhymeState {
        self.rhyme.state()
    }

    pub fn ngram_state(&self) -> Option<&NgramState<M::Context>> {
        self.ngram.as_ref().map(|slot| slot.state())
    }
}

impl<M: LanguageModel> StepCandidate<M> {
    pub fn step(&self) -> &SearchStep {
        &self.step
    }

    /// Estimated scores, in the same layout as [`ScoredDocument::scores`].
    pub fn scores(&self) -> Vec<f64> {
        let mut scores = self.rhyme.scores().to_vec();
        if let Some(ngram) = &self.ngram {
            scores.extend_from_slice(ngram.scores());
        }
        scores
    }

    /// Committed generation the candidate was estimated against.
    pub fn generation(&self) -> u64 {
        self.rhyme.generation()
    }

    pub fn rhyme_state(&self) -> &RhymeState {
        self.rhyme.modifications()
    }
}
