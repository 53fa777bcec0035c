//! Workspace umbrella crate for the Docent scoring core.
//!
//! Docent is a document-level local-search decoder: the search repeatedly
//! proposes small edits to a document's translation and keeps the ones that
//! improve its score. This crate wires the stage crates together:
//!
//! - [`feature`]: the speculative estimate / commit protocol every scorer
//!   implements, plus document and search-step types;
//! - [`rhyme`]: final-syllable rhyme keys for words;
//! - [`coherence`]: the final-word rhyme feature function;
//! - [`ngram`]: an n-gram language model feature function over a pluggable
//!   backend.
//!
//! [`DocumentScorer`] drives the configured feature functions over one
//! document, [`DocentConfig`] loads them from YAML, and
//! [`set_scoring_metrics`] installs an observer for latency and outcomes.
//!
//! ```
//! use docent::{Document, DocumentScorer, FinalWordRhymeModel, Modification, SearchStep, Sentence};
//!
//! let scorer = DocumentScorer::new(FinalWordRhymeModel::default());
//! let mut doc = scorer.init(Document::from_lines("poem", ["rain", "pain", "sun", "main", "sky"]));
//!
//! let step = SearchStep::single(Modification::replace(4, Sentence::from_text("gain")));
//! let candidate = scorer.estimate(&doc, step).unwrap();
//! assert!(candidate.scores()[0] > doc.scores()[0]);
//!
//! scorer.commit(&mut doc, candidate).unwrap();
//! assert_eq!(doc.document().final_word(4), Some("gain"));
//! ```

pub mod config;
mod metrics;
mod scorer;

pub use coherence::{
    CoherenceError, CoverageFold, FinalWordRhymeModel, KeyReconciliation, RhymeModelConfig,
    RhymeState, ScoringPolicy, DEFAULT_DEGENERATE_SCORE, DEFAULT_MAX_RHYME_DISTANCE,
};
pub use feature::{
    Candidate, Document, FeatureFunction, Modification, Proposal, ProtocolError, SearchStep,
    Sentence, StateSlot,
};
pub use ngram::{
    LanguageModel, NgramModel, NgramModifications, NgramState, SentenceState, StubLanguageModel,
    WordIndex,
};
pub use rhyme::{
    RhymeClassifier, RhymeConfig, RhymeDictionary, RhymeError, SyllableRules,
    DEFAULT_SYLLABLE_RULES,
};

pub use crate::config::{ConfigLoadError, DocentConfig};
pub use crate::metrics::{set_scoring_metrics, ScoringMetrics};
pub use crate::scorer::{DocumentScorer, ScoredDocument, ScorerError, StepCandidate};
