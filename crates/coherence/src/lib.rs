//! # Docent discourse coherence (`coherence`)
//!
//! [`FinalWordRhymeModel`] scores a document by how its sentence-final words
//! rhyme. Each rhyme key (see the `rhyme` crate) owns a membership bitset over
//! sentence positions. The key's entropy measures how varied the distances
//! between consecutive rhyming sentences are, scaled by how often the rhyming
//! word changes:
//!
//! ```text
//! H(key)    = -Σ p(gap) · log2 p(gap)           gaps <= max_rhyme_distance
//! H(key)   *= (word_changes + 1) / (pairs + 1)
//! aggregate = Σ H(key) · covered_sentences / doc_size
//! score     = -1 / aggregate
//! ```
//!
//! An aggregate of zero yields a finite degenerate score instead of `-∞`.
//!
//! ```
//! use coherence::FinalWordRhymeModel;
//! use feature::{Document, Modification, SearchStep, Sentence, StateSlot};
//!
//! let model = FinalWordRhymeModel::default();
//! let doc = Document::from_lines("poem", ["rain", "pain", "sun", "main", "sky"]);
//! let mut slot = StateSlot::init(&model, &doc);
//!
//! let step = SearchStep::single(Modification::replace(4, Sentence::from_text("gain")));
//! let candidate = slot.estimate(&model, &doc, &step).unwrap();
//! assert!(candidate.scores()[0] > slot.scores()[0]);
//! slot.commit(&model, candidate).unwrap();
//! ```

mod config;
mod error;
mod model;
mod state;

pub use crate::config::{
    CoverageFold, KeyReconciliation, RhymeModelConfig, ScoringPolicy, DEFAULT_DEGENERATE_SCORE,
    DEFAULT_MAX_RHYME_DISTANCE,
};
pub use crate::error::CoherenceError;
pub use crate::model::FinalWordRhymeModel;
pub use crate::state::RhymeState;
