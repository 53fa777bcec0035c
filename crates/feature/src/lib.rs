//! # Docent feature-function protocol (`feature`)
//!
//! Every scorer in the document-level decoder implements [`FeatureFunction`].
//! The search driver owns one committed state per feature function per
//! document and repeatedly:
//!
//! 1. proposes a [`SearchStep`] (a few sentence-level [`Modification`]s),
//! 2. asks each feature function to *estimate* the step's scores without
//!    mutating the committed state,
//! 3. drops the candidate or *commits* it, moving the candidate into the
//!    committed slot.
//!
//! [`StateSlot`] and [`Candidate`] wrap that loop with ownership rules: estimate
//! takes `&self`, commit takes `&mut self` and consumes the candidate, and a
//! candidate estimated against an older generation is refused.
//!
//! ## Example
//!
//! ```
//! use feature::{Document, FeatureFunction, Modification, SearchStep, StateSlot};
//!
//! struct SentenceCount;
//!
//! impl FeatureFunction for SentenceCount {
//!     type State = usize;
//!     type Modifications = usize;
//!
//!     fn name(&self) -> &'static str { "sentence-count" }
//!
//!     fn init_document(&self, doc: &Document, scores: &mut [f64]) -> usize {
//!         let n = doc.sentences().iter().filter(|s| !s.is_empty()).count();
//!         scores[0] = n as f64;
//!         n
//!     }
//!
//!     fn compute_sentence_scores(&self, _: &Document, _: usize, scores: &mut [f64]) {
//!         scores[0] = 0.0;
//!     }
//!
//!     fn estimate_score_update(
//!         &self, doc: &Document, step: &SearchStep, state: &usize,
//!         _prev: &[f64], scores: &mut [f64],
//!     ) -> usize {
//!         let mut n = *state;
//!         for m in step.modifications() {
//!             let before = doc.final_word(m.sentence).is_some();
//!             let after = m.proposed_final_word().is_some();
//!             n = n + usize::from(after) - usize::from(before);
//!         }
//!         scores[0] = n as f64;
//!         n
//!     }
//!
//!     fn apply_state_modifications(&self, state: &mut usize, n: usize) {
//!         *state = n;
//!     }
//! }
//!
//! let doc = Document::from_lines("doc-1", ["a b", "c"]);
//! let mut slot = StateSlot::init(&SentenceCount, &doc);
//! let step = SearchStep::single(Modification::remove(1));
//! let candidate = slot.estimate(&SentenceCount, &doc, &step).unwrap();
//! assert_eq!(candidate.scores(), &[1.0]);
//! slot.commit(&SentenceCount, candidate).unwrap();
//! assert_eq!(*slot.state(), 1);
//! ```

pub mod document;
mod error;
pub mod protocol;
mod slot;
pub mod step;

pub use crate::document::{Document, Sentence};
pub use crate::error::ProtocolError;
pub use crate::protocol::FeatureFunction;
pub use crate::slot::{Candidate, StateSlot};
pub use crate::step::{Modification, Proposal, SearchStep};
