//! # Docent n-gram scoring (`ngram`)
//!
//! [`NgramModel`] turns any [`LanguageModel`] backend into a feature function.
//! Sentences are scored independently; the document score is the sum of
//! sentence log-probabilities. Estimates resume each edited sentence from the
//! backend context stored at the end of the unchanged prefix.
//!
//! [`StubLanguageModel`] is a small deterministic backoff table for tests and
//! demos; production backends wrap a real model behind the same trait.
//!
//! ```
//! use feature::{Document, Modification, SearchStep, Sentence, StateSlot};
//! use ngram::{NgramModel, StubLanguageModel};
//!
//! let lm = StubLanguageModel::new(2)
//!     .with_ngram(&["<s>", "hello"], -0.5)
//!     .with_ngram(&["hello", "</s>"], -0.25);
//! let model = NgramModel::new(lm);
//! let doc = Document::from_lines("greeting", ["hello"]);
//! let slot = StateSlot::init(&model, &doc);
//! assert_eq!(slot.scores(), &[-0.75]);
//!
//! let step = SearchStep::single(Modification::remove(0));
//! let candidate = slot.estimate(&model, &doc, &step).unwrap();
//! assert_eq!(candidate.scores(), &[0.0]);
//! ```

mod lm;
mod model;
mod stub;

pub use crate::lm::{LanguageModel, WordIndex};
pub use crate::model::{NgramModel, NgramModifications, NgramState, SentenceState};
pub use crate::stub::{StubLanguageModel, BOS, EOS, UNK};
