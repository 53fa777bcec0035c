//! # Docent rhyme classifier (`rhyme`)
//!
//! Maps words to *rhyme keys*: normalized final-syllable strings that group
//! words which rhyme. Keys come from two sources:
//!
//! - ordered regular-expression rules ([`SyllableRules`]) that cut the final
//!   syllable off a word, first matching rule wins;
//! - an optional two-column `word key` dictionary ([`RhymeDictionary`]) for
//!   alternate pronunciations. Dictionary entries are augmented with the rule
//!   key, never replaced by it.
//!
//! A word whose key would be the word itself has no keys at all.
//!
//! ```
//! use rhyme::{RhymeClassifier, RhymeConfig};
//!
//! let classifier = RhymeClassifier::from_config(&RhymeConfig::default()).unwrap();
//! assert_eq!(classifier.rhyme_keys("rain"), vec!["ain"]);
//! assert_eq!(classifier.rhyme_keys("pain"), vec!["ain"]);
//! assert!(classifier.rhyme_keys("sky").is_empty());
//! ```

mod classifier;
mod config;
mod dictionary;
mod error;
mod rules;

pub use crate::classifier::RhymeClassifier;
pub use crate::config::{RhymeConfig, DEFAULT_SYLLABLE_RULES};
pub use crate::dictionary::RhymeDictionary;
pub use crate::error::RhymeError;
pub use crate::rules::SyllableRules;
