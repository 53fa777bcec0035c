use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a rhyme classifier.
///
/// All of them are configuration errors surfaced at construction time, before
/// any document is scored.
#[derive(Debug, Error)]
pub enum RhymeError {
    #[error("failed to read rhyme dictionary {}: {source}", path.display())]
    DictionaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid syllable rule {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("syllable rule {pattern:?} has no capture group")]
    RuleWithoutCapture { pattern: String },
}
