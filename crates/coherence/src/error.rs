use rhyme::RhymeError;
use thiserror::Error;

/// Construction-time errors of the coherence feature functions.
#[derive(Debug, Error)]
pub enum CoherenceError {
    #[error("invalid rhyme model config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Rhyme(#[from] RhymeError),
}
