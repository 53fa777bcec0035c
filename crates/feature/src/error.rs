use thiserror::Error;

/// Caller contract violations detected by the estimate/commit protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("modification targets sentence {sentence} but the document has {len} sentences")]
    SentenceOutOfRange { sentence: usize, len: usize },

    #[error("search step modifies sentence {sentence} more than once")]
    DuplicateModification { sentence: usize },

    #[error("stale candidate: estimated against generation {found}, committed generation is {expected}")]
    StaleCandidate { expected: u64, found: u64 },

    #[error("candidate was estimated against a different state slot")]
    ForeignCandidate,
}
