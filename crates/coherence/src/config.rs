//! Configuration for the final-word rhyme model.
//!
//! The rhyme classifier settings ([`RhymeConfig`]) are flattened into the same
//! YAML mapping, so a `rhyme:` section reads as one flat block.

use rhyme::RhymeConfig;
use serde::{Deserialize, Serialize};

use crate::error::CoherenceError;

/// Score reported when the aggregate is zero or not finite.
pub const DEFAULT_DEGENERATE_SCORE: f64 = -1.0e9;

/// Largest sentence distance that still counts as a rhyme pair.
pub const DEFAULT_MAX_RHYME_DISTANCE: usize = 4;

/// How per-key membership bitsets are folded into document coverage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoverageFold {
    /// Bitwise XOR: a sentence counts when an odd number of keys cover it.
    #[default]
    Toggle,
    /// Bitwise OR: a sentence counts when any key covers it.
    Union,
}

/// Which rhyme keys a word change touches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyReconciliation {
    /// Clear every old key, set every new key.
    #[default]
    AllKeys,
    /// Only keys present in both the old and the new key set are updated.
    SharedKeys,
}

/// Immutable scoring knobs carried by every [`RhymeState`](crate::RhymeState).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub coverage: CoverageFold,
    pub reconciliation: KeyReconciliation,
    pub degenerate_score: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            coverage: CoverageFold::default(),
            reconciliation: KeyReconciliation::default(),
            degenerate_score: DEFAULT_DEGENERATE_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RhymeModelConfig {
    /// Sentence pairs further apart than this are not rhyme observations.
    pub max_rhyme_distance: usize,
    #[serde(flatten)]
    pub rhyme: RhymeConfig,
    pub coverage: CoverageFold,
    pub reconciliation: KeyReconciliation,
    /// Finite, negative score used when the aggregate degenerates.
    pub degenerate_score: f64,
}

impl RhymeModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rhyme_distance(mut self, distance: usize) -> Self {
        self.max_rhyme_distance = distance;
        self
    }

    pub fn with_rhyme(mut self, rhyme: RhymeConfig) -> Self {
        self.rhyme = rhyme;
        self
    }

    pub fn with_coverage(mut self, coverage: CoverageFold) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_reconciliation(mut self, reconciliation: KeyReconciliation) -> Self {
        self.reconciliation = reconciliation;
        self
    }

    pub fn with_degenerate_score(mut self, score: f64) -> Self {
        self.degenerate_score = score;
        self
    }

    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            coverage: self.coverage,
            reconciliation: self.reconciliation,
            degenerate_score: self.degenerate_score,
        }
    }

    pub fn validate(&self) -> Result<(), CoherenceError> {
        if self.max_rhyme_distance < 1 {
            return Err(CoherenceError::InvalidConfig(
                "max_rhyme_distance must be >= 1".into(),
            ));
        }
        if !self.degenerate_score.is_finite() {
            return Err(CoherenceError::InvalidConfig(format!(
                "degenerate_score must be finite (got {})",
                self.degenerate_score
            )));
        }
        if self.degenerate_score >= 0.0 {
            return Err(CoherenceError::InvalidConfig(format!(
                "degenerate_score must be negative (got {})",
                self.degenerate_score
            )));
        }
        Ok(())
    }
}

impl Default for RhymeModelConfig {
    fn default() -> Self {
        Self {
            max_rhyme_distance: DEFAULT_MAX_RHYME_DISTANCE,
            rhyme: RhymeConfig::default(),
            coverage: CoverageFold::default(),
            reconciliation: KeyReconciliation::default(),
            degenerate_score: DEFAULT_DEGENERATE_SCORE,
        }
    }
}
