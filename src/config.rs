//! YAML configuration for the Docent scoring core.
//!
//! One file configures every feature function the [`DocumentScorer`] drives.
//! Sections may be omitted; missing fields take their defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "lyrics-en"
//! parallel_estimation: true
//!
//! rhyme:
//!   max_rhyme_distance: 4
//!   rhymes_file: "data/rhymes.en.txt"
//!   syllable_rules:
//!     - ".*[^aeiou]([aeiou].*?e[nr])"
//!     - ".*[^aeiou]([aeiou]..*?)"
//!     - "([aeiou].*)"
//!   coverage: toggle
//!   reconciliation: all_keys
//!   degenerate_score: -1.0e9
//! ```
//!
//! [`DocumentScorer`]: crate::DocumentScorer

use std::fs;
use std::path::Path;

use coherence::{CoherenceError, RhymeModelConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("rhyme model: {0}")]
    Coherence(#[from] CoherenceError),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DocentConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Estimate batches of search steps on the rayon pool.
    #[serde(default)]
    pub parallel_estimation: bool,

    /// Final-word rhyme model
    #[serde(default)]
    pub rhyme: RhymeModelConfig,
}

impl DocentConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DocentConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_parallel_estimation(mut self, parallel: bool) -> Self {
        self.parallel_estimation = parallel;
        self
    }

    pub fn with_rhyme(mut self, rhyme: RhymeModelConfig) -> Self {
        self.rhyme = rhyme;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if let Some(rules) = &self.rhyme.rhyme.syllable_rules {
            if let Some(index) = rules.iter().position(|rule| rule.trim().is_empty()) {
                return Err(ConfigLoadError::Validation(format!(
                    "rhyme.syllable_rules[{index}] is empty"
                )));
            }
        }
        self.rhyme.validate()?;
        Ok(())
    }
}

impl Default for DocentConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            parallel_estimation: false,
            rhyme: RhymeModelConfig::default(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
