//! Configuration for the rhyme classifier.
//!
//! The classifier is built once per feature-function instance and then shared
//! read-only. Nothing here performs I/O; the dictionary file named by
//! [`RhymeConfig::rhymes_file`] is read by
//! [`RhymeClassifier::from_config`](crate::RhymeClassifier::from_config).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Built-in final-syllable rules, tried in order.
///
/// Tuned for English orthography: the first rule keeps `-en`/`-er` endings
/// together with the preceding vowel, the second takes the last vowel after a
/// consonant plus at least one more character, the third handles words that
/// start with a vowel.
pub const DEFAULT_SYLLABLE_RULES: [&str; 3] = [
    ".*[^aeiou]([aeiou].*?e[nr])",
    ".*[^aeiou]([aeiou]..*?)",
    "([aeiou].*)",
];

/// Rhyme classifier configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RhymeConfig {
    /// Two-column `word key` file. `None` or an empty path disables the
    /// dictionary and every word goes through the syllable rules.
    #[serde(default)]
    pub rhymes_file: Option<PathBuf>,
    /// Ordered final-syllable rules. Each rule must match the whole word and
    /// contain a capture group. `None` or an empty list selects
    /// [`DEFAULT_SYLLABLE_RULES`].
    #[serde(default)]
    pub syllable_rules: Option<Vec<String>>,
}

impl RhymeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rhymes_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rhymes_file = Some(path.into());
        self
    }

    pub fn with_syllable_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.syllable_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Dictionary path, if lookup is enabled.
    pub fn dictionary_path(&self) -> Option<&Path> {
        self.rhymes_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Rules to compile, falling back to the defaults.
    pub fn effective_rules(&self) -> Vec<&str> {
        match self.syllable_rules.as_deref() {
            Some(rules) if !rules.is_empty() => rules.iter().map(String::as_str).collect(),
            _ => DEFAULT_SYLLABLE_RULES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_dictionary() {
        let cfg = RhymeConfig::default();
        assert!(cfg.dictionary_path().is_none());
        assert_eq!(cfg.effective_rules(), DEFAULT_SYLLABLE_RULES.to_vec());
    }

    #[test]
    fn empty_path_disables_dictionary() {
        let cfg = RhymeConfig::new().with_rhymes_file("");
        assert!(cfg.dictionary_path().is_none());
    }

    #[test]
    fn empty_rule_list_falls_back() {
        let cfg = RhymeConfig::new().with_syllable_rules(Vec::<String>::new());
        assert_eq!(cfg.effective_rules().len(), DEFAULT_SYLLABLE_RULES.len());

        let cfg = RhymeConfig::new().with_syllable_rules(["(.)"]);
        assert_eq!(cfg.effective_rules(), vec!["(.)"]);
    }
}
