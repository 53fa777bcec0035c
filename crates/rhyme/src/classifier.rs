//! Word → rhyme keys.

use tracing::{debug, trace};

use crate::config::RhymeConfig;
use crate::dictionary::RhymeDictionary;
use crate::error::RhymeError;
use crate::rules::SyllableRules;

/// Maps a word to the canonical rhyme keys it participates in.
///
/// Dictionary entries are augmented with the heuristic key, so dictionary and
/// heuristic agree for listed words. A key equal to the word itself is never
/// returned: such a word has no usable rhyme.
#[derive(Debug, Clone)]
pub struct RhymeClassifier {
    rules: SyllableRules,
    dictionary: Option<RhymeDictionary>,
}

impl RhymeClassifier {
    pub fn new(rules: SyllableRules, dictionary: Option<RhymeDictionary>) -> Self {
        let dictionary = dictionary.map(|mut dictionary| {
            for word in dictionary.words() {
                let key = rules.last_syllable(&word).to_string();
                dictionary.insert(&word, &key);
            }
            dictionary
        });
        Self { rules, dictionary }
    }

    /// Heuristic-only classifier with the built-in English rules.
    pub fn english() -> Self {
        Self::new(SyllableRules::english(), None)
    }

    /// Compile the configured rules and load the dictionary, if any.
    pub fn from_config(cfg: &RhymeConfig) -> Result<Self, RhymeError> {
        let rules = SyllableRules::compile(cfg.effective_rules())?;
        let dictionary = cfg
            .dictionary_path()
            .map(RhymeDictionary::from_path)
            .transpose()?;

        let classifier = Self::new(rules, dictionary);
        debug!(
            rules = classifier.rules.len(),
            dictionary_entries = classifier.dictionary.as_ref().map_or(0, RhymeDictionary::len),
            "rhyme_classifier_ready"
        );
        Ok(classifier)
    }

    /// Rhyme keys for `word`, without duplicates and never containing `word`.
    pub fn rhyme_keys<'a>(&'a self, word: &'a str) -> Vec<&'a str> {
        if word.is_empty() {
            return Vec::new();
        }
        if let Some(keys) = self.dictionary.as_ref().and_then(|d| d.get(word)) {
            return keys
                .iter()
                .map(String::as_str)
                .filter(|key| *key != word)
                .collect();
        }
        let key = self.rules.last_syllable(word);
        if key == word {
            Vec::new()
        } else {
            vec![key]
        }
    }

    /// Heuristic final syllable, bypassing the dictionary.
    pub fn last_syllable<'w>(&self, word: &'w str) -> &'w str {
        self.rules.last_syllable(word)
    }

    pub fn rules(&self) -> &SyllableRules {
        &self.rules
    }

    pub fn dictionary(&self) -> Option<&RhymeDictionary> {
        self.dictionary.as_ref()
    }

    /// Emit every dictionary entry at `trace` level.
    pub fn log_pronunciation_table(&self) {
        let Some(dictionary) = &self.dictionary else {
            return;
        };
        let mut entries: Vec<_> = dictionary.iter().collect();
        entries.sort_unstable_by_key(|(word, _)| *word);
        for (word, keys) in entries {
            trace!(word, keys = ?keys, "pronunciation_entry");
        }
    }
}

impl Default for RhymeClassifier {
    fn default() -> Self {
        Self::english()
    }
}
