//! Word → rhyme-key dictionary.
//!
//! Format: one `word key` pair per line, separated by whitespace. A word may
//! appear on several lines (alternate pronunciations); its keys accumulate in
//! file order. Lines that do not split into exactly two tokens are skipped,
//! as are blank lines and `#` comments.

use std::fs;
use std::path::Path;

use fxhash::FxHashMap;
use tracing::debug;

use crate::error::RhymeError;

#[derive(Debug, Clone, Default)]
pub struct RhymeDictionary {
    entries: FxHashMap<String, Vec<String>>,
    skipped_lines: usize,
}

impl RhymeDictionary {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RhymeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RhymeError::DictionaryRead {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::parse(&text);
        debug!(
            path = %path.display(),
            entries = dictionary.len(),
            skipped_lines = dictionary.skipped_lines,
            "rhyme_dictionary_loaded"
        );
        Ok(dictionary)
    }

    /// Parse dictionary text. Never fails; malformed lines are counted.
    pub fn parse(text: &str) -> Self {
        let mut dictionary = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(word), Some(key), None) => dictionary.insert(word, key),
                _ => dictionary.skipped_lines += 1,
            }
        }
        dictionary
    }

    /// Add `key` to `word`'s entry unless it is already listed.
    pub fn insert(&mut self, word: &str, key: &str) {
        let keys = self.entries.entry(word.to_string()).or_default();
        if !keys.iter().any(|existing| existing == key) {
            keys.push(key.to_string());
        }
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(word, keys)| (word.as_str(), keys.as_slice()))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines ignored because they were not a `word key` pair.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub(crate) fn words(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
