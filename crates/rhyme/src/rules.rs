//! Ordered final-syllable extraction rules.

use regex::Regex;

use crate::config::DEFAULT_SYLLABLE_RULES;
use crate::error::RhymeError;

#[derive(Debug, Clone)]
struct SyllableRule {
    pattern: String,
    regex: Regex,
}

/// Compiled, immutable rule list. First matching rule wins.
#[derive(Debug, Clone)]
pub struct SyllableRules {
    rules: Vec<SyllableRule>,
}

impl SyllableRules {
    /// Compile `patterns` in order.
    ///
    /// Each pattern is anchored so it has to match the whole word, and must
    /// contain at least one capture group.
    pub fn compile<I, S>(patterns: I) -> Result<Self, RhymeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                RhymeError::InvalidRule {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            // Group 0 is the whole match.
            if regex.captures_len() < 2 {
                return Err(RhymeError::RuleWithoutCapture {
                    pattern: pattern.to_string(),
                });
            }
            rules.push(SyllableRule {
                pattern: pattern.to_string(),
                regex,
            });
        }
        Ok(Self { rules })
    }

    /// The built-in English rule set.
    pub fn english() -> Self {
        Self::compile(DEFAULT_SYLLABLE_RULES).expect("built-in syllable rules compile")
    }

    /// Final syllable of `word`, or `word` itself when no rule matches.
    ///
    /// The result runs from the start of the first capture group to the end
    /// of the word.
    pub fn last_syllable<'w>(&self, word: &'w str) -> &'w str {
        for rule in &self.rules {
            let Some(captures) = rule.regex.captures(word) else {
                continue;
            };
            if let Some(group) = captures.get(1) {
                return &word[group.start()..];
            }
        }
        word
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for SyllableRules {
    fn default() -> Self {
        Self::english()
    }
}
