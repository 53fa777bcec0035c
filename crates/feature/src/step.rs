//! Proposed edits produced by the search driver.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Sentence};
use crate::error::ProtocolError;

/// What the driver proposes for a single sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "sentence", rename_all = "snake_case")]
pub enum Proposal {
    /// New target side for the sentence.
    Replace(Sentence),
    /// The sentence no longer contributes a final word.
    Remove,
}

/// One sentence-level edit inside a [`SearchStep`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Modification {
    pub sentence: usize,
    pub proposal: Proposal,
}

impl Modification {
    pub fn replace(sentence: usize, replacement: Sentence) -> Self {
        Self {
            sentence,
            proposal: Proposal::Replace(replacement),
        }
    }

    pub fn remove(sentence: usize) -> Self {
        Self {
            sentence,
            proposal: Proposal::Remove,
        }
    }

    /// Final word the sentence would have after this edit.
    pub fn proposed_final_word(&self) -> Option<&str> {
        match &self.proposal {
            Proposal::Replace(sentence) => sentence.final_word(),
            Proposal::Remove => None,
        }
    }

    /// Proposed target tokens; empty for a removal.
    pub fn proposed_tokens(&self) -> &[String] {
        match &self.proposal {
            Proposal::Replace(sentence) => sentence.tokens(),
            Proposal::Remove => &[],
        }
    }
}

/// A batch of edits evaluated and committed together.
///
/// Every modification touches a distinct sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<Modification>", into = "Vec<Modification>")]
pub struct SearchStep {
    modifications: Vec<Modification>,
}

impl SearchStep {
    pub fn new(modifications: Vec<Modification>) -> Result<Self, ProtocolError> {
        let mut seen: Vec<usize> = modifications.iter().map(|m| m.sentence).collect();
        seen.sort_unstable();
        if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProtocolError::DuplicateModification { sentence: pair[0] });
        }
        Ok(Self { modifications })
    }

    /// Single-sentence step.
    pub fn single(modification: Modification) -> Self {
        Self {
            modifications: vec![modification],
        }
    }

    pub fn modifications(&self) -> &[Modification] {
        &self.modifications
    }

    pub fn into_modifications(self) -> Vec<Modification> {
        self.modifications
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    /// Check every modification against the document's sentence count.
    pub fn validate(&self, doc: &Document) -> Result<(), ProtocolError> {
        for modification in &self.modifications {
            if modification.sentence >= doc.len() {
                return Err(ProtocolError::SentenceOutOfRange {
                    sentence: modification.sentence,
                    len: doc.len(),
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Modification>> for SearchStep {
    type Error = ProtocolError;

    fn try_from(modifications: Vec<Modification>) -> Result<Self, Self::Error> {
        Self::new(modifications)
    }
}

impl From<SearchStep> for Vec<Modification> {
    fn from(step: SearchStep) -> Self {
        step.modifications
    }
}
