//! Read-only document views consumed by feature functions.
//!
//! A [`Document`] is the search driver's current hypothesis: one [`Sentence`]
//! per source sentence, each holding the target tokens of its phrase
//! segmentation. Feature functions never mutate a document; the driver folds
//! accepted steps in with [`Document::apply`].

use serde::{Deserialize, Serialize};

use crate::step::{Proposal, SearchStep};

/// Target side of one sentence's current translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<String>,
}

impl Sentence {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace-tokenized line into a sentence.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Last target token, if the sentence has any.
    pub fn final_word(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Ordered sentence hypotheses for one document.
///
/// The sentence count is fixed for the lifetime of the document; a removed
/// sentence stays in place as an empty [`Sentence`] so indices remain stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    id: String,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(id: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        Self {
            id: id.into(),
            sentences,
        }
    }

    /// Build a document from whitespace-tokenized lines, one per sentence.
    pub fn from_lines<I, S>(id: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sentences = lines
            .into_iter()
            .map(|line| Sentence::from_text(line.as_ref()))
            .collect();
        Self::new(id, sentences)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    /// Final target word of sentence `index`; `None` when the index is out of
    /// range or the sentence is empty.
    pub fn final_word(&self, index: usize) -> Option<&str> {
        self.sentences.get(index).and_then(Sentence::final_word)
    }

    /// Fold an accepted step into the hypothesis.
    ///
    /// Modifications pointing past the end of the document are ignored;
    /// [`crate::StateSlot::estimate`] rejects such steps before they can be
    /// committed.
    pub fn apply(&mut self, step: SearchStep) {
        for modification in step.into_modifications() {
            let Some(slot) = self.sentences.get_mut(modification.sentence) else {
                continue;
            };
            *slot = match modification.proposal {
                Proposal::Replace(sentence) => sentence,
                Proposal::Remove => Sentence::default(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Modification;

    #[test]
    fn final_word_is_last_token() {
        let doc = Document::from_lines("doc", ["it will rain", "", "no more pain"]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.final_word(0), Some("rain"));
        assert_eq!(doc.final_word(1), None);
        assert_eq!(doc.final_word(2), Some("pain"));
        assert_eq!(doc.final_word(7), None);
    }

    #[test]
    fn apply_replaces_and_removes_in_place() {
        let mut doc = Document::from_lines("doc", ["in the rain", "feel the pain", "sun"]);
        let step = SearchStep::new(vec![
            Modification::replace(1, Sentence::from_text("down the main")),
            Modification::remove(2),
        ])
        .expect("distinct sentences");

        doc.apply(step);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.final_word(1), Some("main"));
        assert!(doc.sentence(2).is_some_and(Sentence::is_empty));
    }
}
