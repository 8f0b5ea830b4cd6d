use crate::errors::{EtiquetaError, Result};

/// Sentence with per-word tag annotations.
///
/// A sentence is an ordered sequence of `(word, tag)` pairs. The tag is
/// optional: raw input and unresolved tagger output carry `None`.
/// Multi-word expressions are single words whose constituents are joined by
/// `'_'` (e.g. `a_la_vez`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSentence {
    pairs: Vec<(String, Option<String>)>,
}

impl TaggedSentence {
    /// Creates a new [`TaggedSentence`] from a slash-annotated string.
    ///
    /// Each whitespace-separated item is a `word/TAG` pair; the tag is split
    /// off at the last slash so words may contain slashes themselves. An item
    /// without a slash becomes an untagged word.
    ///
    /// # Arguments
    ///
    /// * `tagged_text` - A whitespace-separated sequence of `word/TAG` pairs.
    ///
    /// # Errors
    ///
    /// If the given `tagged_text` is empty or contains an empty word, an
    /// error variant will be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use etiqueta::TaggedSentence;
    ///
    /// let s = TaggedSentence::from_tagged("La/da0fs0 casa/ncfs000").unwrap();
    /// assert_eq!(vec!["La", "casa"], s.words());
    ///
    /// let s = TaggedSentence::from_tagged("");
    /// assert!(s.is_err());
    /// ```
    pub fn from_tagged(tagged_text: &str) -> Result<Self> {
        if tagged_text.trim().is_empty() {
            return Err(EtiquetaError::invalid_argument(
                "tagged_text",
                "must not be empty",
            ));
        }
        let mut pairs = Vec::new();
        for item in tagged_text.split_whitespace() {
            let (word, tag) = match item.rsplit_once('/') {
                Some((word, tag)) if !tag.is_empty() => (word, Some(tag.to_string())),
                Some((word, _)) => (word, None),
                None => (item, None),
            };
            if word.is_empty() {
                return Err(EtiquetaError::invalid_argument(
                    "tagged_text",
                    format!("item {:?} has an empty word", item),
                ));
            }
            pairs.push((word.to_string(), tag));
        }
        Ok(Self { pairs })
    }

    /// Creates a new [`TaggedSentence`] from raw tokens, all untagged.
    pub fn from_raw_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pairs: tokens.into_iter().map(|t| (t.into(), None)).collect(),
        }
    }

    /// Creates a new [`TaggedSentence`] from `(word, tag)` pairs.
    pub fn from_pairs(pairs: Vec<(String, Option<String>)>) -> Self {
        Self { pairs }
    }

    /// Returns the words in order, tags stripped.
    pub fn words(&self) -> Vec<String> {
        self.pairs.iter().map(|(w, _)| w.clone()).collect()
    }

    /// Returns the annotated pairs.
    pub fn pairs(&self) -> &[(String, Option<String>)] {
        &self.pairs
    }

    /// Consumes the sentence, returning its pairs.
    pub fn into_pairs(self) -> Vec<(String, Option<String>)> {
        self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, Option<String>)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Formats the sentence back into slash-annotated text. Untagged words
    /// are emitted bare, so the output re-parses to an equal sentence.
    pub fn to_tagged_string(&self) -> String {
        let mut items = Vec::with_capacity(self.pairs.len());
        for (word, tag) in &self.pairs {
            match tag {
                Some(tag) => items.push(format!("{}/{}", word, tag)),
                None => items.push(word.clone()),
            }
        }
        items.join(" ")
    }
}

impl<'a> IntoIterator for &'a TaggedSentence {
    type Item = &'a (String, Option<String>);
    type IntoIter = std::slice::Iter<'a, (String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
