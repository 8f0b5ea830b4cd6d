use std::collections::BTreeMap;

use bincode::{Decode, Encode};
use hashbrown::{HashMap, HashSet};
use log::debug;

use crate::errors::{EtiquetaError, Result};
use crate::model::ModelData;
use crate::sentence::TaggedSentence;

/// Lookup key of one n-gram statistics entry: the window of preceding tags
/// plus the current word.
///
/// An order-k model keeps up to k-1 preceding tags. Near the start of a
/// sentence the window is shorter, never padded, so a position's context is
/// identical at training and tagging time. Preceding tags are the tags
/// assigned so far, which can be `None` for unresolved positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct NgramContext {
    pub(crate) tags: Vec<Option<String>>,
    pub(crate) word: String,
}

/// A single order-k tagger with a backoff link to the order k-1 model.
///
/// The chain of these models is the trained tagger: only the highest-order
/// model is invoked directly, and a context miss recurses into the backoff.
/// An order-1 miss resolves to `None`; tagging never fails.
pub struct NgramModel {
    order: usize,
    table: HashMap<NgramContext, String>,
    backoff: Option<Box<NgramModel>>,
}

impl NgramModel {
    /// Trains an order-`order` model from tagged sentences.
    ///
    /// Statistics are the most frequent tag per context, counted over every
    /// position carrying a tag. Positions with a `None` tag (possible in
    /// bootstrapped training data) still contribute to the context windows
    /// of their neighbors but are not counted as observations. A context
    /// whose chosen tag never improves on what `backoff` already produces is
    /// pruned. When several tags have equal support, the lexicographically
    /// smallest wins, so training is a pure function of its inputs.
    ///
    /// # Arguments
    ///
    /// * `order` - The n-gram order; must be `backoff`'s order plus one.
    /// * `sents` - Tagged training sentences.
    /// * `backoff` - The fallback model, or `None` for order 1.
    ///
    /// # Errors
    ///
    /// An error variant is returned when the training input contains no
    /// tokens at all, or when `order` does not extend `backoff` by one.
    pub fn train(
        order: usize,
        sents: &[TaggedSentence],
        backoff: Option<NgramModel>,
    ) -> Result<Self> {
        if order == 0 {
            return Err(EtiquetaError::invalid_argument(
                "order",
                "must be at least 1",
            ));
        }
        if let Some(b) = &backoff {
            if b.order != order - 1 {
                return Err(EtiquetaError::invalid_argument(
                    "backoff",
                    format!("order {} cannot back off to order {}", order, b.order),
                ));
            }
        }

        let mut counts: HashMap<NgramContext, BTreeMap<String, usize>> = HashMap::new();
        let mut useful: HashSet<NgramContext> = HashSet::new();
        let mut n_positions = 0usize;

        for sent in sents {
            let words = sent.words();
            let gold: Vec<Option<String>> = sent.iter().map(|(_, t)| t.clone()).collect();
            for (index, (_, tag)) in sent.iter().enumerate() {
                n_positions += 1;
                let tag = match tag {
                    Some(tag) => tag,
                    None => continue,
                };
                let context = Self::context_at(order, &words, index, &gold[..index]);
                *counts
                    .entry(context.clone())
                    .or_default()
                    .entry(tag.clone())
                    .or_insert(0) += 1;
                let backed = backoff
                    .as_ref()
                    .and_then(|b| b.tag_one(&words, index, &gold[..index]));
                if backed.as_deref() != Some(tag.as_str()) {
                    useful.insert(context);
                }
            }
        }

        if n_positions == 0 {
            return Err(EtiquetaError::insufficient_data(
                "training corpus contains no tokens",
            ));
        }

        let mut table = HashMap::with_capacity(useful.len());
        for context in useful {
            if let Some(tag_counts) = counts.get(&context) {
                let mut best: Option<(&String, usize)> = None;
                // BTreeMap iterates tags in ascending order, so on equal
                // counts the lexicographically smallest tag is kept.
                for (tag, &n) in tag_counts {
                    match best {
                        Some((_, best_n)) if n <= best_n => {}
                        _ => best = Some((tag, n)),
                    }
                }
                if let Some((tag, _)) = best {
                    table.insert(context, tag.clone());
                }
            }
        }

        debug!(
            "train model (ngram={}): {} contexts from {} tokens",
            order,
            table.len(),
            n_positions
        );

        Ok(Self {
            order,
            table,
            backoff: backoff.map(Box::new),
        })
    }

    /// Tags a token sequence, returning one `(word, tag)` pair per token in
    /// order. Unresolved tokens come back with `None`.
    pub fn tag(&self, tokens: &[String]) -> Vec<(String, Option<String>)> {
        let mut history: Vec<Option<String>> = Vec::with_capacity(tokens.len());
        let mut tagged = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let tag = self.tag_one(tokens, index, &history);
            history.push(tag.clone());
            tagged.push((token.clone(), tag));
        }
        tagged
    }

    /// Tags each sentence independently; no context crosses a sentence
    /// boundary, so the result equals calling [`Self::tag`] per sentence.
    pub fn tag_sents(&self, sents: &[Vec<String>]) -> Vec<Vec<(String, Option<String>)>> {
        sents.iter().map(|tokens| self.tag(tokens)).collect()
    }

    pub(crate) fn tag_one(
        &self,
        words: &[String],
        index: usize,
        history: &[Option<String>],
    ) -> Option<String> {
        let context = Self::context_at(self.order, words, index, history);
        if let Some(tag) = self.table.get(&context) {
            return Some(tag.clone());
        }
        self.backoff
            .as_ref()
            .and_then(|b| b.tag_one(words, index, history))
    }

    // `history` is the full tag prefix of the sentence (length `index`).
    fn context_at(
        order: usize,
        words: &[String],
        index: usize,
        history: &[Option<String>],
    ) -> NgramContext {
        let start = index.saturating_sub(order - 1);
        NgramContext {
            tags: history[start..index].to_vec(),
            word: words[index].clone(),
        }
    }

    /// The n-gram order of this model.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of contexts in this order's statistics table, excluding the
    /// backoff models.
    pub fn n_contexts(&self) -> usize {
        self.table.len()
    }

    /// The order k-1 fallback, or `None` for an order-1 model.
    pub fn backoff(&self) -> Option<&NgramModel> {
        self.backoff.as_deref()
    }

    /// Extracts this order's statistics for persistence. Entries are sorted
    /// so the encoded bytes are identical across runs.
    pub fn to_data(&self) -> ModelData {
        let mut entries: Vec<(NgramContext, String)> = self
            .table
            .iter()
            .map(|(c, t)| (c.clone(), t.clone()))
            .collect();
        entries.sort();
        ModelData {
            order: self.order as u32,
            entries,
        }
    }

    /// Rebuilds a runtime model from persisted statistics and an already
    /// resolved backoff chain.
    ///
    /// # Errors
    ///
    /// An error variant is returned when the persisted order is zero or does
    /// not extend `backoff` by one.
    pub fn from_data(data: ModelData, backoff: Option<NgramModel>) -> Result<Self> {
        let order = data.order as usize;
        if order == 0 {
            return Err(EtiquetaError::invalid_model("n-gram order 0 in model data"));
        }
        if let Some(b) = &backoff {
            if b.order != order - 1 {
                return Err(EtiquetaError::invalid_model(format!(
                    "order {} model cannot back off to order {}",
                    order, b.order
                )));
            }
        }
        let table: HashMap<NgramContext, String> = data.entries.into_iter().collect();
        Ok(Self {
            order,
            table,
            backoff: backoff.map(Box::new),
        })
    }
}
