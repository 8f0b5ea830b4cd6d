use std::ops::{Add, AddAssign};

use log::info;

use crate::corpus::Corpus;
use crate::errors::{EtiquetaError, Result};
use crate::sentence::TaggedSentence;
use crate::universal::{UniversalCorpus, UniversalTagger};

/// Tag-match counts of one sentence, or the element-wise sum over a corpus.
///
/// `evaluated` counts positions where the tagger produced any tag;
/// `matched` counts those whose tag equals the gold tag; `total` is the
/// sentence length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentenceCounts {
    pub evaluated: usize,
    pub matched: usize,
    pub total: usize,
}

impl Add for SentenceCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            evaluated: self.evaluated + rhs.evaluated,
            matched: self.matched + rhs.matched,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for SentenceCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Corpus-level evaluation aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub counts: SentenceCounts,
    pub n_sents: usize,
}

impl Evaluation {
    /// Fraction of tokens the tagger produced any tag for.
    pub fn coverage(&self) -> Option<f64> {
        (self.counts.total > 0)
            .then(|| self.counts.evaluated as f64 / self.counts.total as f64)
    }

    /// Accuracy over the covered tokens only; `None` when nothing was
    /// covered.
    pub fn covered_accuracy(&self) -> Option<f64> {
        (self.counts.evaluated > 0)
            .then(|| self.counts.matched as f64 / self.counts.evaluated as f64)
    }

    /// Accuracy over all tokens.
    pub fn accuracy(&self) -> Option<f64> {
        (self.counts.total > 0).then(|| self.counts.matched as f64 / self.counts.total as f64)
    }
}

/// Scores one predicted sentence against its gold annotation.
///
/// # Errors
///
/// Any positional word mismatch (or a length mismatch) means the tagger
/// altered tokenization; the comparison is invalid and an `Alignment` error
/// variant is returned rather than the mismatch being skipped.
pub fn score_sentence(
    gold: &TaggedSentence,
    predicted: &[(String, Option<String>)],
) -> Result<SentenceCounts> {
    if gold.len() != predicted.len() {
        return Err(EtiquetaError::alignment(
            gold.len().min(predicted.len()),
            format!("{} tokens", gold.len()),
            format!("{} tokens", predicted.len()),
        ));
    }
    let mut counts = SentenceCounts {
        total: gold.len(),
        ..Default::default()
    };
    for (position, ((gold_word, gold_tag), (word, tag))) in
        gold.iter().zip(predicted).enumerate()
    {
        if gold_word != word {
            return Err(EtiquetaError::alignment(
                position,
                gold_word.clone(),
                word.clone(),
            ));
        }
        if let Some(tag) = tag {
            counts.evaluated += 1;
            if gold_tag.as_deref() == Some(tag.as_str()) {
                counts.matched += 1;
            }
        }
    }
    Ok(counts)
}

/// Runs `tagger` over the gold sentences of `dataset` and aggregates the
/// per-sentence counts.
///
/// Both sides are universal-projected, so predicted and gold tags share a
/// vocabulary; the projectors' `missing` sets accumulate as a side effect
/// for reporting and do not affect the counts.
///
/// # Errors
///
/// A corpus read failure or an alignment violation aborts the run and is
/// returned as is.
pub fn evaluate<C>(tagger: &UniversalTagger, dataset: &UniversalCorpus<C>) -> Result<Evaluation>
where
    C: Corpus,
{
    info!(
        "evaluate tagger {:?} over dataset {:?}",
        tagger.tagger().config().name(),
        dataset.id()
    );
    let mut evaluation = Evaluation::default();
    for sent in dataset.tagged_sents()? {
        let sent = sent?;
        let words = sent.words();
        let predicted = tagger.tag(&words);
        evaluation.counts += score_sentence(&sent, &predicted)?;
        evaluation.n_sents += 1;
    }
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicted(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(w, t)| (w.to_string(), t.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_score_sentence_counts() {
        let gold = TaggedSentence::from_tagged("la/D casa/N es/V azul/A").unwrap();
        let pred = predicted(&[
            ("la", Some("D")),
            ("casa", Some("N")),
            ("es", None),
            ("azul", Some("A")),
        ]);

        let counts = score_sentence(&gold, &pred).unwrap();
        assert_eq!(
            SentenceCounts {
                evaluated: 3,
                matched: 3,
                total: 4
            },
            counts
        );
    }

    #[test]
    fn test_score_sentence_wrong_tag_is_evaluated_not_matched() {
        let gold = TaggedSentence::from_tagged("la/D casa/N").unwrap();
        let pred = predicted(&[("la", Some("D")), ("casa", Some("V"))]);

        let counts = score_sentence(&gold, &pred).unwrap();
        assert_eq!(2, counts.evaluated);
        assert_eq!(1, counts.matched);
    }

    #[test]
    fn test_score_sentence_null_gold_never_matches() {
        let gold = TaggedSentence::from_tagged("la/D casa").unwrap();
        let pred = predicted(&[("la", Some("D")), ("casa", Some("N"))]);

        let counts = score_sentence(&gold, &pred).unwrap();
        assert_eq!(2, counts.evaluated);
        assert_eq!(1, counts.matched);
    }

    #[test]
    fn test_score_sentence_word_mismatch_fails() {
        let gold = TaggedSentence::from_tagged("la/D casa/N").unwrap();
        let pred = predicted(&[("la", Some("D")), ("perro", Some("N"))]);

        let r = score_sentence(&gold, &pred);
        assert!(matches!(r, Err(EtiquetaError::Alignment(_))));
    }

    #[test]
    fn test_score_sentence_length_mismatch_fails() {
        let gold = TaggedSentence::from_tagged("la/D casa/N").unwrap();
        let pred = predicted(&[("la", Some("D"))]);

        let r = score_sentence(&gold, &pred);
        assert!(matches!(r, Err(EtiquetaError::Alignment(_))));
    }

    #[test]
    fn test_counts_aggregate_element_wise() {
        let a = SentenceCounts {
            evaluated: 3,
            matched: 3,
            total: 4,
        };
        let b = SentenceCounts {
            evaluated: 2,
            matched: 1,
            total: 2,
        };

        assert_eq!(
            SentenceCounts {
                evaluated: 5,
                matched: 4,
                total: 6
            },
            a + b
        );
    }

    #[test]
    fn test_derived_metrics() {
        let evaluation = Evaluation {
            counts: SentenceCounts {
                evaluated: 3,
                matched: 3,
                total: 4,
            },
            n_sents: 1,
        };

        assert_eq!(Some(0.75), evaluation.coverage());
        assert_eq!(Some(1.0), evaluation.covered_accuracy());
        assert_eq!(Some(0.75), evaluation.accuracy());
    }

    #[test]
    fn test_derived_metrics_guard_empty() {
        let evaluation = Evaluation::default();

        assert_eq!(None, evaluation.coverage());
        assert_eq!(None, evaluation.covered_accuracy());
        assert_eq!(None, evaluation.accuracy());
    }
}
