//! Multi-word expression transform.
//!
//! Corpora annotate a fixed phrase as a single token whose constituents are
//! joined by [`MWE_SEPARATOR`] (e.g. `a_la_vez`), while running text carries
//! the constituent words separately. [`expand_tokens`] converts the first
//! form into the second; the collapsed form is produced upstream by the
//! corpus itself, so [`collapse`] is a documented no-op kept for symmetry.

use crate::sentence::TaggedSentence;

/// Joins the constituents of a collapsed multi-word expression.
pub const MWE_SEPARATOR: char = '_';

/// Expands collapsed multi-word expressions into their constituent words.
///
/// Each separator becomes a space and the result is re-split on whitespace,
/// flattening into a plain token sequence. Applying it to already expanded
/// tokens is the identity.
///
/// # Examples
///
/// ```
/// use etiqueta::mwe::expand_tokens;
///
/// let tokens = vec!["gira".to_string(), "a_la_vez".to_string()];
/// assert_eq!(vec!["gira", "a", "la", "vez"], expand_tokens(&tokens));
/// ```
pub fn expand_tokens(tokens: &[String]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.contains(MWE_SEPARATOR) {
            let spaced = token.replace(MWE_SEPARATOR, " ");
            expanded.extend(spaced.split_whitespace().map(str::to_string));
        } else {
            expanded.push(token.clone());
        }
    }
    expanded
}

/// Expands a tagged sentence into plain tokens, discarding the tags; tags
/// are reassigned by re-tagging the expanded words.
pub fn expand_sentence(sentence: &TaggedSentence) -> Vec<String> {
    expand_tokens(&sentence.words())
}

/// Collapsing running text back into MWE form is left to the corpus source;
/// training and tagging only ever see already collapsed annotations, so this
/// returns its input unchanged.
pub fn collapse(sentence: TaggedSentence) -> TaggedSentence {
    sentence
}
