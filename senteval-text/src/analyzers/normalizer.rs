//! Bag-of-words Normalizer
//!
//! Lowercases text, strips everything but `a`-`z` and spaces, and drops stop words.

use std::fmt::Display;
use std::sync::Arc;

use rayon::prelude::*;

use super::stop_words::{english_stop_words, StopWords};
use crate::coerce::coerce_to_text;
use crate::error::Result;

/// Normalizes free text into a space-joined sequence of content words.
///
/// The stop word list is shared read-only, so clones are cheap and the
/// normalizer can be used from many threads at once.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: Arc<StopWords>,
}

impl TextNormalizer {
    /// Create a normalizer over a caller-provided stop word list.
    pub fn new(stop_words: Arc<StopWords>) -> Self {
        Self { stop_words }
    }

    /// Create a normalizer over the shared English list.
    pub fn english() -> Result<Self> {
        Ok(Self::new(english_stop_words()?))
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Normalize `text` into space-separated tokens.
    ///
    /// Removed characters are deleted, not replaced, so `"don't"` becomes `"dont"`.
    /// Only U+0020 counts as a separator; tabs and newlines are removed like
    /// punctuation.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = clean(text);
        let kept: Vec<&str> = self.surviving(&cleaned).collect();
        kept.join(" ")
    }

    /// Surviving tokens in their original order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned = clean(text);
        self.surviving(&cleaned).map(str::to_string).collect()
    }

    /// Stringify any displayable value and normalize it.
    pub fn normalize_value<T: Display + ?Sized>(&self, value: &T) -> String {
        self.normalize(&coerce_to_text(value))
    }

    /// Normalize a column of texts in parallel. Output order matches input order.
    pub fn normalize_batch<S>(&self, texts: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect()
    }

    fn surviving<'a>(&'a self, cleaned: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        cleaned
            .split_whitespace()
            .filter(move |token| !self.stop_words.contains(token))
    }
}

/// ASCII-lowercase and keep only `a`-`z` and spaces.
fn clean(text: &str) -> String {
    text.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::english().unwrap()
    }

    #[test]
    fn test_clean_merges_across_removed_characters() {
        assert_eq!(clean("Don't"), "dont");
        assert_eq!(clean("a-b c"), "ab c");
        assert_eq!(clean("tab\there"), "tabhere");
        assert_eq!(clean("line\nbreak"), "linebreak");
    }

    #[test]
    fn test_clean_drops_non_ascii_letters() {
        assert_eq!(clean("Café Ünïcode"), "caf ncode");
    }

    #[test]
    fn test_stop_words_removal() {
        let tokens = normalizer().tokens("The quick brown fox");
        assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_mixed_sentence() {
        assert_eq!(
            normalizer().normalize("The Quick-Brown Fox jumps! 123"),
            "quickbrown fox jumps"
        );
    }

    #[test]
    fn test_empty_and_numeric_input() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize_value(&42), "");
        assert_eq!(n.normalize_value(&3.25_f64), "");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let n = normalizer();
        assert_eq!(n.normalize("a   b"), "b");
        assert_eq!(n.normalize("  cats    dogs  "), "cats dogs");
    }

    #[test]
    fn test_custom_stop_words() {
        let n = TextNormalizer::new(Arc::new(StopWords::from_slice(&["fox"])));
        assert_eq!(n.normalize("The Fox"), "the");
    }

    #[test]
    fn test_batch_preserves_order() {
        let texts = vec!["First sentence", "the SECOND one", "", "4th!"];
        assert_eq!(
            normalizer().normalize_batch(&texts),
            vec!["first sentence", "second one", "", "th"]
        );
    }
}
