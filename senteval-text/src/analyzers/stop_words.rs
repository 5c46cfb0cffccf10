//! Stop Word Resource
//!
//! Loads stop word lists from the bundled English resource, from files, or from
//! custom slices, and shares the English list process-wide.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{Result, TextError};

/// Name reported for the list compiled into the crate.
pub const BUNDLED_ENGLISH: &str = "bundled:english";

/// English stop words, one per line, as shipped with the NLTK corpus.
static ENGLISH_RESOURCE: &str = include_str!("../../resources/english.txt");

static SHARED_ENGLISH: OnceLock<Arc<StopWords>> = OnceLock::new();

/// Returns the process-wide English stop word list, parsing it on first use.
pub fn english_stop_words() -> Result<Arc<StopWords>> {
    if let Some(shared) = SHARED_ENGLISH.get() {
        return Ok(Arc::clone(shared));
    }
    let parsed = Arc::new(StopWords::english()?);
    Ok(Arc::clone(SHARED_ENGLISH.get_or_init(|| parsed)))
}

/// Read-only set of words dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Create an empty stop words collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a slice of words.
    pub fn from_slice(words: &[&str]) -> Self {
        let words = words.iter().map(|s| s.to_string()).collect();
        Self { words }
    }

    /// Parse the bundled English list.
    pub fn english() -> Result<Self> {
        Self::parse(BUNDLED_ENGLISH, ENGLISH_RESOURCE)
    }

    /// Load stop words from a file (one word per line).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| TextError::unavailable(&name, e))?;
        Self::parse(name, &content)
    }

    /// Parse a list with one word per line. Blank lines and `#` comments are skipped.
    ///
    /// Entries are lowercased, since normalized tokens always are. A list that
    /// yields no words, or an entry containing whitespace or control characters,
    /// is treated as corrupt.
    pub fn parse(resource: impl Into<String>, content: &str) -> Result<Self> {
        let resource = resource.into();
        let mut words = HashSet::new();

        for (index, line) in content.lines().enumerate() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            if word.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(TextError::unavailable(
                    resource,
                    format!("line {} is not a single word: {:?}", index + 1, word),
                ));
            }
            words.insert(word.to_lowercase());
        }

        if words.is_empty() {
            return Err(TextError::unavailable(resource, "no stop words found"));
        }

        debug!(resource = %resource, words = words.len(), "loaded stop words");
        Ok(Self { words })
    }

    /// Add a word to the stop words list.
    pub fn add(&mut self, word: impl Into<String>) {
        self.words.insert(word.into());
    }

    /// Remove a word from the stop words list.
    pub fn remove(&mut self, word: &str) {
        self.words.remove(word);
    }

    /// Exact, case-sensitive membership. Normalized tokens are already lowercase.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.words.iter()
    }

    /// Merge with another stop words collection.
    pub fn merge(&mut self, other: &StopWords) {
        for word in &other.words {
            self.words.insert(word.clone());
        }
    }
}
