//! Text Analyzers Module
//!
//! Stop word resources and the bag-of-words normalizer built on them.

mod normalizer;
mod stop_words;

pub use normalizer::TextNormalizer;
pub use stop_words::{english_stop_words, StopWords, BUNDLED_ENGLISH};
