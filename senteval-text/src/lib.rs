//! Text preparation for sentence-embedding evaluation.
//!
//! ```no_run
//! use senteval_text::TextNormalizer;
//!
//! let normalizer = TextNormalizer::english()?;
//! assert_eq!(normalizer.normalize("The cat sat."), "cat sat");
//! # Ok::<(), senteval_text::TextError>(())
//! ```

pub mod analyzers;
pub mod coerce;
mod error;

pub use analyzers::{english_stop_words, StopWords, TextNormalizer, BUNDLED_ENGLISH};
pub use coerce::{coerce_json, coerce_optional, coerce_to_text};
pub use error::{Result, TextError};
