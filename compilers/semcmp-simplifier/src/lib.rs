//! Phrase simplification over dependency trees, phrase alignment, and the comparator tying them
//! to the similarity bucketer.

pub mod aligner;
pub mod comparator;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod navigator;

pub use aligner::transform_phrase;
pub use comparator::{CustomStage, SemanticComparator};
pub use config::CompareConfig;
pub use errors::{CompareError, Result};
pub use extractor::{extract_phrases, extract_sentence_phrases};
pub use navigator::TreeNavigator;
