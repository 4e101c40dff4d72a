//! Comparator settings.

use std::path::Path;

use semcmp_protocol::ParseOptions;
use semcmp_similarity::DEFAULT_CUTOFF;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Settings shared by every call of a [`crate::SemanticComparator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Minimum similarity for a pair of phrases to be shared. Scores equal to it are not.
    pub cutoff: f32,
    /// Stages the parse capability runs on every text.
    pub parse_options: ParseOptions,
    /// Vector size of the hashed bag-of-words embedder.
    pub embedding_dimension: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            parse_options: ParseOptions::all(),
            embedding_dimension: 512,
        }
    }
}

impl CompareConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
