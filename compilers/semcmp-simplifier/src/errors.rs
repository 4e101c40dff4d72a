use semcmp_parser::ParseError;
use semcmp_similarity::SimilarityError;
use thiserror::Error;

/// Failure of a comparator operation.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompareError {
    /// True when the operation needed an embedding model and none was available.
    pub fn is_unavailable_model(&self) -> bool {
        matches!(self, Self::Similarity(SimilarityError::UnavailableModel))
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
