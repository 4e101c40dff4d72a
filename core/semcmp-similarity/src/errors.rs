//! Error types for semcmp-similarity.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimilarityError {
    /// No embedding model was loaded and no lazy loader was registered.
    #[error("no embedding model is loaded")]
    UnavailableModel,

    #[error("embedding model failed to load: {0}")]
    ModelLoad(String),

    #[error("no precomputed vector for {0:?}")]
    MissingVector(String),

    #[error("vector has dimension {found}, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("embedder returned {found} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, found: usize },

    #[error("similarity matrix is {rows}x{cols} but the documents hold {left} and {right} phrases")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        left: usize,
        right: usize,
    },

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for similarity operations.
pub type Result<T> = std::result::Result<T, SimilarityError>;
