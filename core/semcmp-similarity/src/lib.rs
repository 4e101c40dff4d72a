//! Embedding capability, similarity matrices and the phrase bucketer.

pub mod bucket;
pub mod embedding;
pub mod errors;
pub mod matrix;

pub use bucket::{bucket_sort, Buckets, DEFAULT_CUTOFF};
pub use embedding::{normalize, Embedder, HashedBagOfWords, ModelLoader, SemanticModel, VectorTable};
pub use errors::{Result, SimilarityError};
pub use matrix::{compare_score, SimilarityMatrix};
