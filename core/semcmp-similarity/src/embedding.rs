use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use serde::Deserialize;

use crate::errors::{Result, SimilarityError};

/// Sentence-embedding capability: one fixed-dimension vector per input text.
pub trait Embedder {
    fn dimension(&self) -> usize;

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }
}

/// Deferred model construction, run on first use of a [`SemanticModel`].
pub type ModelLoader = Box<dyn Fn() -> Result<Box<dyn Embedder>>>;

/// Caller-owned slot for the embedding model.
///
/// Empty until [`SemanticModel::load`] is called or a lazy loader is registered; using an empty
/// slot fails with [`SimilarityError::UnavailableModel`].
#[derive(Default)]
pub struct SemanticModel {
    model: OnceCell<Box<dyn Embedder>>,
    loader: Option<ModelLoader>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that builds its model the first time it is needed.
    pub fn lazy(loader: impl Fn() -> Result<Box<dyn Embedder>> + 'static) -> Self {
        Self {
            model: OnceCell::new(),
            loader: Some(Box::new(loader)),
        }
    }

    /// Install `embedder`, replacing any model already present.
    pub fn load(&mut self, embedder: impl Embedder + 'static) {
        let boxed: Box<dyn Embedder> = Box::new(embedder);
        tracing::debug!(dimension = boxed.dimension(), "semantic model loaded");
        self.model = OnceCell::from(boxed);
    }

    /// Drop the loaded model (the lazy loader, if any, stays registered).
    pub fn unload(&mut self) -> Option<Box<dyn Embedder>> {
        self.model.take()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn get(&self) -> Result<&dyn Embedder> {
        if let Some(model) = self.model.get() {
            return Ok(model.as_ref());
        }

        let loader = self.loader.as_ref().ok_or(SimilarityError::UnavailableModel)?;
        tracing::debug!("loading semantic model on first use");
        let model = loader()?;
        // Single-threaded: nothing can have filled the cell since the check above.
        let _ = self.model.set(model);
        self.model
            .get()
            .map(|model| model.as_ref())
            .ok_or(SimilarityError::UnavailableModel)
    }

    /// Embed `texts` and check the backend's output shape.
    pub fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let model = self.get()?;
        let vectors = model.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(SimilarityError::EmbeddingCount {
                expected: texts.len(),
                found: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

impl fmt::Debug for SemanticModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticModel")
            .field("loaded", &self.is_loaded())
            .field("lazy", &self.loader.is_some())
            .finish()
    }
}

/// Offline embedder: words are feature-hashed into signed buckets and the result L2-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedBagOfWords {
    dimension: usize,
}

impl HashedBagOfWords {
    pub fn new(dimension: usize) -> Self {
        Self { dimension: dimension.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty());
        for word in words {
            let mut hasher = FxHasher::default();
            word.to_lowercase().hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        normalize(&mut vector);
        vector
    }
}

impl Default for HashedBagOfWords {
    fn default() -> Self {
        Self::new(512)
    }
}

impl Embedder for HashedBagOfWords {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

/// Scale `vector` to unit length; zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[derive(Debug, Deserialize)]
struct VectorTableFile {
    dimension: usize,
    vectors: FxHashMap<String, Vec<f32>>,
}

/// Precomputed embeddings keyed by exact text, e.g. exported from an external model.
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    dimension: usize,
    vectors: FxHashMap<String, Vec<f32>>,
}

impl VectorTable {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: FxHashMap::default(),
        }
    }

    /// Reads `{"dimension": n, "vectors": {"text": [..], ..}}`.
    pub fn from_json(input: &str) -> Result<Self> {
        let file: VectorTableFile = serde_json::from_str(input)?;
        let mut table = Self::new(file.dimension);
        for (text, vector) in file.vectors {
            table.insert(text, vector)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, text: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.dimension,
                found: vector.len(),
            });
        }
        self.vectors.insert(text.into(), vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl Embedder for VectorTable {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(*text)
                    .or_else(|| self.vectors.get(text.trim()))
                    .cloned()
                    .ok_or_else(|| SimilarityError::MissingVector(text.to_string()))
            })
            .collect()
    }
}
