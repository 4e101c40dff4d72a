use semcmp_parser::{split_sentences, ParseCapability, ParseError};
use semcmp_protocol::Sentence;
use semcmp_similarity::{
    bucket_sort, compare_score, Buckets, Embedder, SemanticModel, SimilarityError, SimilarityMatrix,
};

use crate::aligner;
use crate::config::CompareConfig;
use crate::errors::Result;
use crate::extractor;

/// Post-parse hook run on every sentence, in registration order.
pub type CustomStage = Box<dyn Fn(Sentence) -> std::result::Result<Sentence, ParseError>>;

/// Owns a parse capability, the settings and the embedding model slot.
///
/// Nothing is global: two comparators never share a model, and the model is only present after
/// [`SemanticComparator::load_semantic_model`] or when built with
/// [`SemanticComparator::with_lazy_model`].
pub struct SemanticComparator<P> {
    parser: P,
    config: CompareConfig,
    model: SemanticModel,
    stages: Vec<CustomStage>,
}

impl<P: ParseCapability> SemanticComparator<P> {
    pub fn new(parser: P) -> Self {
        Self::with_config(parser, CompareConfig::default())
    }

    pub fn with_config(parser: P, config: CompareConfig) -> Self {
        Self {
            parser,
            config,
            model: SemanticModel::new(),
            stages: Vec::new(),
        }
    }

    /// Register a loader run the first time a similarity is needed.
    pub fn with_lazy_model(
        mut self,
        loader: impl Fn() -> semcmp_similarity::Result<Box<dyn Embedder>> + 'static,
    ) -> Self {
        self.model = SemanticModel::lazy(loader);
        self
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn add_custom_stage(
        &mut self,
        stage: impl Fn(Sentence) -> std::result::Result<Sentence, ParseError> + 'static,
    ) {
        self.stages.push(Box::new(stage));
    }

    /// Parse `text` with the configured options, then run the custom stages.
    pub fn parse(&self, text: &str) -> Result<Vec<Sentence>> {
        let sentences = self.parser.parse(text, self.config.parse_options)?;
        let mut staged = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            let sentence = self.stages.iter().try_fold(sentence, |sentence, stage| stage(sentence))?;
            staged.push(sentence);
        }
        Ok(staged)
    }

    pub fn split_by_sents<'t>(&self, text: &'t str) -> Vec<&'t str> {
        split_sentences(text)
    }

    /// Simplified phrases of `text`, sorted. Empty text gives no phrases.
    pub fn extract_phrases(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let sentences = self.parse(text)?;
        Ok(extractor::extract_phrases(&sentences))
    }

    pub fn load_semantic_model(&mut self, embedder: impl Embedder + 'static) {
        self.model.load(embedder);
    }

    pub fn unload_semantic_model(&mut self) -> Option<Box<dyn Embedder>> {
        let previous = self.model.unload();
        if previous.is_some() {
            tracing::debug!("semantic model unloaded");
        }
        previous
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.embed(texts)?)
    }

    /// Inner product of the two phrase embeddings.
    pub fn compare_phrases(&self, phrase_a: &str, phrase_b: &str) -> Result<f32> {
        let vectors = self.embed(&[phrase_a, phrase_b])?;
        match vectors.as_slice() {
            [a, b] => Ok(compare_score(a, b)),
            _ => Err(SimilarityError::EmbeddingCount { expected: 2, found: vectors.len() }.into()),
        }
    }

    /// Pairwise scores `[phrase of A][phrase of B]`.
    pub fn build_similarity_matrix<S: AsRef<str>>(&self, doc_a: &[S], doc_b: &[S]) -> Result<SimilarityMatrix> {
        let doc_a: Vec<&str> = doc_a.iter().map(|phrase| phrase.as_ref()).collect();
        let doc_b: Vec<&str> = doc_b.iter().map(|phrase| phrase.as_ref()).collect();

        let left = self.embed(&doc_a)?;
        let right = self.embed(&doc_b)?;
        let matrix = SimilarityMatrix::from_embeddings(&left, &right)?;

        tracing::debug!(rows = matrix.rows(), cols = matrix.cols(), "similarity matrix built");
        Ok(matrix)
    }

    /// Bucket with the configured cutoff.
    pub fn bucket_sort<S: AsRef<str>>(&self, doc_a: &[S], doc_b: &[S], similarity: &SimilarityMatrix) -> Result<Buckets> {
        self.bucket_sort_with_cutoff(doc_a, doc_b, similarity, self.config.cutoff)
    }

    pub fn bucket_sort_with_cutoff<S: AsRef<str>>(
        &self,
        doc_a: &[S],
        doc_b: &[S],
        similarity: &SimilarityMatrix,
        cutoff: f32,
    ) -> Result<Buckets> {
        Ok(bucket_sort(doc_a, doc_b, similarity, cutoff)?)
    }

    /// Extract the phrases of both texts and bucket them.
    pub fn compare_documents(&self, text_a: &str, text_b: &str) -> Result<Buckets> {
        let phrases_a = self.extract_phrases(text_a)?;
        let phrases_b = self.extract_phrases(text_b)?;
        let similarity = self.build_similarity_matrix(&phrases_a, &phrases_b)?;
        self.bucket_sort(&phrases_a, &phrases_b, &similarity)
    }

    pub fn transform_phrase(&self, phrase_a: &str, phrase_b: &str) -> Result<Vec<String>> {
        Ok(aligner::transform_phrase(&self.parser, phrase_a, phrase_b, self.config.parse_options)?)
    }
}

impl<P> std::fmt::Debug for SemanticComparator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticComparator")
            .field("config", &self.config)
            .field("model", &self.model)
            .field("stages", &self.stages.len())
            .finish()
    }
}
