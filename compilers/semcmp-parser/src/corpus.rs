use std::collections::HashMap;

use semcmp_protocol::{ParseOptions, Sentence};

use crate::errors::{ParseError, Result};
use crate::retokenize::retokenize;
use crate::sentencizer::split_sentences;
use crate::{conllu, json, ParseCapability};

/// Collapse runs of whitespace so lookups ignore layout.
fn normalize_key(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses answered from sentences produced ahead of time by an external parser.
///
/// Sentences are keyed by their text. A multi-sentence text is found either as a whole or, with
/// [`ParseOptions::SENTENCE_SPLIT`], sentence by sentence.
#[derive(Debug, Clone, Default)]
pub struct ParsedCorpus {
    entries: HashMap<String, Vec<Sentence>>,
}

impl ParsedCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the parse of `text`.
    pub fn insert(&mut self, text: &str, sentences: Vec<Sentence>) {
        self.entries.insert(normalize_key(text), sentences);
    }

    /// Register each sentence under its own text. A text seen before keeps its first parse.
    pub fn insert_sentences(&mut self, sentences: impl IntoIterator<Item = Sentence>) {
        for sentence in sentences {
            let key = normalize_key(&sentence.text());
            if self.entries.contains_key(&key) {
                tracing::warn!(text = key.as_str(), "duplicate sentence parse ignored");
                continue;
            }
            self.entries.insert(key, vec![sentence]);
        }
    }

    pub fn from_conllu(input: &str) -> Result<Self> {
        let mut corpus = Self::new();
        corpus.insert_sentences(conllu::read(input)?);
        Ok(corpus)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let mut corpus = Self::new();
        corpus.insert_sentences(json::read(input)?);
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, text: &str, options: ParseOptions) -> Option<Vec<Sentence>> {
        if let Some(found) = self.entries.get(&normalize_key(text)) {
            return Some(found.clone());
        }
        if !options.contains(ParseOptions::SENTENCE_SPLIT) {
            return None;
        }

        let pieces = split_sentences(text);
        if pieces.len() < 2 {
            return None;
        }
        let mut sentences = Vec::new();
        for piece in pieces {
            sentences.extend(self.entries.get(&normalize_key(piece))?.iter().cloned());
        }
        Some(sentences)
    }
}

impl ParseCapability for ParsedCorpus {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<Vec<Sentence>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sentences = self
            .lookup(text, options)
            .ok_or_else(|| ParseError::UnknownText(text.to_string()))?;

        let sentences = sentences
            .into_iter()
            .map(|sentence| retokenize(sentence, options))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(sentences = sentences.len(), ?options, "parsed from corpus");
        Ok(sentences)
    }
}
