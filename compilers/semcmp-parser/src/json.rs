//! spaCy-style JSON documents.
//!
//! ```json
//! {"sentences": [{
//!     "text": "Understand customer needs",
//!     "tokens": [
//!         {"text": "Understand", "pos": "VERB", "dep": "ROOT", "head": 0},
//!         {"text": "customer", "pos": "NOUN", "dep": "compound", "head": 2},
//!         {"text": "needs", "pos": "NOUN", "dep": "dobj", "head": 0}
//!     ],
//!     "noun_chunks": [{"start": 1, "end": 3}]
//! }]}
//! ```
//!
//! `head` is a position inside the sentence; a token pointing at itself is the root.

use serde::{Deserialize, Serialize};
use semcmp_protocol::{DepLabel, NounChunk, PartOfSpeech, Sentence, Span, Token, TokenId};

use crate::errors::{ParseError, Result};
use crate::noun_chunks;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub sentences: Vec<SentenceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentenceRecord {
    #[serde(default)]
    pub text: Option<String>,
    pub tokens: Vec<TokenRecord>,
    /// Derived from the tree when absent.
    #[serde(default)]
    pub noun_chunks: Option<Vec<SpanRecord>>,
    #[serde(default)]
    pub entities: Vec<SpanRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub text: String,
    pub pos: String,
    pub dep: String,
    pub head: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpanRecord {
    pub start: usize,
    pub end: usize,
    /// Defaults to the span token closest to the sentence root.
    #[serde(default)]
    pub root: Option<usize>,
}

impl SentenceRecord {
    pub fn into_sentence(self, index: usize) -> Result<Sentence> {
        let model_err = |source| ParseError::Model { sentence: index, source };

        let tokens = self
            .tokens
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let (head, dep) = if record.head == position {
                    (None, DepLabel::Root)
                } else {
                    (Some(TokenId::from(record.head)), DepLabel::from_label(&record.dep))
                };
                Token {
                    id: TokenId::from(position),
                    text: record.text,
                    pos: PartOfSpeech::from_tag(&record.pos),
                    dep,
                    head,
                }
            })
            .collect();
        let entities = self.entities.iter().map(|span| Span::new(span.start, span.end)).collect();

        let sentence = Sentence::new(tokens, Vec::new(), entities).map_err(model_err)?;

        let chunks = match self.noun_chunks {
            Some(records) => records
                .iter()
                .map(|record| {
                    let span = Span::new(record.start, record.end);
                    // Out-of-range spans are rejected by `with_noun_chunks`
                    let root = match record.root {
                        Some(root) => TokenId::from(root),
                        None if !span.is_empty() && span.end <= sentence.len() => sentence.span_root(span),
                        None => TokenId::from(record.start),
                    };
                    NounChunk { span, root }
                })
                .collect(),
            None => noun_chunks::derive(&sentence),
        };
        let sentence = sentence.with_noun_chunks(chunks).map_err(model_err)?;

        Ok(match self.text {
            Some(text) => sentence.with_source_text(text),
            None => sentence,
        })
    }
}

impl DocumentRecord {
    pub fn into_sentences(self) -> Result<Vec<Sentence>> {
        self.sentences
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_sentence(index))
            .collect()
    }
}

/// Read every sentence of a JSON document.
pub fn read(input: &str) -> Result<Vec<Sentence>> {
    let document: DocumentRecord = serde_json::from_str(input)?;
    let sentences = document.into_sentences()?;
    tracing::debug!(sentences = sentences.len(), "read JSON document");
    Ok(sentences)
}
