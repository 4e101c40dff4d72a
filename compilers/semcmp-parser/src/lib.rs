//! Parse adapter: turns dependency parses produced elsewhere into [`Sentence`]s.

pub mod conllu;
pub mod corpus;
pub mod errors;
pub mod json;
pub mod noun_chunks;
pub mod retokenize;
pub mod sentencizer;

pub use corpus::ParsedCorpus;
pub use errors::{ParseError, Result};
pub use retokenize::{merge_entities, merge_noun_chunks, merge_spans, retokenize};
pub use sentencizer::{sentence_spans, split_sentences, TextSpan};

use semcmp_protocol::{ParseOptions, Sentence};

/// Anything able to turn raw text into dependency-parsed sentences.
pub trait ParseCapability {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<Vec<Sentence>>;
}

impl<P: ParseCapability + ?Sized> ParseCapability for &P {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<Vec<Sentence>> {
        (**self).parse(text, options)
    }
}

impl<P: ParseCapability + ?Sized> ParseCapability for Box<P> {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<Vec<Sentence>> {
        (**self).parse(text, options)
    }
}
