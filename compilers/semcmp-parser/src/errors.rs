use semcmp_protocol::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CoNLL-U line {line}: {message}")]
    Conllu { line: usize, message: String },

    #[error("sentence {sentence} is not a valid dependency tree: {source}")]
    Model {
        sentence: usize,
        #[source]
        source: ModelError,
    },

    #[error("no parse available for text {0:?}")]
    UnknownText(String),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parser backend failed: {0}")]
    Backend(String),

    #[error("retokenization failed: {0}")]
    Retokenize(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ParseError>;
