use crate::ids::TokenId;
use crate::tags::{DepLabel, PartOfSpeech};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("sentence has no tokens")]
    Empty,
    #[error("token at position {position} carries id {id}")]
    MisplacedToken { position: usize, id: u32 },
    #[error("token {token} points at head {head}, outside a sentence of {len} tokens")]
    HeadOutOfRange { token: usize, head: usize, len: usize },
    #[error("sentence has no root token")]
    MissingRoot,
    #[error("sentence has several root tokens ({first} and {second})")]
    MultipleRoots { first: usize, second: usize },
    #[error("token {token}: only the headless token may be labelled ROOT")]
    RootLabel { token: usize },
    #[error("head references starting at token {token} form a cycle")]
    Cycle { token: usize },
    #[error("span {start}..{end} is empty or outside a sentence of {len} tokens")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("noun chunk {start}..{end} does not contain its root {root}")]
    RootOutsideChunk { start: usize, end: usize, root: usize },
}

/// Half-open range of token positions `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TokenId) -> bool {
        (self.start..self.end).contains(&id.index())
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    pub pos: PartOfSpeech,
    pub dep: DepLabel,
    /// `None` only for the sentence root.
    pub head: Option<TokenId>,
}

impl Token {
    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    pub fn is_verb(&self) -> bool {
        self.pos == PartOfSpeech::Verb
    }

    pub fn is_noun(&self) -> bool {
        self.pos == PartOfSpeech::Noun
    }

    pub fn is_punct(&self) -> bool {
        self.pos == PartOfSpeech::Punctuation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NounChunk {
    pub span: Span,
    pub root: TokenId,
}

/// One parsed sentence: an arena of tokens linked by head indices.
///
/// Heads are the source of truth; the child lists are recomputed from them on construction and
/// kept in position order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
    children: Vec<Vec<TokenId>>,
    root: TokenId,
    noun_chunks: Vec<NounChunk>,
    entities: Vec<Span>,
    source_text: Option<String>,
}

impl Sentence {
    /// Validates the head relation (single root, no cycles) and all spans.
    pub fn new(
        tokens: Vec<Token>,
        noun_chunks: Vec<NounChunk>,
        entities: Vec<Span>,
    ) -> Result<Self, ModelError> {
        let len = tokens.len();
        if len == 0 {
            return Err(ModelError::Empty);
        }

        let mut root: Option<TokenId> = None;
        let mut children = vec![Vec::new(); len];

        for (position, token) in tokens.iter().enumerate() {
            if token.id.index() != position {
                return Err(ModelError::MisplacedToken { position, id: token.id.0 });
            }

            match token.head {
                None => {
                    if token.dep != DepLabel::Root {
                        return Err(ModelError::RootLabel { token: position });
                    }
                    if let Some(first) = root {
                        return Err(ModelError::MultipleRoots {
                            first: first.index(),
                            second: position,
                        });
                    }
                    root = Some(token.id);
                }
                Some(head) => {
                    if head.index() >= len {
                        return Err(ModelError::HeadOutOfRange {
                            token: position,
                            head: head.index(),
                            len,
                        });
                    }
                    if token.dep == DepLabel::Root {
                        return Err(ModelError::RootLabel { token: position });
                    }
                    children[head.index()].push(token.id);
                }
            }
        }

        let root = root.ok_or(ModelError::MissingRoot)?;

        // With a single headless token, any walk longer than `len` steps is a cycle.
        for start in 0..len {
            let mut current = tokens[start].head;
            let mut steps = 0;
            while let Some(head) = current {
                steps += 1;
                if steps > len {
                    return Err(ModelError::Cycle { token: start });
                }
                current = tokens[head.index()].head;
            }
        }

        for span in &entities {
            check_span(span, len)?;
        }

        let sentence = Self {
            tokens,
            children,
            root,
            noun_chunks: Vec::new(),
            entities,
            source_text: None,
        };
        sentence.with_noun_chunks(noun_chunks)
    }

    /// Replace the noun chunks, validating them against this sentence.
    pub fn with_noun_chunks(mut self, noun_chunks: Vec<NounChunk>) -> Result<Self, ModelError> {
        for chunk in &noun_chunks {
            check_span(&chunk.span, self.len())?;
            if !chunk.span.contains(chunk.root) {
                return Err(ModelError::RootOutsideChunk {
                    start: chunk.span.start,
                    end: chunk.span.end,
                    root: chunk.root.index(),
                });
            }
        }
        self.noun_chunks = noun_chunks;
        Ok(self)
    }

    /// Attach the raw text the sentence was parsed from.
    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn root(&self) -> TokenId {
        self.root
    }

    pub fn head(&self, id: TokenId) -> Option<&Token> {
        self.token(id).head.map(|head| self.token(head))
    }

    /// Direct dependents of `id`, in position order.
    pub fn children(&self, id: TokenId) -> &[TokenId] {
        &self.children[id.index()]
    }

    pub fn noun_chunks(&self) -> &[NounChunk] {
        &self.noun_chunks
    }

    pub fn entities(&self) -> &[Span] {
        &self.entities
    }

    /// Grammatical role of a chunk: the label of its root token.
    pub fn chunk_label(&self, chunk: &NounChunk) -> DepLabel {
        self.token(chunk.root).dep
    }

    pub fn span_text(&self, span: Span) -> String {
        join_texts(self.tokens[span.start..span.end].iter().map(|t| t.text.as_str()))
    }

    /// `id` and all of its descendants, in position order.
    pub fn subtree(&self, id: TokenId) -> Vec<TokenId> {
        let mut collected = vec![id];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for &child in self.children(current) {
                collected.push(child);
                stack.push(child);
            }
        }
        collected.sort();
        collected
    }

    /// Leftmost token of the subtree rooted at `id`.
    pub fn left_edge(&self, id: TokenId) -> TokenId {
        self.subtree(id).first().copied().unwrap_or(id)
    }

    /// Number of head hops from `id` up to the root.
    pub fn depth(&self, id: TokenId) -> usize {
        let mut depth = 0;
        let mut current = self.token(id).head;
        while let Some(head) = current {
            depth += 1;
            current = self.token(head).head;
        }
        depth
    }

    /// The token of `span` closest to the sentence root (leftmost on ties).
    pub fn span_root(&self, span: Span) -> TokenId {
        (span.start..span.end)
            .map(TokenId::from)
            .min_by_key(|&id| (self.depth(id), id))
            .unwrap_or(TokenId::from(span.start))
    }

    /// The text the sentence was parsed from, or its tokens joined by spaces.
    pub fn text(&self) -> String {
        match &self.source_text {
            Some(text) => text.clone(),
            None => join_texts(self.tokens.iter().map(|t| t.text.as_str())),
        }
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }
}

fn check_span(span: &Span, len: usize) -> Result<(), ModelError> {
    if span.is_empty() || span.end > len {
        return Err(ModelError::InvalidSpan { start: span.start, end: span.end, len });
    }
    Ok(())
}

fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts.collect::<Vec<_>>().join(" ")
}

/// Incremental construction of a [`Sentence`], mostly for adapters and tests.
#[derive(Debug, Default, Clone)]
pub struct SentenceBuilder {
    tokens: Vec<Token>,
    noun_chunks: Vec<NounChunk>,
    entities: Vec<Span>,
    source_text: Option<String>,
}

impl SentenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token; `head` is the position of its head, `None` for the root.
    pub fn token(
        mut self,
        text: impl Into<String>,
        pos: PartOfSpeech,
        dep: DepLabel,
        head: Option<usize>,
    ) -> Self {
        let id = TokenId::from(self.tokens.len());
        self.tokens.push(Token {
            id,
            text: text.into(),
            pos,
            dep,
            head: head.map(TokenId::from),
        });
        self
    }

    pub fn noun_chunk(mut self, start: usize, end: usize, root: usize) -> Self {
        self.noun_chunks.push(NounChunk {
            span: Span::new(start, end),
            root: TokenId::from(root),
        });
        self
    }

    pub fn entity(mut self, start: usize, end: usize) -> Self {
        self.entities.push(Span::new(start, end));
        self
    }

    pub fn source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<Sentence, ModelError> {
        let sentence = Sentence::new(self.tokens, self.noun_chunks, self.entities)?;
        Ok(match self.source_text {
            Some(text) => sentence.with_source_text(text),
            None => sentence,
        })
    }
}
