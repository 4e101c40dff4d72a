use semcmp_protocol::{ModelError, NounChunk, ParseOptions, Sentence, Span, Token, TokenId};

/// Keep the longest spans first, dropping any that overlap an accepted one.
fn filter_spans(spans: &[Span]) -> Vec<Span> {
    let mut candidates: Vec<Span> = spans.iter().copied().filter(|span| span.len() > 1).collect();
    candidates.sort_by_key(|span| (std::cmp::Reverse(span.len()), span.start));

    let mut accepted: Vec<Span> = Vec::new();
    for span in candidates {
        if accepted.iter().all(|kept| !kept.overlaps(&span)) {
            accepted.push(span);
        }
    }
    accepted.sort();
    accepted
}

fn remap_span(span: Span, positions: &[usize]) -> Span {
    Span::new(positions[span.start], positions[span.end - 1] + 1)
}

/// Collapse every span into a single token.
///
/// The merged token takes the text of the span and the tag, label and head of the span root.
/// Tokens attached anywhere inside the span are re-attached to the merged token. Noun chunks and
/// entities are carried over onto the new positions.
pub fn merge_spans(sentence: &Sentence, spans: &[Span]) -> Result<Sentence, ModelError> {
    let merged = filter_spans(spans);
    if merged.is_empty() {
        return Ok(sentence.clone());
    }

    // Old position -> new position
    let mut positions = Vec::with_capacity(sentence.len());
    // New position -> (old representative, old span)
    let mut groups: Vec<(TokenId, Span)> = Vec::new();
    let mut pending = merged.iter().peekable();
    let mut position = 0;
    while position < sentence.len() {
        let group = match pending.peek() {
            Some(span) if span.start == position => {
                let span = **span;
                pending.next();
                (sentence.span_root(span), span)
            }
            _ => (TokenId::from(position), Span::new(position, position + 1)),
        };
        positions.extend(std::iter::repeat(groups.len()).take(group.1.len()));
        position = group.1.end;
        groups.push(group);
    }

    let tokens = groups
        .iter()
        .enumerate()
        .map(|(new_position, &(representative, span))| {
            let span_root = sentence.token(representative);
            Token {
                id: TokenId::from(new_position),
                text: sentence.span_text(span),
                pos: span_root.pos,
                dep: span_root.dep,
                head: span_root.head.map(|head| TokenId::from(positions[head.index()])),
            }
        })
        .collect();

    let mut noun_chunks: Vec<NounChunk> = Vec::new();
    for chunk in sentence.noun_chunks() {
        let remapped = NounChunk {
            span: remap_span(chunk.span, &positions),
            root: TokenId::from(positions[chunk.root.index()]),
        };
        if !noun_chunks.contains(&remapped) {
            noun_chunks.push(remapped);
        }
    }

    let mut entities: Vec<Span> = Vec::new();
    for entity in sentence.entities() {
        let remapped = remap_span(*entity, &positions);
        if !entities.contains(&remapped) {
            entities.push(remapped);
        }
    }

    let rebuilt = Sentence::new(tokens, noun_chunks, entities)?;
    Ok(match sentence.source_text() {
        Some(text) => rebuilt.with_source_text(text),
        None => rebuilt,
    })
}

pub fn merge_noun_chunks(sentence: &Sentence) -> Result<Sentence, ModelError> {
    let spans: Vec<Span> = sentence.noun_chunks().iter().map(|chunk| chunk.span).collect();
    merge_spans(sentence, &spans)
}

pub fn merge_entities(sentence: &Sentence) -> Result<Sentence, ModelError> {
    merge_spans(sentence, sentence.entities())
}

/// Apply the merge stages selected in `options`: entities first, then noun chunks.
pub fn retokenize(sentence: Sentence, options: ParseOptions) -> Result<Sentence, ModelError> {
    let mut sentence = sentence;
    if options.contains(ParseOptions::MERGE_ENTITIES) {
        sentence = merge_entities(&sentence)?;
    }
    if options.contains(ParseOptions::MERGE_NOUN_CHUNKS) {
        sentence = merge_noun_chunks(&sentence)?;
    }
    Ok(sentence)
}
