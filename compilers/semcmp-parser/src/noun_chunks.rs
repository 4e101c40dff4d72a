use semcmp_protocol::{DepLabel, NounChunk, Sentence, Span};

/// Labels that let a nominal token head a noun chunk.
const NP_LABELS: [DepLabel; 11] = [
    DepLabel::Nsubj,
    DepLabel::Nsubjpass,
    DepLabel::Dobj,
    DepLabel::Obj,
    DepLabel::Iobj,
    DepLabel::Dative,
    DepLabel::Pobj,
    DepLabel::Pcomp,
    DepLabel::Appos,
    DepLabel::Attr,
    DepLabel::Root,
];

/// Base noun phrases of an English dependency parse.
///
/// Every NOUN/PROPN/PRON token carrying one of the argument labels yields the span from the
/// leftmost token of its subtree up to itself. Conjuncts inherit the label of the head of their
/// coordination chain. Chunks never overlap: a candidate whose left edge falls inside the previous
/// chunk is dropped.
pub fn derive(sentence: &Sentence) -> Vec<NounChunk> {
    let mut chunks = Vec::new();
    let mut prev_end: Option<usize> = None;

    for token in sentence.tokens() {
        if !token.pos.is_nominal() {
            continue;
        }

        let left = sentence.left_edge(token.id).index();
        if prev_end.map_or(false, |end| left <= end) {
            continue;
        }

        let is_chunk = if NP_LABELS.contains(&token.dep) {
            true
        } else if token.dep == DepLabel::Conj {
            // Climb "A, B and C" back to A
            let mut head = token.id;
            while let Some(parent) = sentence.token(head).head {
                if sentence.token(head).dep != DepLabel::Conj || parent >= head {
                    break;
                }
                head = parent;
            }
            NP_LABELS.contains(&sentence.token(head).dep)
        } else {
            false
        };

        if is_chunk {
            prev_end = Some(token.id.index());
            chunks.push(NounChunk {
                span: Span::new(left, token.id.index() + 1),
                root: token.id,
            });
        }
    }

    chunks
}
