//! Reader for CoNLL-U dependency parses.

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res},
    sequence::separated_pair,
    IResult,
};
use semcmp_protocol::{DepLabel, PartOfSpeech, Sentence, Token, TokenId};

use crate::errors::{ParseError, Result};
use crate::noun_chunks;

const FIELD_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowId {
    /// Regular syntactic word, 1-based.
    Word(usize),
    /// `1-2`: surface form spanning several words.
    Range,
    /// `1.1`: enhanced-graph node outside the basic tree.
    EmptyNode,
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn row_id(input: &str) -> IResult<&str, RowId> {
    all_consuming(alt((
        map(separated_pair(digit1, char('-'), digit1), |_| RowId::Range),
        map(separated_pair(digit1, char('.'), digit1), |_| RowId::EmptyNode),
        map(number, RowId::Word),
    )))(input)
}

fn head_field(input: &str) -> IResult<&str, usize> {
    all_consuming(number)(input)
}

#[derive(Default)]
struct PendingSentence {
    tokens: Vec<Token>,
    text: Option<String>,
    first_line: usize,
}

impl PendingSentence {
    fn finish(self, index: usize) -> Result<Option<Sentence>> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let sentence = Sentence::new(self.tokens, Vec::new(), Vec::new())
            .map_err(|source| ParseError::Model { sentence: index, source })?;
        let chunks = noun_chunks::derive(&sentence);
        let sentence = sentence
            .with_noun_chunks(chunks)
            .map_err(|source| ParseError::Model { sentence: index, source })?;

        tracing::trace!(
            sentence = index,
            line = self.first_line,
            tokens = sentence.len(),
            chunks = sentence.noun_chunks().len(),
            "read CoNLL-U sentence"
        );

        Ok(Some(match self.text {
            Some(text) => sentence.with_source_text(text),
            None => sentence,
        }))
    }
}

fn parse_row(line: &str, line_no: usize, expected: usize) -> Result<Option<Token>> {
    let err = |message: String| ParseError::Conllu { line: line_no, message };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Err(err(format!("expected {} tab-separated fields, found {}", FIELD_COUNT, fields.len())));
    }

    let (_, id) = row_id(fields[0]).map_err(|_| err(format!("invalid token id {:?}", fields[0])))?;
    let position = match id {
        RowId::Word(position) => position,
        RowId::Range | RowId::EmptyNode => return Ok(None),
    };
    if position != expected {
        return Err(err(format!("expected token id {}, found {}", expected, position)));
    }

    let pos = match fields[3] {
        "_" => PartOfSpeech::from_tag(fields[4]),
        upos => PartOfSpeech::from_tag(upos),
    };

    let (_, head) = head_field(fields[6]).map_err(|_| err(format!("invalid head {:?}", fields[6])))?;
    let (head, dep) = match head {
        0 => (None, DepLabel::Root),
        head => (Some(TokenId::from(head - 1)), DepLabel::from_label(fields[7])),
    };

    Ok(Some(Token {
        id: TokenId::from(position - 1),
        text: fields[1].to_string(),
        pos,
        dep,
        head,
    }))
}

/// Read every sentence of a CoNLL-U document.
///
/// Noun chunks are derived from the tree since the format has no column for them.
pub fn read(input: &str) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut pending = PendingSentence::default();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            let done = std::mem::take(&mut pending);
            sentences.extend(done.finish(sentences.len())?);
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if let Some(text) = comment.trim_start().strip_prefix("text =") {
                pending.text = Some(text.trim().to_string());
            }
            continue;
        }

        if pending.tokens.is_empty() {
            pending.first_line = line_no;
        }
        let expected = pending.tokens.len() + 1;
        if let Some(token) = parse_row(line, line_no, expected)? {
            pending.tokens.push(token);
        }
    }
    sentences.extend(pending.finish(sentences.len())?);

    tracing::debug!(sentences = sentences.len(), "read CoNLL-U document");
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# sent_id = 1
# text = Understand customer needs
1\tUnderstand\tunderstand\tVERB\tVB\t_\t0\tROOT\t_\t_
2\tcustomer\tcustomer\tNOUN\tNN\t_\t3\tcompound\t_\t_
3\tneeds\tneed\tNOUN\tNNS\t_\t1\tdobj\t_\t_

# text = Don't stop
1-2\tDon't\t_\t_\t_\t_\t_\t_\t_\t_
1\tDo\tdo\tAUX\tVBP\t_\t3\taux\t_\t_
2\tn't\tnot\tPART\tRB\t_\t3\tneg\t_\t_
3\tstop\tstop\t_\tVB\t_\t0\troot\t_\t_
";

    #[test]
    fn test_read_sentences() {
        let sentences = read(DOC).unwrap();
        assert_eq!(sentences.len(), 2);

        let first = &sentences[0];
        assert_eq!(first.text(), "Understand customer needs");
        assert_eq!(first.root(), TokenId(0));
        assert_eq!(first.token(TokenId(2)).dep, DepLabel::Dobj);
        assert_eq!(first.children(TokenId(0)), &[TokenId(2)]);
        assert_eq!(first.noun_chunks().len(), 1);
        assert_eq!(first.span_text(first.noun_chunks()[0].span), "customer needs");

        // Range row skipped, XPOS used when UPOS is missing
        let second = &sentences[1];
        assert_eq!(second.len(), 3);
        assert_eq!(second.token(TokenId(2)).pos, PartOfSpeech::Other);
        assert_eq!(second.token(TokenId(2)).dep, DepLabel::Root);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let short = "1\tword\tword\tNOUN\n";
        assert!(matches!(read(short), Err(ParseError::Conllu { line: 1, .. })));

        let skipped = "1\ta\ta\tDET\t_\t_\t2\tdet\t_\t_\n3\tb\tb\tNOUN\t_\t_\t0\tROOT\t_\t_\n";
        assert!(matches!(read(skipped), Err(ParseError::Conllu { line: 2, .. })));

        let bad_head = "1\ta\ta\tNOUN\t_\t_\tx\tROOT\t_\t_\n";
        assert!(matches!(read(bad_head), Err(ParseError::Conllu { line: 1, .. })));
    }

    #[test]
    fn test_invalid_tree_is_reported() {
        let two_roots = "1\ta\ta\tNOUN\t_\t_\t0\tROOT\t_\t_\n2\tb\tb\tNOUN\t_\t_\t0\tROOT\t_\t_\n";
        assert!(matches!(read(two_roots), Err(ParseError::Model { sentence: 0, .. })));

        let dangling = "1\ta\ta\tNOUN\t_\t_\t0\tROOT\t_\t_\n2\tb\tb\tNOUN\t_\t_\t7\tdobj\t_\t_\n";
        assert!(matches!(read(dangling), Err(ParseError::Model { .. })));
    }

    #[test]
    fn test_empty_document() {
        assert!(read("").unwrap().is_empty());
        assert!(read("# only comments\n\n").unwrap().is_empty());
    }
}
