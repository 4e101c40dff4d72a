use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{multispace0, multispace1, one_of},
    combinator::{map, peek},
    sequence::terminated,
    IResult,
};

/// Characters that end a sentence when followed by whitespace.
fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…' | '。' | '！' | '？')
}

const CLOSERS: &str = "\"')]}”’»";
const BULLETS: &str = "*-•";

/// Byte range of a sentence inside the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    Terminal,
    Closer,
    Bullet,
    Word,
}

/// Whitespace seen before a token.
#[derive(Debug, Clone, Copy, Default)]
struct Layout {
    line_start: bool,
    blank_line: bool,
}

fn raw_token(input: &str) -> IResult<&str, RawToken> {
    alt((
        map(take_while1(is_terminal), |_| RawToken::Terminal),
        // A bullet only counts when it stands alone ("* item", "- item")
        map(terminated(one_of(BULLETS), peek(multispace1)), |_| RawToken::Bullet),
        map(one_of(CLOSERS), |_| RawToken::Closer),
        map(take_while1(|c: char| !c.is_whitespace() && !is_terminal(c)), |_| {
            RawToken::Word
        }),
    ))(input)
}

fn tokenize(original_input: &str) -> Vec<(TextSpan, RawToken, Layout)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace, remembering line breaks
        let (next_input, gap) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        let newlines = gap.matches('\n').count();
        let layout = Layout {
            line_start: result.is_empty() || newlines > 0,
            blank_line: newlines > 1,
        };

        // 2. Try to match a token
        match raw_token(input) {
            Ok((next_input, token)) => {
                let start = original_input.len() - input.len();
                let len = input.len() - next_input.len();
                result.push((TextSpan::new(start, start + len), token, layout));
                input = next_input;
            }
            Err(_) => {
                // Skip one char to recover
                if let Some(c) = input.chars().next() {
                    input = &input[c.len_utf8()..];
                } else {
                    break;
                }
            }
        }
    }

    result
}

/// Rule-based sentence boundaries.
///
/// A sentence ends after a run of `.`/`!`/`?` (plus any closing quotes or brackets) followed by
/// whitespace or the end of the text. Blank lines and list bullets at the start of a line also
/// open a new sentence; the bullets themselves are not part of any sentence.
pub fn sentence_spans(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut current: Option<TextSpan> = None;
    let mut pending_break = false;

    let tokens = tokenize(text);
    for (i, (span, token, layout)) in tokens.iter().enumerate() {
        let is_bullet = *token == RawToken::Bullet && layout.line_start;
        let continues_terminal = *token == RawToken::Closer
            && pending_break
            && current.map_or(false, |open| open.end == span.start);

        if !continues_terminal && (pending_break || layout.blank_line || is_bullet) {
            spans.extend(current.take());
            pending_break = false;
        }

        if is_bullet {
            continue;
        }

        current = Some(match current {
            Some(open) => TextSpan::new(open.start, span.end),
            None => *span,
        });

        if *token == RawToken::Terminal {
            // Closers glued to the terminal belong to it: `stop."`
            let mut end = span.end;
            let mut next = i + 1;
            while let Some((closer, RawToken::Closer, _)) = tokens.get(next) {
                if closer.start != end {
                    break;
                }
                end = closer.end;
                next += 1;
            }

            // "3.5" keeps going: the terminal must be followed by whitespace
            pending_break = match tokens.get(next) {
                Some((following, _, _)) => following.start > end,
                None => true,
            };
        }
    }
    spans.extend(current);

    spans
}

/// Split `text` into sentence slices.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_spans(text)
        .into_iter()
        .map(|span| &text[span.start..span.end])
        .collect()
}
