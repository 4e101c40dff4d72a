use semcmp_parser::{ParseCapability, Result};
use semcmp_protocol::{ParseOptions, Sentence, Token};

fn verbs(sentences: &[Sentence]) -> impl Iterator<Item = (&Sentence, &Token)> {
    sentences
        .iter()
        .flat_map(|sentence| sentence.tokens().iter().filter(|t| t.is_verb()).map(move |t| (sentence, t)))
}

/// Words governed by `verb`, in sentence order, without the verb itself.
fn object_of(sentence: &Sentence, verb: &Token) -> String {
    sentence
        .subtree(verb.id)
        .into_iter()
        .filter(|&id| id != verb.id)
        .map(|id| sentence.token(id).text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paraphrase candidates that put each verb of `phrase_b` in front of each object of `phrase_a`.
///
/// The result starts with `phrase_a` and ends with `phrase_b`. Equal phrases are returned as is,
/// without parsing.
pub fn transform_phrase<P: ParseCapability + ?Sized>(
    parser: &P,
    phrase_a: &str,
    phrase_b: &str,
    options: ParseOptions,
) -> Result<Vec<String>> {
    if phrase_a == phrase_b {
        return Ok(vec![phrase_a.to_string()]);
    }

    let parsed_b = parser.parse(phrase_b, options)?;
    let parsed_a = parser.parse(phrase_a, options)?;
    let verbs_b: Vec<&Token> = verbs(&parsed_b).map(|(_, verb)| verb).collect();

    let mut phrases = vec![phrase_a.to_string()];
    for (sentence, verb_a) in verbs(&parsed_a) {
        let object = object_of(sentence, verb_a);
        for verb_b in &verbs_b {
            let candidate = format!("{} {}", verb_b.text, object);
            phrases.push(candidate.trim_end().to_string());
        }
    }
    phrases.push(phrase_b.to_string());

    tracing::debug!(candidates = phrases.len() - 2, "aligned phrases");
    Ok(phrases)
}
