use std::collections::BTreeSet;

use semcmp_protocol::{DepLabel, NounChunk, Sentence, Token, TokenId};

use crate::navigator::TreeNavigator;

/// Head labels that attach a word to something other than the chunk's own clause.
const DETACHED_HEAD_LABELS: [DepLabel; 3] = [DepLabel::Nmod, DepLabel::Conj, DepLabel::Compound];

/// True for a token that opens a new clause or list item.
fn is_boundary(token: &Token) -> bool {
    token.is_punct() || token.dep == DepLabel::Cc
}

/// Trailing material: descendants in order, up to the first boundary or subject, minus the chunk's
/// own tokens.
fn trailing_words<'s>(
    sentence: &'s Sentence,
    chunk: &NounChunk,
    children: &BTreeSet<TokenId>,
) -> Vec<(usize, &'s str)> {
    children
        .iter()
        .map(|&id| sentence.token(id))
        .take_while(|token| !is_boundary(token) && token.dep != DepLabel::Nsubj)
        .filter(|token| !chunk.span.contains(token.id))
        .map(|token| (token.id.index(), token.text.as_str()))
        .collect()
}

fn join_words(words: &[(usize, &str)]) -> String {
    words.iter().map(|(_, text)| *text).collect::<Vec<_>>().join(" ")
}

/// Simplified phrases of one sentence, added to `phrases`.
pub fn extract_sentence_phrases(sentence: &Sentence, phrases: &mut BTreeSet<String>) {
    let navigator = TreeNavigator::new(sentence);

    for chunk in sentence.noun_chunks() {
        if sentence.chunk_label(chunk) == DepLabel::Pobj {
            continue;
        }

        let heads = navigator.find_heads(chunk.root);
        let children = navigator.find_children(chunk.root);
        let trailing = trailing_words(sentence, chunk, &children);
        let chunk_word = (chunk.span.start, sentence.span_text(chunk.span));

        tracing::trace!(
            chunk = chunk_word.1.as_str(),
            heads = heads.len(),
            children = children.len(),
            "simplifying noun chunk"
        );

        if heads.is_empty() {
            let mut words = vec![(chunk_word.0, chunk_word.1.as_str())];
            words.extend(trailing.iter().copied());
            phrases.insert(join_words(&words));
            continue;
        }

        let mut container: Vec<(usize, &str)> = Vec::new();
        let mut verbs: Vec<&Token> = Vec::new();
        for &head in &heads {
            let token = sentence.token(head);
            if token.is_verb() {
                verbs.push(token);
            } else if !DETACHED_HEAD_LABELS.contains(&token.dep)
                && !sentence.children(head).iter().any(|&child| is_boundary(sentence.token(child)))
            {
                container.push((head.index(), token.text.as_str()));
            }
        }

        for verb in verbs {
            let mut words = container.clone();
            words.push((verb.id.index(), verb.text.as_str()));
            words.push((chunk_word.0, chunk_word.1.as_str()));
            words.sort_by_key(|(position, _)| *position);
            words.extend(trailing.iter().copied());
            phrases.insert(join_words(&words));
        }
    }
}

/// Simplified subject/verb/object phrases of a parsed document, deduplicated and sorted.
pub fn extract_phrases(sentences: &[Sentence]) -> Vec<String> {
    let mut phrases = BTreeSet::new();
    for sentence in sentences {
        extract_sentence_phrases(sentence, &mut phrases);
    }
    tracing::debug!(sentences = sentences.len(), phrases = phrases.len(), "extracted phrases");
    phrases.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use semcmp_protocol::{PartOfSpeech, SentenceBuilder};

    fn coordinated_verbs() -> Sentence {
        SentenceBuilder::new()
            .token("Create", PartOfSpeech::Verb, DepLabel::Root, None)
            .token(",", PartOfSpeech::Punctuation, DepLabel::Punct, Some(0))
            .token("promote", PartOfSpeech::Verb, DepLabel::Conj, Some(0))
            .token("and", PartOfSpeech::CoordConjunction, DepLabel::Cc, Some(2))
            .token("develop", PartOfSpeech::Verb, DepLabel::Conj, Some(2))
            .token("a", PartOfSpeech::Determiner, DepLabel::Det, Some(6))
            .token("business", PartOfSpeech::Noun, DepLabel::Dobj, Some(4))
            .noun_chunk(5, 7, 6)
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_phrase_per_verb() {
        let phrases = extract_phrases(&[coordinated_verbs()]);
        assert_eq!(
            phrases,
            vec!["Create a business", "develop a business", "promote a business"]
        );
    }

    #[test]
    fn test_chunk_without_heads_keeps_trailing_words() {
        // "Communication with stakeholders , daily"
        let sentence = SentenceBuilder::new()
            .token("Communication", PartOfSpeech::Noun, DepLabel::Root, None)
            .token("with", PartOfSpeech::Adposition, DepLabel::Prep, Some(0))
            .token("stakeholders", PartOfSpeech::Noun, DepLabel::Pobj, Some(1))
            .token(",", PartOfSpeech::Punctuation, DepLabel::Punct, Some(0))
            .token("daily", PartOfSpeech::Adverb, DepLabel::Advmod, Some(0))
            .noun_chunk(0, 1, 0)
            .noun_chunk(2, 3, 2)
            .build()
            .unwrap();

        // The pobj chunk is skipped; trailing words stop at the comma
        assert_eq!(extract_phrases(&[sentence]), vec!["Communication with stakeholders"]);
    }

    #[test]
    fn test_container_words_are_ordered() {
        // "Experience shaping strategy": from "strategy", "Experience" is a non-verb head placed
        // before the verb; from "Experience", the same words are trailing material
        let sentence = SentenceBuilder::new()
            .token("Experience", PartOfSpeech::Noun, DepLabel::Root, None)
            .token("shaping", PartOfSpeech::Verb, DepLabel::Acl, Some(0))
            .token("strategy", PartOfSpeech::Noun, DepLabel::Dobj, Some(1))
            .noun_chunk(0, 1, 0)
            .noun_chunk(2, 3, 2)
            .build()
            .unwrap();

        let phrases = extract_phrases(&[sentence]);
        assert_eq!(phrases, vec!["Experience shaping strategy"]);
    }

    #[test]
    fn test_no_chunks_no_phrases() {
        let sentence = SentenceBuilder::new()
            .token("Go", PartOfSpeech::Verb, DepLabel::Root, None)
            .token("!", PartOfSpeech::Punctuation, DepLabel::Punct, Some(0))
            .build()
            .unwrap();

        assert!(extract_phrases(&[sentence]).is_empty());
        assert!(extract_phrases(&[]).is_empty());
    }

    #[test]
    fn test_heads_without_verbs_emit_nothing() {
        // "head manager": the chunk has a head, but no verb to build a phrase around
        let sentence = SentenceBuilder::new()
            .token("head", PartOfSpeech::Noun, DepLabel::Root, None)
            .token("manager", PartOfSpeech::Noun, DepLabel::Appos, Some(0))
            .noun_chunk(1, 2, 1)
            .build()
            .unwrap();

        assert!(extract_phrases(&[sentence]).is_empty());
    }

    #[test]
    fn test_detached_heads_leave_the_container() {
        // "Team Experience shaping strategy", with "Experience" under different labels
        let build = |label: DepLabel| {
            SentenceBuilder::new()
                .token("Team", PartOfSpeech::Noun, DepLabel::Root, None)
                .token("Experience", PartOfSpeech::Noun, label, Some(0))
                .token("shaping", PartOfSpeech::Verb, DepLabel::Acl, Some(1))
                .token("strategy", PartOfSpeech::Noun, DepLabel::Dobj, Some(2))
                .noun_chunk(3, 4, 3)
                .build()
                .unwrap()
        };

        for label in [DepLabel::Nmod, DepLabel::Conj, DepLabel::Compound] {
            assert_eq!(extract_phrases(&[build(label)]), vec!["Team shaping strategy"], "{}", label);
        }
        assert_eq!(extract_phrases(&[build(DepLabel::Appos)]), vec!["Team Experience shaping strategy"]);
    }

    #[test]
    fn test_heads_split_by_punct_or_cc_leave_the_container() {
        // "Experience , shaping strategy" and "Experience and shaping strategy"
        let build = |separator: &str, pos: PartOfSpeech, dep: DepLabel| {
            SentenceBuilder::new()
                .token("Experience", PartOfSpeech::Noun, DepLabel::Root, None)
                .token(separator, pos, dep, Some(0))
                .token("shaping", PartOfSpeech::Verb, DepLabel::Acl, Some(0))
                .token("strategy", PartOfSpeech::Noun, DepLabel::Dobj, Some(2))
                .noun_chunk(3, 4, 3)
                .build()
                .unwrap()
        };

        let punct = build(",", PartOfSpeech::Punctuation, DepLabel::Punct);
        assert_eq!(extract_phrases(&[punct]), vec!["shaping strategy"]);

        let cc = build("and", PartOfSpeech::CoordConjunction, DepLabel::Cc);
        assert_eq!(extract_phrases(&[cc]), vec!["shaping strategy"]);
    }

    #[test]
    fn test_trailing_words_stop_at_subject_or_conjunction() {
        // "Experience in sales <stop> now"
        let build = |stop: &str, pos: PartOfSpeech, dep: DepLabel| {
            SentenceBuilder::new()
                .token("Experience", PartOfSpeech::Noun, DepLabel::Root, None)
                .token("in", PartOfSpeech::Adposition, DepLabel::Prep, Some(0))
                .token("sales", PartOfSpeech::Noun, DepLabel::Pobj, Some(1))
                .token(stop, pos, dep, Some(0))
                .token("now", PartOfSpeech::Adverb, DepLabel::Advmod, Some(0))
                .noun_chunk(0, 1, 0)
                .build()
                .unwrap()
        };

        let subject = build("they", PartOfSpeech::Pronoun, DepLabel::Nsubj);
        assert_eq!(extract_phrases(&[subject]), vec!["Experience in sales"]);

        let conjunction = build("and", PartOfSpeech::CoordConjunction, DepLabel::Cc);
        assert_eq!(extract_phrases(&[conjunction]), vec!["Experience in sales"]);

        let modifier = build("daily", PartOfSpeech::Adverb, DepLabel::Advmod);
        assert_eq!(extract_phrases(&[modifier]), vec!["Experience in sales daily now"]);
    }

    #[test]
    fn test_container_is_repeated_for_each_verb() {
        // "Goal to build and grow revenue"
        let sentence = SentenceBuilder::new()
            .token("Goal", PartOfSpeech::Noun, DepLabel::Root, None)
            .token("to", PartOfSpeech::Particle, DepLabel::Aux, Some(2))
            .token("build", PartOfSpeech::Verb, DepLabel::Acl, Some(0))
            .token("and", PartOfSpeech::CoordConjunction, DepLabel::Cc, Some(2))
            .token("grow", PartOfSpeech::Verb, DepLabel::Conj, Some(2))
            .token("revenue", PartOfSpeech::Noun, DepLabel::Dobj, Some(4))
            .noun_chunk(5, 6, 5)
            .build()
            .unwrap();

        assert_eq!(extract_phrases(&[sentence]), vec!["Goal build revenue", "Goal grow revenue"]);
    }

    #[test]
    fn test_punct_inside_unmerged_chunk_ends_trailing_words() {
        // "C - Level of firm" with the chunk "C - Level" left unmerged
        let sentence = SentenceBuilder::new()
            .token("C", PartOfSpeech::ProperNoun, DepLabel::Compound, Some(2))
            .token("-", PartOfSpeech::Punctuation, DepLabel::Punct, Some(2))
            .token("Level", PartOfSpeech::Noun, DepLabel::Root, None)
            .token("of", PartOfSpeech::Adposition, DepLabel::Prep, Some(2))
            .token("firm", PartOfSpeech::Noun, DepLabel::Pobj, Some(3))
            .noun_chunk(0, 3, 2)
            .build()
            .unwrap();

        assert_eq!(extract_phrases(&[sentence]), vec!["C - Level"]);
    }
}
