use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use bitflags::bitflags;

/// Coarse part-of-speech tag (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PartOfSpeech {
    Adjective = 0,
    Adposition = 1,
    Adverb = 2,
    Auxiliary = 3,
    CoordConjunction = 4,
    Determiner = 5,
    Interjection = 6,
    Noun = 7,
    Numeral = 8,
    Particle = 9,
    Pronoun = 10,
    ProperNoun = 11,
    Punctuation = 12,
    SubordConjunction = 13,
    Symbol = 14,
    Verb = 15,
    Space = 16,
    Other = 17,
}

impl PartOfSpeech {
    /// Reads a tag as emitted by a tagger (`NOUN`, `verb`, `CONJ`, ...). Unknown tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "ADJ" => Self::Adjective,
            "ADP" => Self::Adposition,
            "ADV" => Self::Adverb,
            "AUX" => Self::Auxiliary,
            "CCONJ" | "CONJ" => Self::CoordConjunction,
            "DET" => Self::Determiner,
            "INTJ" => Self::Interjection,
            "NOUN" => Self::Noun,
            "NUM" => Self::Numeral,
            "PART" => Self::Particle,
            "PRON" => Self::Pronoun,
            "PROPN" => Self::ProperNoun,
            "PUNCT" => Self::Punctuation,
            "SCONJ" => Self::SubordConjunction,
            "SYM" => Self::Symbol,
            "VERB" => Self::Verb,
            "SPACE" => Self::Space,
            _ => Self::Other,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Adjective => "ADJ",
            Self::Adposition => "ADP",
            Self::Adverb => "ADV",
            Self::Auxiliary => "AUX",
            Self::CoordConjunction => "CCONJ",
            Self::Determiner => "DET",
            Self::Interjection => "INTJ",
            Self::Noun => "NOUN",
            Self::Numeral => "NUM",
            Self::Particle => "PART",
            Self::Pronoun => "PRON",
            Self::ProperNoun => "PROPN",
            Self::Punctuation => "PUNCT",
            Self::SubordConjunction => "SCONJ",
            Self::Symbol => "SYM",
            Self::Verb => "VERB",
            Self::Space => "SPACE",
            Self::Other => "X",
        }
    }

    /// Tags that can head a noun chunk.
    pub fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun | Self::Pronoun)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Dependency relation between a token and its head.
///
/// Covers the ClearNLP labels produced by English parsers plus their Universal Dependencies
/// spellings; subtypes (`nmod:tmod`) fall back to their base relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DepLabel {
    Root,
    Nsubj,
    Nsubjpass,
    Csubj,
    Dobj,
    Obj,
    Iobj,
    Dative,
    Pobj,
    Pcomp,
    Prep,
    Case,
    Nmod,
    Npadvmod,
    Amod,
    Advmod,
    Compound,
    Conj,
    Cc,
    Det,
    Poss,
    Punct,
    Aux,
    Auxpass,
    Neg,
    Acl,
    Relcl,
    Advcl,
    Xcomp,
    Ccomp,
    Attr,
    Appos,
    Nummod,
    Mark,
    Prt,
    Agent,
    Acomp,
    Other,
}

impl DepLabel {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "ROOT" | "root" => return Self::Root,
            "nsubj:pass" => return Self::Nsubjpass,
            "aux:pass" => return Self::Auxpass,
            "acl:relcl" => return Self::Relcl,
            "nmod:poss" => return Self::Poss,
            "compound:prt" => return Self::Prt,
            _ => {}
        }

        // Strip UD subtypes: "obl:tmod" -> "obl"
        let base = label.split(':').next().unwrap_or(label);
        match base {
            "nsubj" => Self::Nsubj,
            "nsubjpass" => Self::Nsubjpass,
            "csubj" => Self::Csubj,
            "dobj" => Self::Dobj,
            "obj" => Self::Obj,
            "iobj" => Self::Iobj,
            "dative" => Self::Dative,
            "pobj" => Self::Pobj,
            "pcomp" => Self::Pcomp,
            "prep" => Self::Prep,
            "case" => Self::Case,
            "nmod" => Self::Nmod,
            "npadvmod" => Self::Npadvmod,
            "amod" => Self::Amod,
            "advmod" => Self::Advmod,
            "compound" => Self::Compound,
            "conj" => Self::Conj,
            "cc" => Self::Cc,
            "det" => Self::Det,
            "poss" => Self::Poss,
            "punct" => Self::Punct,
            "aux" => Self::Aux,
            "auxpass" => Self::Auxpass,
            "neg" => Self::Neg,
            "acl" => Self::Acl,
            "relcl" => Self::Relcl,
            "advcl" => Self::Advcl,
            "xcomp" => Self::Xcomp,
            "ccomp" => Self::Ccomp,
            "attr" => Self::Attr,
            "appos" => Self::Appos,
            "nummod" => Self::Nummod,
            "mark" => Self::Mark,
            "prt" => Self::Prt,
            "agent" => Self::Agent,
            "acomp" => Self::Acomp,
            _ => Self::Other,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::Nsubj => "nsubj",
            Self::Nsubjpass => "nsubjpass",
            Self::Csubj => "csubj",
            Self::Dobj => "dobj",
            Self::Obj => "obj",
            Self::Iobj => "iobj",
            Self::Dative => "dative",
            Self::Pobj => "pobj",
            Self::Pcomp => "pcomp",
            Self::Prep => "prep",
            Self::Case => "case",
            Self::Nmod => "nmod",
            Self::Npadvmod => "npadvmod",
            Self::Amod => "amod",
            Self::Advmod => "advmod",
            Self::Compound => "compound",
            Self::Conj => "conj",
            Self::Cc => "cc",
            Self::Det => "det",
            Self::Poss => "poss",
            Self::Punct => "punct",
            Self::Aux => "aux",
            Self::Auxpass => "auxpass",
            Self::Neg => "neg",
            Self::Acl => "acl",
            Self::Relcl => "relcl",
            Self::Advcl => "advcl",
            Self::Xcomp => "xcomp",
            Self::Ccomp => "ccomp",
            Self::Attr => "attr",
            Self::Appos => "appos",
            Self::Nummod => "nummod",
            Self::Mark => "mark",
            Self::Prt => "prt",
            Self::Agent => "agent",
            Self::Acomp => "acomp",
            Self::Other => "dep",
        }
    }
}

impl fmt::Display for DepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

bitflags! {
    /// Pipeline switches forwarded to the parse capability.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ParseOptions: u8 {
        /// Collapse multi-token named entities into one token.
        const MERGE_ENTITIES = 1;
        /// Collapse every noun chunk into one token.
        const MERGE_NOUN_CHUNKS = 2;
        /// Run rule-based sentence boundary detection before lookup/parsing.
        const SENTENCE_SPLIT = 4;
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::all()
    }
}
