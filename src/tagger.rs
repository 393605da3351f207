use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Penn Treebank tags the Latin tagger can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatinTag {
    SingularNoun,
    PluralNoun,
    Verb,
    PastVerb,
    Gerund,
    Adjective,
    Adverb,
    Preposition,
    Determiner,
    Conjunction,
    Pronoun,
    Modal,
    WhWord,
    To,
}

impl LatinTag {
    pub fn penn(self) -> &'static str {
        match self {
            LatinTag::SingularNoun => "NN",
            LatinTag::PluralNoun => "NNS",
            LatinTag::Verb => "VB",
            LatinTag::PastVerb => "VBD",
            LatinTag::Gerund => "VBG",
            LatinTag::Adjective => "JJ",
            LatinTag::Adverb => "RB",
            LatinTag::Preposition => "IN",
            LatinTag::Determiner => "DT",
            LatinTag::Conjunction => "CC",
            LatinTag::Pronoun => "PRP",
            LatinTag::Modal => "MD",
            LatinTag::WhWord => "WRB",
            LatinTag::To => "TO",
        }
    }
}

/// Part-of-speech tagging of a single Latin-script token.
pub trait PosTagger: Send + Sync {
    fn tag(&self, word: &str) -> LatinTag;

    fn is_singular_common_noun(&self, word: &str) -> bool {
        self.tag(word) == LatinTag::SingularNoun
    }
}

const KNOWN_WORDS: &[(&str, LatinTag)] = &[
    ("the", LatinTag::Determiner),
    ("a", LatinTag::Determiner),
    ("an", LatinTag::Determiner),
    ("this", LatinTag::Determiner),
    ("that", LatinTag::Determiner),
    ("these", LatinTag::Determiner),
    ("every", LatinTag::Determiner),
    ("all", LatinTag::Determiner),
    ("no", LatinTag::Determiner),
    ("of", LatinTag::Preposition),
    ("in", LatinTag::Preposition),
    ("on", LatinTag::Preposition),
    ("for", LatinTag::Preposition),
    ("with", LatinTag::Preposition),
    ("without", LatinTag::Preposition),
    ("from", LatinTag::Preposition),
    ("by", LatinTag::Preposition),
    ("at", LatinTag::Preposition),
    ("into", LatinTag::Preposition),
    ("over", LatinTag::Preposition),
    ("about", LatinTag::Preposition),
    ("vs", LatinTag::Preposition),
    ("via", LatinTag::Preposition),
    ("and", LatinTag::Conjunction),
    ("or", LatinTag::Conjunction),
    ("but", LatinTag::Conjunction),
    ("nor", LatinTag::Conjunction),
    ("to", LatinTag::To),
    ("i", LatinTag::Pronoun),
    ("you", LatinTag::Pronoun),
    ("we", LatinTag::Pronoun),
    ("it", LatinTag::Pronoun),
    ("they", LatinTag::Pronoun),
    ("he", LatinTag::Pronoun),
    ("she", LatinTag::Pronoun),
    ("can", LatinTag::Modal),
    ("will", LatinTag::Modal),
    ("should", LatinTag::Modal),
    ("must", LatinTag::Modal),
    ("may", LatinTag::Modal),
    ("how", LatinTag::WhWord),
    ("why", LatinTag::WhWord),
    ("when", LatinTag::WhWord),
    ("where", LatinTag::WhWord),
    ("is", LatinTag::Verb),
    ("are", LatinTag::Verb),
    ("be", LatinTag::Verb),
    ("do", LatinTag::Verb),
    ("get", LatinTag::Verb),
    ("make", LatinTag::Verb),
    ("build", LatinTag::Verb),
    ("use", LatinTag::Verb),
    ("run", LatinTag::Verb),
    ("write", LatinTag::Verb),
    ("learn", LatinTag::Verb),
    ("meet", LatinTag::Verb),
    ("was", LatinTag::PastVerb),
    ("were", LatinTag::PastVerb),
    ("new", LatinTag::Adjective),
    ("open", LatinTag::Adjective),
    ("free", LatinTag::Adjective),
    ("fast", LatinTag::Adjective),
    ("simple", LatinTag::Adjective),
    ("big", LatinTag::Adjective),
    ("best", LatinTag::Adjective),
    ("good", LatinTag::Adjective),
    ("smart", LatinTag::Adjective),
    ("native", LatinTag::Adjective),
    ("not", LatinTag::Adverb),
    ("now", LatinTag::Adverb),
    ("very", LatinTag::Adverb),
];

static KNOWN: Lazy<HashMap<&'static str, LatinTag>> =
    Lazy::new(|| KNOWN_WORDS.iter().copied().collect());

/// Lexicon lookup, then suffix rules, then singular noun.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl PosTagger for HeuristicTagger {
    fn tag(&self, word: &str) -> LatinTag {
        if let Some(tag) = KNOWN.get(word) {
            return *tag;
        }

        let len = word.len();
        if len > 4 && word.ends_with("ly") {
            LatinTag::Adverb
        } else if len > 5 && word.ends_with("ing") {
            LatinTag::Gerund
        } else if len > 4 && word.ends_with("ed") {
            LatinTag::PastVerb
        } else if len > 5
            && ["ous", "ful", "less", "able", "ible"]
                .iter()
                .any(|suffix| word.ends_with(suffix))
        {
            LatinTag::Adjective
        } else if len > 3
            && word.ends_with('s')
            && !["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix))
        {
            LatinTag::PluralNoun
        } else {
            LatinTag::SingularNoun
        }
    }
}
