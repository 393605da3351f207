use anyhow::{bail, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::lexicon::LexiconEntry;

/// Writing system of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Cyrillic,
    Latin,
}

impl Script {
    /// Classifies a lower-case word. Mixed or non-letter input has no script.
    pub fn of(word: &str) -> Option<Script> {
        if word.is_empty() {
            return None;
        }
        if word.chars().all(is_cyrillic_letter) {
            Some(Script::Cyrillic)
        } else if word.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Script::Latin)
        } else {
            None
        }
    }
}

fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё' | 'А'..='Я' | 'Ё')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Adjective,
    Verb,
    Adverb,
    Preposition,
    Conjunction,
    Particle,
    Pronoun,
    Numeral,
}

impl FromStr for PartOfSpeech {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "NOUN" => PartOfSpeech::Noun,
            "ADJF" => PartOfSpeech::Adjective,
            "VERB" => PartOfSpeech::Verb,
            "ADVB" => PartOfSpeech::Adverb,
            "PREP" => PartOfSpeech::Preposition,
            "CONJ" => PartOfSpeech::Conjunction,
            "PRCL" => PartOfSpeech::Particle,
            "NPRO" => PartOfSpeech::Pronoun,
            "NUMR" => PartOfSpeech::Numeral,
            other => bail!("unknown part of speech '{}'", other),
        })
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Adjective => "ADJF",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Adverb => "ADVB",
            PartOfSpeech::Preposition => "PREP",
            PartOfSpeech::Conjunction => "CONJ",
            PartOfSpeech::Particle => "PRCL",
            PartOfSpeech::Pronoun => "NPRO",
            PartOfSpeech::Numeral => "NUMR",
        };
        f.write_str(tag)
    }
}

/// An inflection table: the ending the dictionary form carries and every
/// ending a surface form may carry on the same stem.
#[derive(Debug)]
pub struct Paradigm {
    pub name: &'static str,
    pub pos: PartOfSpeech,
    pub lemma_ending: &'static str,
    /// `None` for closed classes that only dictionary words may use.
    pub guessing: Option<Guessing>,
    pub endings: &'static [&'static str],
}

/// How a paradigm competes for a word the dictionary does not know.
///
/// Candidates are ranked by ending length, then by whether the stem carries
/// one of `stem_marks`, then by `prior`. Remaining ties go to table order.
#[derive(Debug, Clone, Copy)]
pub struct Guessing {
    pub prior: u8,
    /// Letters a guessed stem may end in; empty allows any.
    pub stem_finals: &'static str,
    /// Stem endings that single the paradigm out (`-ост` for `-ость` nouns).
    pub stem_marks: &'static [&'static str],
    /// Endings too ambiguous for this paradigm to claim.
    pub skip: &'static [&'static str],
}

impl Guessing {
    const fn prior(prior: u8) -> Self {
        Guessing {
            prior,
            stem_finals: "",
            stem_marks: &[],
            skip: &[],
        }
    }

    const fn after(self, stem_finals: &'static str) -> Self {
        Guessing { stem_finals, ..self }
    }

    const fn marked_by(self, stem_marks: &'static [&'static str]) -> Self {
        Guessing { stem_marks, ..self }
    }

    const fn skipping(self, skip: &'static [&'static str]) -> Self {
        Guessing { skip, ..self }
    }

    fn accepts(&self, stem: &str) -> bool {
        self.stem_finals.is_empty()
            || stem
                .chars()
                .last()
                .is_some_and(|c| self.stem_finals.contains(c))
    }

    fn marks(&self, stem: &str) -> bool {
        self.stem_marks.iter().any(|mark| stem.ends_with(mark))
    }
}

/// Built-in paradigms.
pub const PARADIGMS: &[Paradigm] = &[
    Paradigm {
        name: "m_hard",
        pos: PartOfSpeech::Noun,
        lemma_ending: "",
        guessing: Some(Guessing::prior(5)),
        endings: &["", "а", "у", "ом", "е", "ы", "ов", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "m_velar",
        pos: PartOfSpeech::Noun,
        lemma_ending: "",
        guessing: Some(Guessing::prior(6).after("кгх")),
        endings: &["", "а", "у", "ом", "е", "и", "ов", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "m_sibilant",
        pos: PartOfSpeech::Noun,
        lemma_ending: "",
        guessing: Some(Guessing::prior(6).after("жшчщ")),
        endings: &["", "а", "у", "ом", "ем", "е", "и", "ей", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "m_soft",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ь",
        guessing: Some(Guessing::prior(4)),
        endings: &["ь", "я", "ю", "ем", "ём", "е", "и", "ей", "ям", "ями", "ях"],
    },
    Paradigm {
        name: "m_j",
        pos: PartOfSpeech::Noun,
        lemma_ending: "й",
        guessing: Some(Guessing::prior(4).after("аеёиоуыэюя")),
        endings: &["й", "я", "ю", "ем", "е", "и", "ев", "ям", "ями", "ях"],
    },
    Paradigm {
        name: "m_ij",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ий",
        guessing: Some(Guessing::prior(4)),
        endings: &["ий", "ия", "ию", "ием", "ии", "иев", "иям", "иями", "иях"],
    },
    Paradigm {
        name: "f_soft",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ь",
        guessing: Some(Guessing::prior(3).marked_by(&["ост"])),
        endings: &["ь", "и", "ью", "ей", "ям", "ями", "ях", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "f_a",
        pos: PartOfSpeech::Noun,
        lemma_ending: "а",
        guessing: Some(Guessing::prior(4)),
        endings: &["а", "ы", "е", "у", "ой", "ою", "", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "f_a_velar",
        pos: PartOfSpeech::Noun,
        lemma_ending: "а",
        guessing: Some(Guessing::prior(5).after("кгхжшчщ")),
        endings: &["а", "и", "е", "у", "ой", "ей", "", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "f_ya",
        pos: PartOfSpeech::Noun,
        lemma_ending: "я",
        guessing: Some(Guessing::prior(3)),
        endings: &["я", "и", "е", "ю", "ей", "ь", "ям", "ями", "ях"],
    },
    Paradigm {
        name: "f_ija",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ья",
        guessing: Some(Guessing::prior(4)),
        endings: &[
            "ья", "ьи", "ье", "ью", "ьей", "ьёй", "ей", "ьям", "ьями", "ьях",
        ],
    },
    Paradigm {
        name: "f_iya",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ия",
        guessing: Some(Guessing::prior(5).skipping(&["ий"])),
        endings: &["ия", "ии", "ию", "ией", "ий", "иям", "иями", "иях"],
    },
    Paradigm {
        name: "n_o",
        pos: PartOfSpeech::Noun,
        lemma_ending: "о",
        guessing: Some(Guessing::prior(3)),
        endings: &["о", "а", "у", "ом", "е", "", "ам", "ами", "ах"],
    },
    Paradigm {
        name: "n_e",
        pos: PartOfSpeech::Noun,
        lemma_ending: "е",
        guessing: Some(Guessing::prior(2)),
        endings: &["е", "я", "ю", "ем", "ей", "ям", "ями", "ях"],
    },
    Paradigm {
        name: "n_ie",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ие",
        guessing: Some(
            Guessing::prior(4)
                .marked_by(&["ен", "ован", "иван", "ыван"])
                .skipping(&["ий"]),
        ),
        endings: &["ие", "ия", "ию", "ием", "ии", "ий", "иям", "иями", "иях"],
    },
    Paradigm {
        name: "n_mya",
        pos: PartOfSpeech::Noun,
        lemma_ending: "мя",
        guessing: None,
        endings: &[
            "мя", "мени", "менем", "мена", "мён", "менам", "менами", "менах",
        ],
    },
    Paradigm {
        name: "pl_adj",
        pos: PartOfSpeech::Noun,
        lemma_ending: "ые",
        guessing: None,
        endings: &["ые", "ых", "ым", "ыми"],
    },
    Paradigm {
        name: "adj_hard",
        pos: PartOfSpeech::Adjective,
        lemma_ending: "ый",
        guessing: Some(Guessing::prior(9).skipping(&["ом"])),
        endings: &[
            "ый", "ая", "ое", "ые", "ого", "ой", "ому", "ую", "ым", "ом", "ых", "ыми", "ою",
        ],
    },
    Paradigm {
        name: "adj_oj",
        pos: PartOfSpeech::Adjective,
        lemma_ending: "ой",
        guessing: Some(Guessing::prior(8).skipping(&["ом"])),
        endings: &[
            "ой", "ая", "ое", "ие", "ого", "ому", "ую", "им", "ом", "их", "ими",
        ],
    },
    Paradigm {
        name: "adj_velar",
        pos: PartOfSpeech::Adjective,
        lemma_ending: "ий",
        guessing: Some(Guessing::prior(10).after("кгх").skipping(&["ом"])),
        endings: &[
            "ий", "ая", "ое", "ие", "ого", "ой", "ому", "ую", "им", "ом", "их", "ими",
        ],
    },
    Paradigm {
        name: "adj_soft",
        pos: PartOfSpeech::Adjective,
        lemma_ending: "ий",
        guessing: Some(Guessing::prior(1)),
        endings: &[
            "ий", "яя", "ее", "ие", "его", "ей", "ему", "юю", "им", "ем", "их", "ими",
        ],
    },
    Paradigm {
        name: "verb_at",
        pos: PartOfSpeech::Verb,
        lemma_ending: "ать",
        guessing: Some(Guessing::prior(7)),
        endings: &[
            "ать", "аю", "аешь", "ает", "аем", "аете", "ают", "ал", "ала", "ало", "али", "ай",
            "айте", "ая", "ав",
        ],
    },
    Paradigm {
        name: "verb_at_refl",
        pos: PartOfSpeech::Verb,
        lemma_ending: "аться",
        guessing: Some(Guessing::prior(7)),
        endings: &[
            "аться", "аюсь", "аешься", "ается", "аемся", "аетесь", "аются", "ался", "алась",
            "алось", "ались", "айся",
        ],
    },
    Paradigm {
        name: "verb_it",
        pos: PartOfSpeech::Verb,
        lemma_ending: "ить",
        guessing: Some(Guessing::prior(7).skipping(&["у"])),
        endings: &[
            "ить", "ю", "у", "ишь", "ит", "им", "ите", "ят", "ат", "ил", "ила", "ило", "или",
        ],
    },
    Paradigm {
        name: "verb_ovat",
        pos: PartOfSpeech::Verb,
        lemma_ending: "овать",
        guessing: Some(Guessing::prior(7)),
        endings: &[
            "овать", "ую", "уешь", "ует", "уем", "уете", "уют", "овал", "овала", "овало",
            "овали", "уй", "уйте", "уя", "овав",
        ],
    },
    Paradigm {
        name: "verb_ovat_refl",
        pos: PartOfSpeech::Verb,
        lemma_ending: "оваться",
        guessing: Some(Guessing::prior(7)),
        endings: &[
            "оваться", "уюсь", "уется", "уются", "овался", "овалась", "овалось", "овались",
        ],
    },
];

pub fn paradigm_index(name: &str) -> Option<usize> {
    PARADIGMS.iter().position(|p| p.name == name)
}

/// Guessed stems shorter than this are not trusted.
const MIN_GUESS_STEM: usize = 2;

/// One reading of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub normal_form: String,
    pub pos: Option<PartOfSpeech>,
    pub script: Script,
    /// False when the reading was predicted from the word's ending.
    pub known: bool,
}

impl Parse {
    pub fn is_noun(&self) -> bool {
        self.pos == Some(PartOfSpeech::Noun)
    }
}

#[derive(Debug)]
struct Entry {
    pos: PartOfSpeech,
    paradigm: Option<usize>,
    lemma: String,
}

/// Dictionary-driven morphological analyzer.
///
/// Built once from lexicon entries and never mutated afterwards, so a single
/// instance can be shared by reference across threads.
pub struct MorphAnalyzer {
    entries: Vec<Entry>,
    by_lemma: HashMap<String, Vec<usize>>,
    irregular: HashMap<String, Vec<usize>>,
    stemmer: Stemmer,
}

impl fmt::Debug for MorphAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphAnalyzer")
            .field("entries", &self.entries.len())
            .field("irregular", &self.irregular.len())
            .finish()
    }
}

impl MorphAnalyzer {
    pub fn new(lexicon: Vec<LexiconEntry>) -> Self {
        let mut entries = Vec::with_capacity(lexicon.len());
        let mut by_lemma: HashMap<String, Vec<usize>> = HashMap::new();
        let mut irregular: HashMap<String, Vec<usize>> = HashMap::new();

        for (id, item) in lexicon.into_iter().enumerate() {
            by_lemma.entry(item.lemma.clone()).or_default().push(id);
            for form in item.forms {
                irregular.entry(form).or_default().push(id);
            }
            entries.push(Entry {
                pos: item.pos,
                paradigm: item.paradigm,
                lemma: item.lemma,
            });
        }

        MorphAnalyzer {
            entries,
            by_lemma,
            irregular,
            stemmer: Stemmer::create(Algorithm::Russian),
        }
    }

    /// Returns the readings of a lower-case word, best first. An empty result
    /// means the analyzer has nothing to say about the word.
    pub fn parse(&self, word: &str) -> Vec<Parse> {
        let Some(script) = Script::of(word) else {
            return Vec::new();
        };

        let mut parses = self.lookup(word, script);
        if parses.is_empty() && word.contains('ё') {
            parses = self.lookup(&word.replace('ё', "е"), script);
        }
        if !parses.is_empty() {
            return parses;
        }

        match script {
            Script::Cyrillic => self.guess(word),
            Script::Latin => vec![Parse {
                normal_form: word.to_string(),
                pos: None,
                script: Script::Latin,
                known: false,
            }],
        }
    }

    /// Canonical form of the best reading.
    pub fn normal_form(&self, word: &str) -> Option<String> {
        self.parse(word).into_iter().next().map(|p| p.normal_form)
    }

    fn lookup(&self, word: &str, script: Script) -> Vec<Parse> {
        let mut ids: Vec<usize> = Vec::new();

        for (index, paradigm) in PARADIGMS.iter().enumerate() {
            for ending in paradigm.endings {
                let Some(stem) = word.strip_suffix(ending) else {
                    continue;
                };
                let lemma = format!("{}{}", stem, paradigm.lemma_ending);
                if let Some(found) = self.by_lemma.get(&lemma) {
                    ids.extend(
                        found
                            .iter()
                            .filter(|&&id| self.entries[id].paradigm == Some(index)),
                    );
                }
            }
        }

        if let Some(found) = self.by_lemma.get(word) {
            ids.extend(found.iter().filter(|&&id| self.entries[id].paradigm.is_none()));
        }
        if let Some(found) = self.irregular.get(word) {
            ids.extend(found);
        }

        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| {
                let entry = &self.entries[id];
                Parse {
                    normal_form: entry.lemma.clone(),
                    pos: Some(entry.pos),
                    script,
                    known: true,
                }
            })
            .collect()
    }

    /// Longest ending, in characters, a guess may strip from `word`.
    ///
    /// The Snowball stemmer only removes endings after the first vowel, and
    /// leaves the `а`/`я` that some verb endings hang off. Anything longer
    /// would cut into the stem.
    fn inflection_bound(&self, word: &str) -> usize {
        let stem = self.stemmer.stem(word);
        let Some(tail) = word.strip_prefix(&*stem) else {
            return word.chars().count();
        };
        let tail_len = tail.chars().count();
        if stem.ends_with(|c: char| c == 'а' || c == 'я') {
            tail_len + 1
        } else {
            tail_len
        }
    }

    fn guess(&self, word: &str) -> Vec<Parse> {
        let word_len = word.chars().count();
        let bound = self.inflection_bound(word);
        let mut candidates: Vec<((usize, bool, u8), usize, &str)> = Vec::new();

        for (index, paradigm) in PARADIGMS.iter().enumerate() {
            let Some(guessing) = &paradigm.guessing else {
                continue;
            };
            for ending in paradigm.endings {
                if guessing.skip.contains(ending) {
                    continue;
                }
                let Some(stem) = word.strip_suffix(ending) else {
                    continue;
                };
                let len = ending.chars().count();
                if len > bound || word_len < len + MIN_GUESS_STEM || !guessing.accepts(stem) {
                    continue;
                }
                candidates.push(((len, guessing.marks(stem), guessing.prior), index, stem));
            }
        }

        // Stable, so equal ranks stay in table order
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        let mut parses: Vec<Parse> = Vec::new();
        for (_, index, stem) in candidates {
            let paradigm = &PARADIGMS[index];
            let parse = Parse {
                normal_form: format!("{}{}", stem, paradigm.lemma_ending),
                pos: Some(paradigm.pos),
                script: Script::Cyrillic,
                known: false,
            };
            if !parses.contains(&parse) {
                parses.push(parse);
            }
        }
        parses
    }
}
