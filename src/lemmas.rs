use once_cell::sync::Lazy;
use regex::Regex;

use crate::morph::{MorphAnalyzer, Script};
use crate::tagger::PosTagger;

// Single-script letter runs; digits and punctuation separate words
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+|[а-яё]+").unwrap());

/// A lower-case word, tagged with the script that decides how it is analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    Cyrillic(&'t str),
    Latin(&'t str),
}

impl<'t> Token<'t> {
    pub fn classify(word: &'t str) -> Option<Self> {
        match Script::of(word)? {
            Script::Cyrillic => Some(Token::Cyrillic(word)),
            Script::Latin => Some(Token::Latin(word)),
        }
    }
}

/// Splits a lower-case title into script-tagged words, in title order.
pub fn tokenize(lowered: &str) -> impl Iterator<Item = Token<'_>> {
    WORD_RE
        .find_iter(lowered)
        .filter_map(|m| Token::classify(m.as_str()))
}

/// Pulls noun lemmas out of article titles.
pub struct LemmaExtractor<'a> {
    analyzer: &'a MorphAnalyzer,
    tagger: &'a dyn PosTagger,
}

impl<'a> LemmaExtractor<'a> {
    pub fn new(analyzer: &'a MorphAnalyzer, tagger: &'a dyn PosTagger) -> Self {
        LemmaExtractor { analyzer, tagger }
    }

    /// Noun lemmas in order of appearance, duplicates kept. Words that are
    /// not nouns, or that nothing recognizes, are left out.
    pub fn extract_nouns(&self, title: &str) -> Vec<String> {
        let lowered = title.to_lowercase();
        tokenize(&lowered)
            .filter_map(|token| self.noun_lemma(token))
            .collect()
    }

    fn noun_lemma(&self, token: Token<'_>) -> Option<String> {
        match token {
            Token::Cyrillic(word) => {
                let top = self.analyzer.parse(word).into_iter().next()?;
                top.is_noun().then_some(top.normal_form)
            }
            Token::Latin(word) => {
                let top = self.analyzer.parse(word).into_iter().next()?;
                if top.is_noun() {
                    Some(top.normal_form)
                } else if top.script == Script::Latin && self.tagger.is_singular_common_noun(word)
                {
                    // Latin nouns are kept as written
                    Some(word.to_string())
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::default_lexicon;
    use crate::tagger::HeuristicTagger;
    use proptest::prelude::*;

    fn analyzer() -> MorphAnalyzer {
        MorphAnalyzer::new(default_lexicon().unwrap())
    }

    #[test]
    fn tokenizer_splits_scripts_and_drops_punctuation() {
        let tokens: Vec<Token> = tokenize("rust-1.70: новая версия!habrа").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Latin("rust"),
                Token::Cyrillic("новая"),
                Token::Cyrillic("версия"),
                Token::Latin("habr"),
                Token::Cyrillic("а"),
            ]
        );
    }

    #[test]
    fn extracts_cyrillic_noun_lemmas_in_order() {
        let morph = analyzer();
        let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
        assert_eq!(
            extractor.extract_nouns("Новая статья про базы данных"),
            vec!["статья", "база", "данные"]
        );
        assert_eq!(
            extractor.extract_nouns("Ещё одна статья про данные"),
            vec!["статья", "данные"]
        );
    }

    #[test]
    fn keeps_duplicates() {
        let morph = analyzer();
        let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
        assert_eq!(
            extractor.extract_nouns("Статьи о статьях"),
            vec!["статья", "статья"]
        );
    }

    #[test]
    fn latin_singular_nouns_are_kept_verbatim() {
        let morph = analyzer();
        let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
        assert_eq!(
            extractor.extract_nouns("Как мы переписали сервис на Rust и Kubernetes"),
            vec!["сервис", "rust"]
        );
        assert_eq!(
            extractor.extract_nouns("The new API for the database"),
            vec!["api", "database"]
        );
    }

    #[test]
    fn unknown_words_only_count_when_guessed_as_nouns() {
        let morph = analyzer();
        let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
        let cases: [(&str, &[&str]); 3] = [
            ("Почему я люблю Python", &["python"]),
            (
                "Обзор новых возможностей PostgreSQL 11",
                &["обзор", "возможность", "postgresql"],
            ),
            (
                "Дайджест интересных материалов для мобильного разработчика",
                &["дайджест", "материал", "разработчик"],
            ),
        ];
        for (title, expected) in cases {
            assert_eq!(extractor.extract_nouns(title), expected, "{}", title);
        }
    }

    #[test]
    fn empty_and_symbol_titles_yield_nothing() {
        let morph = analyzer();
        let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
        assert!(extractor.extract_nouns("").is_empty());
        assert!(extractor.extract_nouns("2018 — 42%!").is_empty());
    }

    proptest! {
        #[test]
        fn output_is_letters_only_and_case_insensitive(title in "[a-zA-Zа-яА-ЯёЁ0-9 ,.!?:-]{0,60}") {
            let morph = analyzer();
            let extractor = LemmaExtractor::new(&morph, &HeuristicTagger);
            let lemmas = extractor.extract_nouns(&title);
            for lemma in &lemmas {
                prop_assert!(!lemma.is_empty());
                prop_assert!(lemma.chars().all(char::is_alphabetic), "{:?}", lemma);
            }
            prop_assert_eq!(extractor.extract_nouns(&title.to_lowercase()), lemmas);
        }
    }
}
