use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use habrstat::{
    analyze_feed, extract_articles, AnalysisConfig, DateLocale, FeedSource, HeuristicTagger,
    MorphAnalyzer, Normalizer, RawArticle,
};

const LISTING: &str = include_str!("fixtures/listing.html");

/// Serves the fixture as page 1; every other page fails.
struct FixtureFeed;

impl FeedSource for FixtureFeed {
    fn articles(&self, page: usize) -> Result<Vec<RawArticle>> {
        match page {
            1 => Ok(extract_articles(LISTING)),
            _ => Err(anyhow!("connection reset while fetching page {}", page)),
        }
    }
}

fn config(pages: usize, strict: bool) -> AnalysisConfig {
    AnalysisConfig {
        pages,
        top_words: 1,
        workers: 2,
        reference_date: NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
        strict,
    }
}

fn analyzer() -> MorphAnalyzer {
    MorphAnalyzer::new(habrstat::default_lexicon().unwrap())
}

#[test]
fn fixture_listing_yields_raw_pairs_in_page_order() {
    let articles = extract_articles(LISTING);
    assert_eq!(articles.len(), 4);
    assert_eq!(articles[0].date, "сегодня в 14:30");
    assert_eq!(articles[0].title, "Новая статья про базы данных");
    assert_eq!(articles[2].title, "Сервер на Rust: опыт «команды»");
    assert_eq!(articles[3].date, "когда-нибудь");
}

#[test]
fn weekly_report_from_listing() {
    let morph = analyzer();
    let locale = DateLocale::russian();
    let normalizer = Normalizer::new(&locale, &morph, &HeuristicTagger);

    let result = analyze_feed(&FixtureFeed, &normalizer, &config(2, false)).unwrap();

    assert_eq!(result.weeks.len(), 2);

    let week17 = &result.weeks[0];
    assert_eq!((week17.year, week17.week), (2018, 17));
    assert_eq!(week17.first_day, NaiveDate::from_ymd_opt(2018, 4, 23).unwrap());
    assert_eq!(week17.last_day, NaiveDate::from_ymd_opt(2018, 4, 29).unwrap());
    assert_eq!(week17.articles, 1);
    assert_eq!(week17.top[0].lemma, "сервер");

    let week18 = &result.weeks[1];
    assert_eq!((week18.year, week18.week), (2018, 18));
    assert_eq!(week18.articles, 2);
    assert_eq!(week18.top.len(), 1);
    assert_eq!(week18.top[0].lemma, "статья");
    assert_eq!(week18.top[0].count, 2);

    let stats = &result.stats;
    assert_eq!(stats.pages_requested, 2);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.articles_seen, 4);
    assert_eq!(stats.articles_skipped, 1);
    assert_eq!(stats.lemmas_counted, 9);
}

#[test]
fn strict_mode_propagates_page_failures() {
    let morph = analyzer();
    let locale = DateLocale::russian();
    let normalizer = Normalizer::new(&locale, &morph, &HeuristicTagger);

    let err = analyze_feed(&FixtureFeed, &normalizer, &config(2, true)).unwrap_err();
    assert!(err.to_string().contains("Page 2 failed"), "{}", err);

    assert!(analyze_feed(&FixtureFeed, &normalizer, &config(1, true)).is_ok());
}

#[test]
fn identical_runs_give_identical_reports() {
    let morph = analyzer();
    let locale = DateLocale::russian();
    let normalizer = Normalizer::new(&locale, &morph, &HeuristicTagger);

    let first = analyze_feed(&FixtureFeed, &normalizer, &config(2, false)).unwrap();
    let second = analyze_feed(&FixtureFeed, &normalizer, &config(2, false)).unwrap();
    assert_eq!(first.weeks, second.weeks);
}
