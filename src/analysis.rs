use anyhow::{bail, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::dates::{DateLocale, DateResolver};
use crate::error::DateParseError;
use crate::feed::{fetch_pages, FeedSource, RawArticle};
use crate::lemmas::LemmaExtractor;
use crate::morph::MorphAnalyzer;
use crate::stats::{AnalysisResult, RunStats};
use crate::tagger::PosTagger;
use crate::weekly::WeeklyAggregator;

/// Run parameters, already validated.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub pages: usize,
    pub top_words: usize,
    pub workers: usize,
    pub reference_date: NaiveDate,
    /// Abort on the first failed page instead of skipping it.
    pub strict: bool,
}

/// An article with its date resolved and its title reduced to noun lemmas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArticle {
    pub date: NaiveDate,
    pub lemmas: Vec<String>,
}

/// Date resolution and noun extraction over shared, read-only resources.
pub struct Normalizer<'a> {
    resolver: DateResolver<'a, MorphAnalyzer>,
    extractor: LemmaExtractor<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        locale: &'a DateLocale,
        analyzer: &'a MorphAnalyzer,
        tagger: &'a dyn PosTagger,
    ) -> Self {
        Normalizer {
            resolver: DateResolver::new(locale, analyzer),
            extractor: LemmaExtractor::new(analyzer, tagger),
        }
    }

    pub fn normalize(
        &self,
        article: &RawArticle,
        reference: NaiveDate,
    ) -> Result<NormalizedArticle, DateParseError> {
        let date = self.resolver.resolve(&article.date, reference)?;
        let lemmas = self.extractor.extract_nouns(&article.title);
        Ok(NormalizedArticle { date, lemmas })
    }
}

/// Feeds normalized articles into the aggregator in order, skipping the
/// ones whose date could not be resolved.
pub fn aggregate<I>(
    normalized: I,
    aggregator: &mut WeeklyAggregator,
    stats: &mut RunStats,
) where
    I: IntoIterator<Item = Result<NormalizedArticle, DateParseError>>,
{
    for item in normalized {
        stats.articles_seen += 1;
        match item {
            Ok(article) => {
                stats.lemmas_counted += article.lemmas.len();
                let week = aggregator.ingest(article.date, article.lemmas);
                debug!(action = "ingest", component = "aggregator", date = %article.date, year = week.year, week = week.week, "Article ingested");
            }
            Err(e) => {
                stats.articles_skipped += 1;
                warn!(action = "skip", component = "date_resolver", raw_date = e.raw(), error = %e, "Skipping article with unresolvable date");
            }
        }
    }
}

pub fn analyze_feed<S: FeedSource + ?Sized>(
    source: &S,
    normalizer: &Normalizer<'_>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    let total_start_time = Instant::now();
    info!(
        action = "start",
        component = "analysis",
        pages = config.pages,
        reference_date = %config.reference_date,
        "Starting feed analysis"
    );

    let mut stats = RunStats {
        pages_requested: config.pages,
        ..RunStats::default()
    };
    let mut aggregator = WeeklyAggregator::new();

    for page in fetch_pages(source, config.pages, config.workers)? {
        let articles = match page.articles {
            Ok(articles) => articles,
            Err(e) if config.strict => bail!("Page {} failed: {:#}", page.page, e),
            Err(_) => {
                stats.pages_failed += 1;
                continue;
            }
        };

        // The analyzer is immutable, so pages normalize in parallel; ingest
        // stays on this thread and in page order.
        let normalized: Vec<_> = articles
            .par_iter()
            .map(|article| normalizer.normalize(article, config.reference_date))
            .collect();
        aggregate(normalized, &mut aggregator, &mut stats);
    }

    let weeks = aggregator.report(config.top_words);

    info!(
        action = "complete",
        component = "analysis",
        week_count = weeks.len(),
        articles_seen = stats.articles_seen,
        articles_skipped = stats.articles_skipped,
        pages_failed = stats.pages_failed,
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    Ok(AnalysisResult {
        reference_date: config.reference_date,
        weeks,
        stats,
    })
}
