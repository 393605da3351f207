pub mod analysis;
pub mod args;
pub mod dates;
pub mod error;
pub mod feed;
pub mod lemmas;
pub mod lexicon;
pub mod morph;
pub mod render;
pub mod stats;
pub mod tagger;
pub mod utils;
pub mod weekly;

pub use analysis::{aggregate, analyze_feed, AnalysisConfig, NormalizedArticle, Normalizer};
pub use args::Args;
pub use dates::{DateLocale, DateResolver, MonthNormalizer};
pub use error::DateParseError;
pub use feed::{extract_articles, fetch_pages, FeedSource, HttpFeed, PageResult, RawArticle};
pub use lemmas::{LemmaExtractor, Token};
pub use lexicon::{default_lexicon, init_default_lexicon, load_lexicon, LexiconEntry};
pub use morph::{MorphAnalyzer, Parse, PartOfSpeech, Script};
pub use render::print_analysis_results;
pub use stats::{AnalysisResult, RankedLemma, RunStats, WeekReport};
pub use tagger::{HeuristicTagger, LatinTag, PosTagger};
pub use utils::{setup_logging, validate_args};
pub use weekly::{week_bounds, WeekKey, WeeklyAggregator};
