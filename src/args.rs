use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::feed::DEFAULT_FEED_URL;

#[derive(Parser, Debug)]
#[command(
    name = "habrstat",
    about = "Find the most frequent nouns in article titles, week by week",
    version,
    long_about = None
)]
pub struct Args {
    /// Number of listing pages to parse
    #[arg(long)]
    pub pages: Option<usize>,

    /// Number of most frequent words to report per week
    #[arg(long, default_value_t = 3)]
    pub words: usize,

    /// Listing URL; page N is fetched from <URL>pageN/
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: Url,

    /// Number of fetch worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Date that "today" refers to (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Path to a custom lexicon file
    #[arg(short, long)]
    pub lexicon: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail the run when a page cannot be fetched
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize lexicon.txt with the default dictionary
    #[arg(long)]
    pub init: bool,
}
