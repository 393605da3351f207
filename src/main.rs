use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::error;
use url::Url;

use habrstat::{
    analyze_feed, init_default_lexicon, load_lexicon, print_analysis_results, setup_logging,
    validate_args, AnalysisConfig, Args, DateLocale, HeuristicTagger, HttpFeed, MorphAnalyzer,
    Normalizer,
};

fn feed_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn default_workers(pages: usize) -> usize {
    std::cmp::min(num_cpus::get(), 8).min(pages).max(1)
}

fn run(args: &Args) -> Result<()> {
    if args.init {
        let path = init_default_lexicon(Path::new("."))?;
        println!("Created {} with the default lexicon", path.display());
        return Ok(());
    }

    let pages = args.pages.unwrap_or_default();
    let config = AnalysisConfig {
        pages,
        top_words: args.words,
        workers: args.workers.unwrap_or_else(|| default_workers(pages)),
        reference_date: args
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        strict: args.strict,
    };

    let analyzer = MorphAnalyzer::new(load_lexicon(args.lexicon.as_deref())?);
    let locale = DateLocale::russian();
    let normalizer = Normalizer::new(&locale, &analyzer, &HeuristicTagger);
    let feed = HttpFeed::new(
        feed_base(args.feed_url.clone()),
        Duration::from_secs(args.timeout),
    );

    let result = analyze_feed(&feed, &normalizer, &config)?;
    print_analysis_results(&result, args.json)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    if let Err(e) = run(&args) {
        error!(action = "fail", component = "main", error = %e, "Run failed");
        return Err(e);
    }
    Ok(())
}
