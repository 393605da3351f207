use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://habr.com/all/";

/// A `(timestamp, title)` pair exactly as it appears on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub date: String,
    pub title: String,
}

impl RawArticle {
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        RawArticle {
            date: date.into(),
            title: title.into(),
        }
    }
}

/// Anything that can hand out the articles of listing page `page` (1-based).
pub trait FeedSource: Sync {
    fn articles(&self, page: usize) -> Result<Vec<RawArticle>>;
}

/// Paged listing over HTTP: page `n` lives at `<base>page<n>/`.
pub struct HttpFeed {
    base: Url,
    agent: ureq::Agent,
}

impl HttpFeed {
    pub fn new(base: Url, timeout: Duration) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(5)))
            .timeout_global(Some(timeout))
            .build();
        HttpFeed {
            base,
            agent: ureq::Agent::new_with_config(cfg),
        }
    }

    pub fn page_url(&self, page: usize) -> Result<Url> {
        self.base
            .join(&format!("page{}/", page))
            .with_context(|| format!("Failed to build URL for page {}", page))
    }

    fn fetch(&self, url: &Url) -> Result<String> {
        let res = self
            .agent
            .get(url.as_str())
            .header(
                "User-Agent",
                "Mozilla/5.0 (compatible; habrstat/0.1; +https://habr.com)",
            )
            .call()
            .with_context(|| format!("failed request for URL {}", url))?;
        res.into_body()
            .read_to_string()
            .with_context(|| format!("failed to read body of {}", url))
    }
}

impl FeedSource for HttpFeed {
    fn articles(&self, page: usize) -> Result<Vec<RawArticle>> {
        let url = self.page_url(page)?;
        debug!(action = "fetch", component = "page_fetch", page, url = %url, "Fetching listing page");
        let html = self.fetch(&url)?;
        Ok(extract_articles(&html))
    }
}

/// Outcome of reading one page.
#[derive(Debug)]
pub struct PageResult {
    pub page: usize,
    pub articles: Result<Vec<RawArticle>>,
}

/// Reads pages `1..=pages` on a pool of `workers` threads. Results come back
/// in page order whatever order the fetches finish in.
pub fn fetch_pages<S: FeedSource + ?Sized>(
    source: &S,
    pages: usize,
    workers: usize,
) -> Result<Vec<PageResult>> {
    let start_time = Instant::now();
    let workers = workers.clamp(1, pages.max(1));
    info!(action = "configure", component = "page_fetch", page_count = pages, worker_count = workers, "Fetching listing pages");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build fetch thread pool")?;

    let results: Vec<PageResult> = pool.install(|| {
        (1..=pages)
            .into_par_iter()
            .map(|page| {
                let page_start = Instant::now();
                let articles = source.articles(page);
                match &articles {
                    Ok(list) => info!(
                        action = "complete",
                        component = "page_fetch",
                        page,
                        articles = list.len(),
                        duration_ms = page_start.elapsed().as_millis(),
                        "Page fetched"
                    ),
                    Err(e) => warn!(
                        action = "fail",
                        component = "page_fetch",
                        page,
                        error = %e,
                        "Page fetch failed"
                    ),
                }
                PageResult { page, articles }
            })
            .collect()
    });

    info!(
        action = "complete",
        component = "page_fetch",
        page_count = pages,
        duration_ms = start_time.elapsed().as_millis(),
        "All pages fetched"
    );
    Ok(results)
}

static ARTICLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<article\b[^>]*class\s*=\s*["'][^"']*\bpost_preview\b[^"']*["'][^>]*>(.*?)</article>"#)
        .unwrap()
});
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*class\s*=\s*["'][^"']*\bpost__time\b[^"']*["'][^>]*>(.*?)</span>"#)
        .unwrap()
});
static TITLE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*class\s*=\s*["'][^"']*\bpost__title_link\b[^"']*["'][^>]*>(.*?)</a>"#)
        .unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Pulls `(timestamp, title)` pairs out of a listing page, in page order.
/// Article blocks missing either field are skipped.
pub fn extract_articles(html: &str) -> Vec<RawArticle> {
    ARTICLE_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let block = cap.get(1)?.as_str();
            let date = TIME_RE.captures(block)?.get(1).map(|m| inner_text(m.as_str()))?;
            let title = TITLE_LINK_RE
                .captures(block)?
                .get(1)
                .map(|m| inner_text(m.as_str()))?;
            if date.is_empty() || title.is_empty() {
                return None;
            }
            Some(RawArticle { date, title })
        })
        .collect()
}

fn inner_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, "");
    normalize_ws(&decode_entities(&stripped))
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |cap: &regex::Captures| {
            let name = &cap[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "laquo" => Some('«'),
                    "raquo" => Some('»'),
                    "mdash" => Some('—'),
                    "ndash" => Some('–'),
                    "hellip" => Some('…'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
