use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::stats::{RankedLemma, WeekReport};

/// ISO-8601 week, qualified by its ISO week-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        WeekKey {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn bounds(self) -> Option<(NaiveDate, NaiveDate)> {
        week_bounds(self.week, self.year)
    }
}

/// First (Monday) and last (Sunday) day of ISO week `week` of `year`.
///
/// Week 1 starts on the Monday of the week holding the year's first Thursday.
pub fn week_bounds(week: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let weekday = u64::from(jan_first.weekday().num_days_from_monday());
    let week_one = if weekday > 3 {
        jan_first.checked_add_days(Days::new(7 - weekday))?
    } else {
        jan_first.checked_sub_days(Days::new(weekday))?
    };

    let offset = u64::from(week.checked_sub(1)?) * 7;
    let first = week_one.checked_add_days(Days::new(offset))?;
    let last = first.checked_add_days(Days::new(6))?;
    Some((first, last))
}

#[derive(Debug, Default)]
struct WeekBucket {
    articles: usize,
    lemmas: Vec<String>,
}

/// Per-week multisets of lemmas for one run.
///
/// Ingest is `&mut self`: one owner feeds it, in article order, and lemmas
/// keep their arrival order so rankings can break ties by first occurrence.
#[derive(Debug, Default)]
pub struct WeeklyAggregator {
    buckets: BTreeMap<WeekKey, WeekBucket>,
}

impl WeeklyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one article's lemmas to the week its date falls in. Calling it
    /// twice for the same article counts it twice.
    pub fn ingest<I>(&mut self, date: NaiveDate, lemmas: I) -> WeekKey
    where
        I: IntoIterator<Item = String>,
    {
        let key = WeekKey::of(date);
        let bucket = self.buckets.entry(key).or_default();
        bucket.articles += 1;
        bucket.lemmas.extend(lemmas);
        key
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total lemma occurrences ingested for `week`.
    pub fn lemma_count(&self, week: WeekKey) -> usize {
        self.buckets.get(&week).map_or(0, |b| b.lemmas.len())
    }

    /// The `k` most frequent lemmas of `week`, by descending count, ties in
    /// order of first occurrence. An unknown week yields an empty list.
    pub fn top_k(&self, week: WeekKey, k: usize) -> Vec<RankedLemma> {
        let Some(bucket) = self.buckets.get(&week) else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedLemma> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for lemma in &bucket.lemmas {
            match positions.get(lemma.as_str()) {
                Some(&pos) => ranked[pos].count += 1,
                None => {
                    positions.insert(lemma, ranked.len());
                    ranked.push(RankedLemma {
                        lemma: lemma.clone(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-occurrence order among equal counts
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(k);
        ranked
    }

    /// One entry per week with at least one article, in ascending week order.
    pub fn report(&self, k: usize) -> Vec<WeekReport> {
        self.buckets
            .iter()
            .filter_map(|(&key, bucket)| {
                let (first_day, last_day) = key.bounds()?;
                Some(WeekReport {
                    year: key.year,
                    week: key.week,
                    first_day,
                    last_day,
                    articles: bucket.articles,
                    top: self.top_k(key, k),
                })
            })
            .collect()
    }
}
