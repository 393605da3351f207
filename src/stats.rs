use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLemma {
    pub lemma: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekReport {
    pub year: i32,
    pub week: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub articles: usize,
    pub top: Vec<RankedLemma>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub pages_requested: usize,
    pub pages_failed: usize,
    pub articles_seen: usize,
    pub articles_skipped: usize,
    pub lemmas_counted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub reference_date: NaiveDate,
    pub weeks: Vec<WeekReport>,
    pub stats: RunStats,
}
