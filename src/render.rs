use anyhow::Result;
use std::fmt::{self, Write};

use crate::stats::AnalysisResult;
use crate::utils::format_number;

const RULE_WIDTH: usize = 80;

pub fn format_table(result: &AnalysisResult) -> Result<String> {
    let mut out = String::new();
    write_table(&mut out, result)?;
    Ok(out)
}

fn write_table(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    let rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "{:<15} | {:<15} | {}",
        "Начало недели", "Конец недели", "Популярные слова"
    )?;
    writeln!(out, "{}", rule)?;
    for week in &result.weeks {
        let words = week
            .top
            .iter()
            .map(|r| r.lemma.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{:<15} | {:<15} | {}",
            week.first_day.to_string(),
            week.last_day.to_string(),
            words
        )?;
        writeln!(out, "{}", rule)?;
    }

    let stats = &result.stats;
    writeln!(
        out,
        "Pages: {} requested, {} failed. Articles: {} seen, {} skipped. Nouns counted: {}.",
        format_number(stats.pages_requested),
        format_number(stats.pages_failed),
        format_number(stats.articles_seen),
        format_number(stats.articles_skipped),
        format_number(stats.lemmas_counted),
    )
}

pub fn format_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn print_analysis_results(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        println!("{}", format_json(result)?);
    } else {
        print!("{}", format_table(result)?);
    }
    Ok(())
}
