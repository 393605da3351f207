use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::morph::{paradigm_index, PartOfSpeech};

// Include the default dictionary at compile time
const DEFAULT_LEXICON: &str = include_str!("../default_lexicon.txt");

/// Dictionary file picked up from the working directory when no path is given.
pub const LEXICON_FILE: &str = "lexicon.txt";

/// One dictionary line: `lemma POS paradigm [irregular forms...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// Index into the built-in paradigms; `None` for indeclinable words.
    pub paradigm: Option<usize>,
    pub forms: Vec<String>,
}

fn parse_line(line: &str) -> Result<LexiconEntry> {
    let mut fields = line.split_whitespace();
    let lemma = fields.next().context("missing lemma")?.to_lowercase();
    let pos: PartOfSpeech = fields.next().context("missing part of speech")?.parse()?;
    let paradigm = match fields.next() {
        None | Some("-") => None,
        Some(name) => match paradigm_index(name) {
            Some(index) => Some(index),
            None => bail!("unknown paradigm '{}'", name),
        },
    };
    let forms = fields.map(str::to_lowercase).collect();

    Ok(LexiconEntry {
        lemma,
        pos,
        paradigm,
        forms,
    })
}

/// Parses dictionary text. With `strict`, the first bad line is an error;
/// otherwise bad lines are logged and skipped.
pub fn parse_lexicon(content: &str, source: &str, strict: bool) -> Result<Vec<LexiconEntry>> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok(entry) => entries.push(entry),
            Err(e) if strict => {
                bail!("Invalid lexicon entry in {} at line {}: {}", source, line_num + 1, e)
            }
            Err(e) => {
                warn!(action = "parse", component = "lexicon_entry", source, line_number = line_num + 1, error = %e, "Invalid lexicon entry")
            }
        }
    }

    Ok(entries)
}

pub fn load_lexicon(lexicon_path: Option<&Path>) -> Result<Vec<LexiconEntry>> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "lexicon_loading",
        "Starting lexicon loading"
    );

    let entries = if let Some(path) = lexicon_path {
        info!(action = "load", component = "lexicon_file", file_path = ?path, "Loading lexicon from specified file");
        if !path.exists() {
            bail!("Lexicon file not found: {:?}", path);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {:?}", path))?;
        parse_lexicon(&content, &path.display().to_string(), true)?
    } else {
        let default_file = Path::new(LEXICON_FILE);
        let mut entries = Vec::new();
        if default_file.exists() {
            info!(action = "load", component = "default_lexicon_file", file_path = ?default_file, "Loading lexicon from default file");
            let content = fs::read_to_string(default_file)
                .with_context(|| format!("Failed to read lexicon file {:?}", default_file))?;
            entries = parse_lexicon(&content, LEXICON_FILE, false)?;
        }

        // If nothing loaded, use the embedded dictionary
        if entries.is_empty() {
            info!(
                action = "load",
                component = "embedded_lexicon",
                "Using embedded default lexicon"
            );
            entries = parse_lexicon(DEFAULT_LEXICON, "embedded lexicon", false)?;
        }
        entries
    };

    info!(
        action = "complete",
        component = "lexicon_loading",
        entry_count = entries.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Lexicon loaded"
    );
    Ok(entries)
}

/// The embedded dictionary, parsed.
pub fn default_lexicon() -> Result<Vec<LexiconEntry>> {
    parse_lexicon(DEFAULT_LEXICON, "embedded lexicon", true)
}

/// Writes the embedded dictionary into `dir` so it can be edited.
pub fn init_default_lexicon(dir: &Path) -> Result<PathBuf> {
    let target = dir.join(LEXICON_FILE);

    if target.exists() {
        bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            target.display()
        );
    }

    fs::write(&target, DEFAULT_LEXICON)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!(action = "write", component = "lexicon_init", file_path = ?target, "Wrote default lexicon");

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicon_parses_strictly() {
        let entries = default_lexicon().unwrap();
        assert!(entries.len() > 100);
        assert!(entries.iter().any(|e| e.lemma == "статья"));
        assert!(entries.iter().any(|e| e.lemma == "апрель"));
    }

    #[test]
    fn parses_fields_and_skips_comments() {
        let content = "# comment\n\nстатья NOUN f_ija\nодин NUMR - одна одно\nпро PREP\n";
        let entries = parse_lexicon(content, "test", true).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].lemma, "статья");
        assert_eq!(entries[0].paradigm, paradigm_index("f_ija"));
        assert_eq!(entries[1].paradigm, None);
        assert_eq!(entries[1].forms, vec!["одна", "одно"]);
        assert_eq!(entries[2].pos, PartOfSpeech::Preposition);
    }

    #[test]
    fn strict_parsing_reports_line_number() {
        let err = parse_lexicon("статья NOUN f_ija\nкот NOUN nosuch\n", "test", true)
            .unwrap_err()
            .to_string();
        assert!(err.contains("line 2"), "{}", err);
    }

    #[test]
    fn lenient_parsing_skips_bad_lines() {
        let entries = parse_lexicon("кот XXX\nкот NOUN m_hard\n", "test", false).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        assert!(load_lexicon(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        fs::write(&path, "кот NOUN m_hard\n").unwrap();
        let entries = load_lexicon(Some(&path)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lemma, "кот");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let written = init_default_lexicon(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&written).unwrap(), DEFAULT_LEXICON);
        assert!(init_default_lexicon(dir.path()).is_err());
    }
}
