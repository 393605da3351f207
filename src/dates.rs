use chrono::{Datelike, Days, NaiveDate};

use crate::error::DateParseError;
use crate::morph::MorphAnalyzer;

/// Reduces an inflected month word to its dictionary form
/// ("апреля" -> "апрель").
pub trait MonthNormalizer {
    fn normalize_month(&self, word: &str) -> Option<String>;
}

impl MonthNormalizer for MorphAnalyzer {
    fn normalize_month(&self, word: &str) -> Option<String> {
        self.normal_form(word)
    }
}

/// Locale table: relative-day keywords and nominative month names.
#[derive(Debug, Clone)]
pub struct DateLocale {
    pub today: &'static str,
    pub yesterday: &'static str,
    pub months: [&'static str; 12],
}

impl DateLocale {
    pub const fn russian() -> Self {
        DateLocale {
            today: "сегодня",
            yesterday: "вчера",
            months: [
                "январь",
                "февраль",
                "март",
                "апрель",
                "май",
                "июнь",
                "июль",
                "август",
                "сентябрь",
                "октябрь",
                "ноябрь",
                "декабрь",
            ],
        }
    }

    /// 1-based month number for a nominative month name.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        self.months
            .iter()
            .position(|m| *m == name)
            .map(|i| i as u32 + 1)
    }

    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).copied()
    }

    /// Renders `"<day> <month> <year>"` with the nominative month name.
    pub fn format(&self, date: NaiveDate) -> String {
        let month = self.month_name(date.month()).unwrap_or_default();
        format!("{} {} {}", date.day(), month, date.year())
    }

    /// Parses the `"<day> <month> <year>"` form produced by [`DateLocale::format`].
    pub fn parse_canonical(&self, text: &str) -> Option<NaiveDate> {
        let mut parts = text.split_whitespace();
        let day: u32 = parts.next()?.parse().ok()?;
        let month = self.month_number(parts.next()?)?;
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        DateLocale::russian()
    }
}

/// Turns listing timestamps into calendar dates relative to an injected
/// reference date.
pub struct DateResolver<'a, N: MonthNormalizer + ?Sized> {
    locale: &'a DateLocale,
    normalizer: &'a N,
}

impl<'a, N: MonthNormalizer + ?Sized> DateResolver<'a, N> {
    pub fn new(locale: &'a DateLocale, normalizer: &'a N) -> Self {
        DateResolver { locale, normalizer }
    }

    pub fn resolve(&self, raw: &str, reference: NaiveDate) -> Result<NaiveDate, DateParseError> {
        let lowered = raw.to_lowercase();

        if lowered.contains(self.locale.today) {
            return Ok(reference);
        }
        if lowered.contains(self.locale.yesterday) {
            return reference
                .checked_sub_days(Days::new(1))
                .ok_or_else(|| DateParseError::InvalidDate {
                    raw: raw.to_string(),
                    day: reference.day(),
                    month: self
                        .locale
                        .month_name(reference.month())
                        .unwrap_or_default()
                        .to_string(),
                    year: reference.year(),
                });
        }

        let tokens: Vec<&str> = lowered.split_whitespace().take(3).collect();
        if tokens.len() < 2 {
            return Err(DateParseError::TooFewTokens {
                raw: raw.to_string(),
            });
        }

        let day = tokens[0]
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or_else(|| DateParseError::InvalidDay {
                raw: raw.to_string(),
                token: tokens[0].to_string(),
            })?;

        // A missing or non-numeric third token means the year was omitted.
        let year = tokens
            .get(2)
            .map(|t| t.trim_end_matches(|c: char| !c.is_ascii_digit()))
            .and_then(|t| t.parse::<i32>().ok())
            .unwrap_or_else(|| reference.year());

        let month_word = tokens[1].trim_matches(|c: char| !c.is_alphabetic());
        let unknown_month = || DateParseError::UnknownMonth {
            raw: raw.to_string(),
            token: tokens[1].to_string(),
        };
        let month = self
            .normalizer
            .normalize_month(month_word)
            .filter(|m| self.locale.month_number(m).is_some())
            .ok_or_else(unknown_month)?;

        let canonical = format!("{} {} {}", day, month, year);
        self.locale
            .parse_canonical(&canonical)
            .ok_or(DateParseError::InvalidDate {
                raw: raw.to_string(),
                day,
                month,
                year,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::default_lexicon;
    use proptest::prelude::*;

    fn analyzer() -> MorphAnalyzer {
        MorphAnalyzer::new(default_lexicon().unwrap())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_returns_reference() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        let reference = ymd(2018, 5, 1);
        assert_eq!(resolver.resolve("сегодня в 14:30", reference), Ok(reference));
        assert_eq!(resolver.resolve("Сегодня", reference), Ok(reference));
    }

    #[test]
    fn yesterday_crosses_month_and_year() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        assert_eq!(resolver.resolve("вчера", ymd(2018, 5, 1)), Ok(ymd(2018, 4, 30)));
        assert_eq!(
            resolver.resolve("вчера в 09:00", ymd(2019, 1, 1)),
            Ok(ymd(2018, 12, 31))
        );
    }

    #[test]
    fn yesterday_before_earliest_date_reports_reference_month() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        let reference = NaiveDate::MIN;
        assert_eq!(
            resolver.resolve("вчера", reference),
            Err(DateParseError::InvalidDate {
                raw: "вчера".to_string(),
                day: 1,
                month: "январь".to_string(),
                year: reference.year(),
            })
        );
    }

    #[test]
    fn genitive_month_without_year_uses_reference_year() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        let reference = ymd(2018, 6, 10);
        assert_eq!(resolver.resolve("24 апреля", reference), Ok(ymd(2018, 4, 24)));
        assert_eq!(
            resolver.resolve("24 апреля в 10:15", reference),
            Ok(ymd(2018, 4, 24))
        );
        assert_eq!(resolver.resolve("1 мая в 10:15", reference), Ok(ymd(2018, 5, 1)));
        assert_eq!(resolver.resolve("8 марта", reference), Ok(ymd(2018, 3, 8)));
    }

    #[test]
    fn explicit_year_wins() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        let reference = ymd(2018, 6, 10);
        assert_eq!(
            resolver.resolve("31 декабря 2017 в 23:59", reference),
            Ok(ymd(2017, 12, 31))
        );
        assert_eq!(
            resolver.resolve("2 января 2016, 11:00", reference),
            Ok(ymd(2016, 1, 2))
        );
    }

    #[test]
    fn failures_are_explicit() {
        let morph = analyzer();
        let locale = DateLocale::russian();
        let resolver = DateResolver::new(&locale, &morph);
        let reference = ymd(2018, 6, 10);

        assert!(matches!(
            resolver.resolve("апреля", reference),
            Err(DateParseError::TooFewTokens { .. })
        ));
        assert!(matches!(
            resolver.resolve("", reference),
            Err(DateParseError::TooFewTokens { .. })
        ));
        assert!(matches!(
            resolver.resolve("сорок апреля", reference),
            Err(DateParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            resolver.resolve("32 апреля", reference),
            Err(DateParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            resolver.resolve("12 статьи", reference),
            Err(DateParseError::UnknownMonth { .. })
        ));
        assert!(matches!(
            resolver.resolve("31 апреля 2018", reference),
            Err(DateParseError::InvalidDate { day: 31, year: 2018, .. })
        ));
        assert!(matches!(
            resolver.resolve("29 февраля 2018", reference),
            Err(DateParseError::InvalidDate { .. })
        ));

        let err = resolver.resolve("31 апреля 2018", reference).unwrap_err();
        assert_eq!(err.raw(), "31 апреля 2018");
    }

    #[test]
    fn canonical_form_round_trip_examples() {
        let locale = DateLocale::russian();
        assert_eq!(locale.format(ymd(2018, 4, 24)), "24 апрель 2018");
        assert_eq!(locale.parse_canonical("24 апрель 2018"), Some(ymd(2018, 4, 24)));
        assert_eq!(locale.parse_canonical("24 апреля 2018"), None);
        assert_eq!(locale.month_name(0), None);
        assert_eq!(locale.month_name(13), None);
    }

    proptest! {
        #[test]
        fn resolve_round_trips_formatted_dates(days in 0i64..(365 * 60)) {
            let morph = analyzer();
            let locale = DateLocale::russian();
            let resolver = DateResolver::new(&locale, &morph);
            let date = ymd(1990, 1, 1) + chrono::Duration::days(days);
            let reference = ymd(2018, 6, 10);
            prop_assert_eq!(resolver.resolve(&locale.format(date), reference), Ok(date));
        }

        #[test]
        fn yesterday_is_one_day_before(days in 0i64..(365 * 60)) {
            let morph = analyzer();
            let locale = DateLocale::russian();
            let resolver = DateResolver::new(&locale, &morph);
            let reference = ymd(1990, 1, 1) + chrono::Duration::days(days);
            let resolved = resolver.resolve("вчера", reference).unwrap();
            prop_assert_eq!(reference.signed_duration_since(resolved).num_days(), 1);
            prop_assert_eq!(resolver.resolve("сегодня", reference), Ok(reference));
        }
    }
}
