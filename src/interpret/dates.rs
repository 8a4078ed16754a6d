//! Date and date-range parsing for history rows
//!
//! Wiki history blocks write ranges like `2013-02-06 – 2014-12-02` or
//! `2014-12-02 – Present`. An open end parses to `None`.

use crate::interpret::clean;
use chrono::NaiveDate;

/// Words that mean "no end date yet"
const OPEN_END_WORDS: &[&str] = &["present", "current", "now", "ongoing", "-", "—", "–"];

/// Accepted date formats, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parses a single date cell; open-end words and unparsable text yield `None`
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = clean(s);
    if t.is_empty() {
        return None;
    }

    let low = t.to_lowercase();
    if OPEN_END_WORDS.contains(&low.as_str()) {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&t, fmt) {
            return Some(d);
        }
    }

    // Tolerate trailing annotations like "2013-02-06 (loan)"
    let first = t.split(' ').next()?;
    NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()
}

/// Splits a date-range cell into (start, end)
///
/// Only en/em dashes or a hyphen surrounded by spaces act as range
/// separators; bare hyphens are part of ISO dates.
pub fn split_range(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let t = clean(text);
    if t.is_empty() {
        return (None, None);
    }

    let split = t
        .split_once('–')
        .or_else(|| t.split_once('—'))
        .or_else(|| t.split_once(" - "));

    match split {
        Some((start, end)) => (parse_date(start), parse_date(end)),
        None => (parse_date(&t), None),
    }
}

/// Whether a range cell explicitly marks an ongoing affiliation
pub fn is_open_ended(text: &str) -> bool {
    let low = text.to_lowercase();
    ["present", "current", "ongoing"]
        .iter()
        .any(|w| low.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2013-02-06"), Some(d("2013-02-06")));
    }

    #[test]
    fn test_parse_long_month_date() {
        assert_eq!(parse_date("February 6, 2013"), Some(d("2013-02-06")));
        assert_eq!(parse_date("Feb 6, 2013"), Some(d("2013-02-06")));
        assert_eq!(parse_date("6 February 2013"), Some(d("2013-02-06")));
    }

    #[test]
    fn test_parse_date_with_annotation() {
        assert_eq!(parse_date("2013-02-06 (loan)"), Some(d("2013-02-06")));
    }

    #[test]
    fn test_open_end_words_parse_to_none() {
        for word in ["Present", "present", "current", "now", "Ongoing", "-", "—"] {
            assert_eq!(parse_date(word), None, "word {word:?}");
        }
    }

    #[test]
    fn test_garbage_parses_to_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("no date here"), None);
    }

    #[test]
    fn test_split_closed_range() {
        let (start, end) = split_range("2013-02-06 – 2014-12-02");
        assert_eq!(start, Some(d("2013-02-06")));
        assert_eq!(end, Some(d("2014-12-02")));
    }

    #[test]
    fn test_split_open_range() {
        let (start, end) = split_range("2014-12-02 – Present");
        assert_eq!(start, Some(d("2014-12-02")));
        assert_eq!(end, None);
    }

    #[test]
    fn test_split_on_spaced_hyphen() {
        let (start, end) = split_range("2013-02-06 - 2014-12-02");
        assert_eq!(start, Some(d("2013-02-06")));
        assert_eq!(end, Some(d("2014-12-02")));
    }

    #[test]
    fn test_bare_hyphens_do_not_split_iso_dates() {
        let (start, end) = split_range("2013-02-06");
        assert_eq!(start, Some(d("2013-02-06")));
        assert_eq!(end, None);
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_range(""), (None, None));
    }

    #[test]
    fn test_is_open_ended() {
        assert!(is_open_ended("2014-12-02 – Present"));
        assert!(is_open_ended("2014-12-02 – current"));
        assert!(!is_open_ended("2013-02-06 – 2014-12-02"));
    }
}
