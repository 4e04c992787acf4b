//! Heuristic meeting-date extraction.
//!
//! An ordered fallback chain, cheapest first: ISO date, US-style date, then
//! month name + year, applied to the file name before the content prefix.
//! AI-derived dates come later and only ever fill a gap the heuristics left.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

/// Only this many leading characters of content are scanned.
const CONTENT_PREFIX_CHARS: usize = 500;

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
    static ref US_DATE: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap();
    static ref MONTH_NAME_YEAR: Regex = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{4})\b",
    )
    .unwrap();
}

/// Meeting date parts inferred from a file name or content prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedMeetingDate {
    pub date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ParsedMeetingDate {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            month: Some(date.month()),
            year: Some(date.year()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.month.is_none() && self.year.is_none()
    }
}

/// Apply the fallback chain: file name first, then the first
/// [`CONTENT_PREFIX_CHARS`] characters of content. Returns all-`None` if
/// nothing matches.
pub fn parse_meeting_date(file_name: &str, content: Option<&str>) -> ParsedMeetingDate {
    if let Some(parsed) = scan(file_name) {
        return parsed;
    }

    if let Some(content) = content {
        let prefix: String = content.chars().take(CONTENT_PREFIX_CHARS).collect();
        if let Some(parsed) = scan(&prefix) {
            return parsed;
        }
    }

    ParsedMeetingDate::default()
}

/// Try each pattern in order against one piece of text. A match with
/// calendar-invalid values falls through to the next rung.
fn scan(text: &str) -> Option<ParsedMeetingDate> {
    if let Some(caps) = ISO_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            parse_num(&caps[1])?,
            parse_num(&caps[2])?,
            parse_num(&caps[3])?,
        );
        if let Some(date) = date {
            return Some(ParsedMeetingDate::from_date(date));
        }
    }

    if let Some(caps) = US_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            parse_num(&caps[3])?,
            parse_num(&caps[1])?,
            parse_num(&caps[2])?,
        );
        if let Some(date) = date {
            return Some(ParsedMeetingDate::from_date(date));
        }
    }

    if let Some(caps) = MONTH_NAME_YEAR.captures(text) {
        let month = month_number(&caps[1]);
        if let Some(year) = parse_num::<i32>(&caps[2]) {
            // Day unknown; mid-month is close enough for ordering.
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, 15) {
                return Some(ParsedMeetingDate {
                    date: Some(date),
                    month: Some(month),
                    year: Some(year),
                });
            }
        }
    }

    None
}

fn parse_num<T: std::str::FromStr>(s: &str) -> Option<T> {
    s.parse().ok()
}

fn month_number(name: &str) -> u32 {
    match name.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        _ => 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_in_filename() {
        let parsed = parse_meeting_date("2024-03-07 Minutes.pdf", None);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(parsed.month, Some(3));
        assert_eq!(parsed.year, Some(2024));
    }

    #[test]
    fn test_filename_wins_over_content() {
        let parsed = parse_meeting_date(
            "2024-03-07 Minutes.pdf",
            Some("Meeting held on 2022-01-01"),
        );
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn test_us_date_in_filename() {
        let parsed = parse_meeting_date("Minutes 3/7/2024.pdf", None);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn test_month_name_defaults_to_mid_month() {
        let parsed = parse_meeting_date("March 2024 Minutes.pdf", None);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parsed.month, Some(3));
        assert_eq!(parsed.year, Some(2024));
    }

    #[test]
    fn test_content_fallback() {
        let parsed = parse_meeting_date(
            "Minutes.pdf",
            Some("PTA General Meeting\nSeptember 2023\nCall to order"),
        );
        assert_eq!(parsed.month, Some(9));
        assert_eq!(parsed.year, Some(2023));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2023, 9, 15));
    }

    #[test]
    fn test_content_beyond_prefix_ignored() {
        let padding = "x".repeat(600);
        let content = format!("{} 2024-03-07", padding);
        let parsed = parse_meeting_date("Minutes.pdf", Some(&content));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_invalid_calendar_values_fall_through() {
        // The ISO-shaped match is not a real date; the month-name rung
        // should still fire.
        let parsed = parse_meeting_date("2024-13-45 March 2024 Minutes.pdf", None);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_no_match_yields_all_none() {
        let parsed = parse_meeting_date("Minutes.pdf", Some("no dates here"));
        assert!(parsed.is_empty());
    }
}
