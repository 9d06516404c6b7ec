// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

const ZONED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Years that can be rendered as an RFC 2822 date
const RENDERABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

enum Pattern {
    Zoned(&'static str),
    DateTime(&'static str),
    Date(&'static str),
}

const PATTERNS: [Pattern; 5] = [
    Pattern::Zoned(ZONED_FORMAT),
    Pattern::Date("%d/%m/%Y"),
    Pattern::Date("%d %b %Y"),
    Pattern::DateTime("%d-%m-%Y %H:%M:%S"),
    Pattern::Date("%Y-%m-%d"),
];

/// Where a publish date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed with the given format pattern
    Pattern(&'static str),
    /// Nothing matched; the current time was used instead
    Fallback,
}

/// A parsed publish date together with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishDate {
    pub at: DateTime<FixedOffset>,
    pub source: DateSource,
}

impl PublishDate {
    pub fn is_fallback(&self) -> bool {
        self.source == DateSource::Fallback
    }
}

/// Parse a provider date string, falling back to now when no pattern fits
///
/// Patterns are tried in a fixed order: RFC 1123 with zone, `DD/MM/YYYY`,
/// `DD Mon YYYY`, `DD-MM-YYYY HH:MM:SS`, `YYYY-MM-DD`. Zone-less values are
/// taken as UTC.
pub fn parse_publish_date(input: Option<&str>) -> PublishDate {
    if let Some(date_str) = input
        && let Some(parsed) = parse_with_patterns(date_str.trim())
    {
        return parsed;
    }

    debug!(date = ?input, "unrecognized publish date, using current time");
    PublishDate {
        at: Utc::now().fixed_offset(),
        source: DateSource::Fallback,
    }
}

fn parse_with_patterns(date_str: &str) -> Option<PublishDate> {
    PATTERNS.iter().find_map(|pattern| {
        let (at, format) = match *pattern {
            Pattern::Zoned(format) => (DateTime::parse_from_str(date_str, format).ok()?, format),
            Pattern::DateTime(format) => {
                let naive = NaiveDateTime::parse_from_str(date_str, format).ok()?;
                (naive.and_utc().fixed_offset(), format)
            }
            Pattern::Date(format) => {
                let naive = NaiveDate::parse_from_str(date_str, format)
                    .ok()?
                    .and_hms_opt(0, 0, 0)?;
                (naive.and_utc().fixed_offset(), format)
            }
        };

        if !RENDERABLE_YEARS.contains(&at.year()) {
            return None;
        }

        Some(PublishDate {
            at,
            source: DateSource::Pattern(format),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_iso_date() {
        let date = parse_publish_date(Some("2023-05-01"));

        assert_eq!(date.source, DateSource::Pattern("%Y-%m-%d"));
        assert_eq!((date.at.year(), date.at.month(), date.at.day()), (2023, 5, 1));
    }

    #[test]
    fn parses_rfc1123_with_zone() {
        let date = parse_publish_date(Some("Mon, 01 May 2023 08:30:00 +0200"));

        assert_eq!(date.source, DateSource::Pattern(ZONED_FORMAT));
        assert_eq!(date.at.hour(), 8);
        assert_eq!(date.at.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn parses_slash_separated_day_first() {
        let date = parse_publish_date(Some("02/03/2024"));

        assert_eq!(date.source, DateSource::Pattern("%d/%m/%Y"));
        assert_eq!((date.at.month(), date.at.day()), (3, 2));
    }

    #[test]
    fn parses_day_month_name_year() {
        let date = parse_publish_date(Some("15 Jan 2024"));

        assert_eq!(date.source, DateSource::Pattern("%d %b %Y"));
        assert_eq!(date.at.month(), 1);
    }

    #[test]
    fn parses_dashed_date_time() {
        let date = parse_publish_date(Some("15-01-2024 21:05:10"));

        assert_eq!(date.source, DateSource::Pattern("%d-%m-%Y %H:%M:%S"));
        assert_eq!((date.at.hour(), date.at.minute(), date.at.second()), (21, 5, 10));
    }

    #[test]
    fn unrecognized_date_falls_back() {
        let date = parse_publish_date(Some("not-a-date"));
        assert!(date.is_fallback());
    }

    #[test]
    fn missing_date_falls_back() {
        assert!(parse_publish_date(None).is_fallback());
    }

    #[test]
    fn out_of_range_years_fall_back() {
        for input in ["-0001-05-01", "12345-05-01", "01/05/+20230"] {
            let date = parse_publish_date(Some(input));
            assert!(date.is_fallback(), "{input} should fall back");
            let _ = date.at.to_rfc2822();
        }
    }
}
