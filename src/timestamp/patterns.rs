//! Ordered timestamp patterns.
//!
//! Each [`PatternKind`] pairs a matcher (a compiled regex plus an acceptance
//! check for what the regex engine cannot express) with an extractor that
//! builds and validates a [`TimestampRecord`]. The parser walks
//! [`PatternKind::ALL`] in order.

use super::{DateOrder, ParseError, TimestampRecord};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// `DD:DD:DDDD <weekday> HH:MM:SS`: date separators misread as colons.
const COLON_DATE_WEEKDAY: &str = r"(\d{2}):(\d{2}):(\d{4})\s+[a-z]+\s+(\d{2}):(\d{2}):(\d{2})";

/// Date with `-`, `.` or `/` (both separators equal), optional weekday, then time.
const FULL_DATE: &str =
    r"(\d{2,4})([-./])(\d{2})([-./])(\d{2,4})\s+(?:[a-z]+\s+)?(\d{2}):(\d{2})(?::(\d{2}))?";

const TIME_WITH_SECONDS: &str = r"(?:^|\s)(\d{2}):(\d{2}):(\d{2})(?:\s|$)";

/// Rejected afterwards when the next character is a digit.
const TIME_ONLY: &str = r"(?:^|\s)(\d{2}):(\d{2})(?:\s|$)";

static COLON_DATE_WEEKDAY_RE: OnceLock<Regex> = OnceLock::new();
static FULL_DATE_RE: OnceLock<Regex> = OnceLock::new();
static TIME_WITH_SECONDS_RE: OnceLock<Regex> = OnceLock::new();
static TIME_ONLY_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in timestamp pattern must compile"))
}

/// The timestamp shapes a DVR overlay is known to produce, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    ColonDateWeekday,
    FullDate,
    TimeWithSeconds,
    TimeOnly,
}

impl PatternKind {
    pub const ALL: [PatternKind; 4] = [
        PatternKind::ColonDateWeekday,
        PatternKind::FullDate,
        PatternKind::TimeWithSeconds,
        PatternKind::TimeOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::ColonDateWeekday => "colon-date-weekday",
            PatternKind::FullDate => "full-date",
            PatternKind::TimeWithSeconds => "time-with-seconds",
            PatternKind::TimeOnly => "time-only",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            PatternKind::ColonDateWeekday => compiled(&COLON_DATE_WEEKDAY_RE, COLON_DATE_WEEKDAY),
            PatternKind::FullDate => compiled(&FULL_DATE_RE, FULL_DATE),
            PatternKind::TimeWithSeconds => compiled(&TIME_WITH_SECONDS_RE, TIME_WITH_SECONDS),
            PatternKind::TimeOnly => compiled(&TIME_ONLY_RE, TIME_ONLY),
        }
    }

    /// First structural match in normalized text.
    pub(crate) fn find<'t>(self, text: &'t str) -> Option<Captures<'t>> {
        match self {
            // Both date separators must be the same character.
            PatternKind::FullDate => first_accepted(self.regex(), text, |caps| {
                caps.get(2).map(|m| m.as_str()) == caps.get(4).map(|m| m.as_str())
            }),
            // `HH:MM` must not run straight into another digit.
            PatternKind::TimeOnly => first_accepted(self.regex(), text, |caps| {
                caps.get(0)
                    .and_then(|m| text[m.end()..].chars().next())
                    .map_or(true, |c| !c.is_ascii_digit())
            }),
            _ => self.regex().captures(text),
        }
    }

    /// Build a record from a structural match and validate it.
    pub(crate) fn extract(
        self,
        caps: &Captures<'_>,
        order: DateOrder,
    ) -> Result<TimestampRecord, ParseError> {
        let record = match self {
            PatternKind::ColonDateWeekday => TimestampRecord {
                year: field(caps, 3)? as i32,
                ..TimestampRecord::time(field(caps, 4)?, field(caps, 5)?, field(caps, 6)?)
            },
            PatternKind::FullDate => {
                let first = group(caps, 1)?;
                let middle = field(caps, 3)?;
                let last = group(caps, 5)?;
                let (day, month, year) = if first.len() == 4 {
                    (two_digits(last)?, middle, number(first)? as i32)
                } else {
                    let year = normalize_year(last)?;
                    match order {
                        DateOrder::DayFirst => (two_digits(first)?, middle, year),
                        DateOrder::MonthFirst => (middle, two_digits(first)?, year),
                    }
                };
                let second = match caps.get(8) {
                    Some(m) => number(m.as_str())?,
                    None => 0,
                };
                let record = TimestampRecord {
                    day,
                    month,
                    year,
                    ..TimestampRecord::time(field(caps, 6)?, field(caps, 7)?, second)
                };
                validate_date(&record)?;
                record
            }
            PatternKind::TimeWithSeconds => {
                TimestampRecord::time(field(caps, 1)?, field(caps, 2)?, field(caps, 3)?)
            }
            PatternKind::TimeOnly => TimestampRecord::time(field(caps, 1)?, field(caps, 2)?, 0),
        };

        validate_clock(&record)?;
        Ok(record)
    }
}

/// Like `Regex::captures`, but keeps scanning from the next start position
/// until `accept` agrees. Overlapping candidates are considered.
fn first_accepted<'t>(
    re: &Regex,
    text: &'t str,
    accept: impl Fn(&Captures<'t>) -> bool,
) -> Option<Captures<'t>> {
    let mut start = 0;
    while start <= text.len() {
        let caps = re.captures_at(text, start)?;
        if accept(&caps) {
            return Some(caps);
        }
        let begin = caps.get(0)?.start();
        start = begin + text[begin..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> Result<&'t str, ParseError> {
    caps.get(index).map(|m| m.as_str()).ok_or(ParseError::NoMatch)
}

fn number(digits: &str) -> Result<u32, ParseError> {
    digits.parse().map_err(|_| ParseError::NoMatch)
}

fn field(caps: &Captures<'_>, index: usize) -> Result<u32, ParseError> {
    number(group(caps, index)?)
}

/// Day and month groups are exactly two digits.
fn two_digits(digits: &str) -> Result<u32, ParseError> {
    if digits.len() != 2 {
        return Err(ParseError::NoMatch);
    }
    number(digits)
}

/// Two-digit years are read as 20YY. Any length other than 2 or 4 is rejected.
fn normalize_year(digits: &str) -> Result<i32, ParseError> {
    let value = number(digits)? as i32;
    match digits.len() {
        2 => Ok(2000 + value),
        4 => Ok(value),
        _ => Err(ParseError::NoMatch),
    }
}

fn validate_clock(record: &TimestampRecord) -> Result<(), ParseError> {
    for (field, value, limit) in [
        ("hour", record.hour, 24),
        ("minute", record.minute, 60),
        ("second", record.second, 60),
    ] {
        if value >= limit {
            return Err(ParseError::OutOfRange { field, value });
        }
    }
    Ok(())
}

/// The date must exist as written: 31-04 is rejected, never rolled into May.
fn validate_date(record: &TimestampRecord) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidCalendarDate {
        day: record.day,
        month: record.month,
        year: record.year,
    };
    if record.year == 0 {
        return Err(invalid);
    }
    match NaiveDate::from_ymd_opt(record.year, record.month, record.day) {
        Some(_) => Ok(()),
        None => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(kind: PatternKind, text: &str) -> Option<Result<TimestampRecord, ParseError>> {
        kind.find(text).map(|caps| kind.extract(&caps, DateOrder::DayFirst))
    }

    #[test]
    fn full_date_requires_matching_separators() {
        assert!(PatternKind::FullDate.find("01-01/2023 14:30").is_none());
        assert!(PatternKind::FullDate.find("01/01/2023 14:30").is_some());
    }

    #[test]
    fn full_date_skips_mixed_candidate_for_later_one() {
        let caps = PatternKind::FullDate
            .find("01-01/2023 14:30 02.03.2024 10:00")
            .unwrap();
        assert_eq!(&caps[0], "02.03.2024 10:00");
    }

    #[test]
    fn time_only_rejects_trailing_digit() {
        assert!(PatternKind::TimeOnly.find("14:30 5").is_none());
        let caps = PatternKind::TimeOnly.find("14:30 5 16:45").unwrap();
        assert_eq!(&caps[1], "16");
    }

    #[test]
    fn time_only_does_not_split_seconds_or_years() {
        assert!(PatternKind::TimeOnly.find("14:30:45").is_none());
        assert!(PatternKind::TimeOnly.find("14:30:2023").is_none());
        assert!(PatternKind::TimeWithSeconds.find("14:30:2023").is_none());
    }

    #[test]
    fn time_with_seconds_needs_token_boundaries() {
        assert!(PatternKind::TimeWithSeconds.find("114:30:45").is_none());
        assert!(PatternKind::TimeWithSeconds.find("cam1 14:30:45").is_some());
    }

    #[test]
    fn iso_date_is_year_first() {
        let r = extract(PatternKind::FullDate, "2023-02-28 09:05:07").unwrap().unwrap();
        assert_eq!((r.year, r.month, r.day), (2023, 2, 28));
        assert_eq!((r.hour, r.minute, r.second), (9, 5, 7));
    }

    #[test]
    fn odd_length_date_groups_are_rejected() {
        assert_eq!(
            extract(PatternKind::FullDate, "01-01-202 14:30"),
            Some(Err(ParseError::NoMatch))
        );
        assert_eq!(
            extract(PatternKind::FullDate, "2024-01-011 10:00"),
            Some(Err(ParseError::NoMatch))
        );
        assert_eq!(
            extract(PatternKind::FullDate, "001-01-2024 10:00"),
            Some(Err(ParseError::NoMatch))
        );
    }

    #[test]
    fn two_digit_year_becomes_2000s() {
        let r = extract(PatternKind::FullDate, "05.06.24 23:59").unwrap().unwrap();
        assert_eq!((r.day, r.month, r.year, r.second), (5, 6, 2024, 0));
    }

    #[test]
    fn month_first_policy_swaps_leading_groups() {
        let caps = PatternKind::FullDate.find("02/03/2024 10:00").unwrap();
        let r = PatternKind::FullDate.extract(&caps, DateOrder::MonthFirst).unwrap();
        assert_eq!((r.month, r.day), (2, 3));
    }

    #[test]
    fn month_first_policy_ignored_for_iso() {
        let caps = PatternKind::FullDate.find("2024-02-03 10:00").unwrap();
        let r = PatternKind::FullDate.extract(&caps, DateOrder::MonthFirst).unwrap();
        assert_eq!((r.year, r.month, r.day), (2024, 2, 3));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert_eq!(
            extract(PatternKind::FullDate, "31-04-2023 10:00"),
            Some(Err(ParseError::InvalidCalendarDate { day: 31, month: 4, year: 2023 }))
        );
        assert!(matches!(
            extract(PatternKind::FullDate, "29-02-2023 10:00"),
            Some(Err(ParseError::InvalidCalendarDate { .. }))
        ));
        assert!(extract(PatternKind::FullDate, "29-02-2024 10:00").unwrap().is_ok());
    }

    #[test]
    fn clock_ranges_are_enforced() {
        assert_eq!(
            extract(PatternKind::TimeOnly, "99:10"),
            Some(Err(ParseError::OutOfRange { field: "hour", value: 99 }))
        );
        assert_eq!(
            extract(PatternKind::TimeWithSeconds, "10:10:60"),
            Some(Err(ParseError::OutOfRange { field: "second", value: 60 }))
        );
    }

    #[test]
    fn colon_date_keeps_only_year() {
        let r = extract(PatternKind::ColonDateWeekday, "01:01:2023 fri 14:30:45")
            .unwrap()
            .unwrap();
        assert_eq!((r.day, r.month, r.year), (0, 0, 2023));
    }
}
