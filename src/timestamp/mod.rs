//! Timestamp domain — turns raw OCR text from a DVR overlay into a
//! validated date/time record.
//!
//! External code should only use the types and functions exported here.
//!
//!   - normalize.rs — text cleanup that runs before any pattern matching
//!   - patterns.rs  — the ordered pattern list (matcher + extractor per kind)
//!   - parser.rs    — the "try, validate, return or continue" loop

mod normalize;
mod parser;
mod patterns;

pub use normalize::normalize;
pub use parser::TimeParser;
pub use patterns::PatternKind;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Parsed clock reading from a DVR overlay.
///
/// `day`, `month` and `year` use 0 for "unknown". A record either carries a
/// full calendar date or none at all, with one exception: the colon-date
/// artifact pattern only recovers the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRecord {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl TimestampRecord {
    /// Time-only record (no date fields).
    pub fn time(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            day: 0,
            month: 0,
            year: 0,
        }
    }

    /// The calendar date, when day, month and year are all known.
    pub fn date(&self) -> Option<NaiveDate> {
        if self.day == 0 || self.month == 0 || self.year == 0 {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn has_date(&self) -> bool {
        self.date().is_some()
    }

    pub fn clock(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second)
    }

    pub fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// How to read an ambiguous `NN-NN-YYYY` date.
///
/// A leading 4-digit group always means year-first (ISO) regardless of this
/// setting. There is no locale detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day-first" | "dmy" => Ok(DateOrder::DayFirst),
            "month-first" | "mdy" => Ok(DateOrder::MonthFirst),
            other => Err(format!(
                "Invalid date order: {}. Use 'day-first' or 'month-first'.",
                other
            )),
        }
    }
}

/// Failure to turn OCR text into a [`TimestampRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No pattern matched, or every structural match failed validation.
    #[error("timestamp not recognized, retry capture")]
    NoMatch,
    /// A date-bearing match named a day that does not exist (e.g. 31-04).
    #[error("invalid calendar date {day:02}-{month:02}-{year}")]
    InvalidCalendarDate { day: u32, month: u32, year: i32 },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
}

/// Parse OCR text with the default (day-first) date policy.
pub fn parse(raw_text: &str) -> Result<TimestampRecord, ParseError> {
    TimeParser::new(DateOrder::default()).parse(raw_text)
}
