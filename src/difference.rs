//! Signed offset between a DVR reading and the reference time.
//!
//! Two modes:
//!   - time-only: both sides reduced to seconds since midnight. No day
//!     boundary is known, so 23:59:59 vs 00:00:01 reads as almost -24h.
//!   - full date: the DVR reading carries a calendar date; the reference
//!     uses its own date when known, otherwise today.

use crate::reference::ReferenceTime;
use crate::timestamp::TimestampRecord;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifferenceMode {
    TimeOnly,
    FullDate,
}

/// Where the DVR clock sits relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Ahead,
    Behind,
    InSync,
}

/// Comparison outcome, embedded in every history entry.
///
/// `exact` is true exactly when the offset is zero, and the sign character
/// of `text` always agrees with `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceResult {
    pub mode: DifferenceMode,
    /// DVR minus reference. Positive means the DVR is ahead.
    pub offset_seconds: i64,
    pub offset_ms: i64,
    /// e.g. `+ 0h 1m 30s`, or `- 2d 3h 0m 15s` in full-date mode.
    pub text: String,
    pub exact: bool,
    pub direction: Direction,
    /// More than 24 hours apart; the UI should emphasise it.
    pub significant: bool,
}

/// Compare a DVR reading to the reference, using today's date for a
/// reference without one.
pub fn difference(dvr: &TimestampRecord, reference: &ReferenceTime) -> DifferenceResult {
    difference_on(dvr, reference, Local::now().date_naive())
}

/// [`difference`] with an explicit "today".
pub fn difference_on(
    dvr: &TimestampRecord,
    reference: &ReferenceTime,
    today: NaiveDate,
) -> DifferenceResult {
    let result = match full_date_offset_ms(dvr, reference, today) {
        Some(offset_ms) => build(DifferenceMode::FullDate, offset_ms),
        None => {
            let offset_seconds = dvr.seconds_since_midnight() - reference.seconds_since_midnight();
            build(DifferenceMode::TimeOnly, offset_seconds * 1000)
        }
    };
    log::info!(
        "[DIFF] {:?} mode: {} ({}ms)",
        result.mode,
        result.text,
        result.offset_ms
    );
    result
}

fn full_date_offset_ms(
    dvr: &TimestampRecord,
    reference: &ReferenceTime,
    today: NaiveDate,
) -> Option<i64> {
    let dvr_at = NaiveDateTime::new(dvr.date()?, dvr.clock()?);
    let reference_clock = NaiveTime::from_hms_opt(reference.hour, reference.minute, reference.second)?;
    let reference_at = NaiveDateTime::new(reference.date.unwrap_or(today), reference_clock);
    Some(dvr_at.signed_duration_since(reference_at).num_milliseconds())
}

fn build(mode: DifferenceMode, offset_ms: i64) -> DifferenceResult {
    let sign = if offset_ms >= 0 { '+' } else { '-' };
    let abs_seconds = offset_ms.unsigned_abs() / 1000;
    let hours = abs_seconds / 3600;
    let minutes = (abs_seconds % 3600) / 60;
    let seconds = abs_seconds % 60;

    let text = match mode {
        DifferenceMode::TimeOnly => format!("{} {}h {}m {}s", sign, hours, minutes, seconds),
        DifferenceMode::FullDate => format!(
            "{} {}d {}h {}m {}s",
            sign,
            hours / 24,
            hours % 24,
            minutes,
            seconds
        ),
    };

    let direction = match offset_ms {
        0 => Direction::InSync,
        o if o > 0 => Direction::Ahead,
        _ => Direction::Behind,
    };

    DifferenceResult {
        mode,
        offset_seconds: offset_ms / 1000,
        offset_ms,
        text,
        exact: offset_ms == 0,
        direction,
        significant: offset_ms.abs() > MS_PER_DAY,
    }
}
