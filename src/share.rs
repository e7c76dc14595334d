//! Human-readable summaries of a comparison, for display and sharing.

use crate::difference::{DifferenceResult, Direction};
use crate::history::HistoryEntry;
use crate::reference::ReferenceTime;
use crate::timestamp::TimestampRecord;

/// `HH:MM:SS`, zero-padded.
pub fn format_clock(hour: u32, minute: u32, second: u32) -> String {
    format!("{:02}:{:02}:{:02}", hour, minute, second)
}

/// The DVR reading as displayed: `DD-MM-YYYY HH:MM:SS` when a date was read.
pub fn format_record(record: &TimestampRecord) -> String {
    let clock = format_clock(record.hour, record.minute, record.second);
    match record.date() {
        Some(date) => format!("{} {}", date.format("%d-%m-%Y"), clock),
        None => clock,
    }
}

/// Where the reference came from, phrased for the user.
pub fn describe_source(reference: &ReferenceTime) -> String {
    if reference.is_local_fallback() {
        "device clock, no time service reachable".to_string()
    } else {
        reference.source.clone()
    }
}

/// One-line outcome, e.g. `DVR clock is AHEAD by 0h 1m 30s`.
pub fn verdict(difference: &DifferenceResult) -> String {
    let magnitude = difference.text.trim_start_matches(['+', '-']).trim();
    match difference.direction {
        Direction::InSync => "DVR clock is in sync".to_string(),
        Direction::Ahead => format!("DVR clock is AHEAD by {}", magnitude),
        Direction::Behind => format!("DVR clock is BEHIND by {}", magnitude),
    }
}

/// Multi-line summary suitable for a share sheet or clipboard.
pub fn share_text(entry: &HistoryEntry) -> String {
    let reference = &entry.reference;
    let mut text = format!(
        "DVR clock check\n\
         DVR time: {}\n\
         Reference time: {} ({})\n\
         Difference: {}\n\
         {}\n\
         Checked at: {}",
        format_record(&entry.record),
        format_clock(reference.hour, reference.minute, reference.second),
        describe_source(reference),
        entry.difference.text,
        verdict(&entry.difference),
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
    );
    if entry.difference.significant {
        text.push_str("\nWarning: clocks are more than 24 hours apart");
    }
    text
}
