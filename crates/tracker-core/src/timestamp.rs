//! Timestamp correlation for `HH:MM`-prefixed log lines.
//!
//! The log interleaves absolute section markers (full date and time)
//! with lines that carry only an `HH:MM` prefix. The correlator keeps
//! the most recent marker as an anchor and resolves each line time
//! against it, including the midnight-rollover correction.

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use tracing::warn;

/// Resolves relative `HH:MM` line times against the rolling section anchor.
pub struct TimestampCorrelator {
    /// Date and time of the most recent section marker, if any.
    anchor: Option<NaiveDateTime>,
    time_prefix: Regex,
}

impl Default for TimestampCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampCorrelator {
    pub fn new() -> Self {
        Self {
            anchor: None,
            time_prefix: Regex::new(r"^(\d{2}):(\d{2})").expect("regex is valid"),
        }
    }

    /// Record a new section anchor from a marker line.
    pub fn observe_marker(&mut self, marker: NaiveDateTime) {
        self.anchor = Some(marker);
    }

    /// The current anchor, if a section marker has been seen.
    pub fn anchor(&self) -> Option<NaiveDateTime> {
        self.anchor
    }

    /// Forget the anchor. Used when replaying the file from the start.
    pub fn reset(&mut self) {
        self.anchor = None;
    }

    /// Resolve the absolute timestamp of `line`, seconds = 0.
    ///
    /// Returns `None` when no anchor has been seen yet, when the line has
    /// no `HH:MM` prefix, or when the time components are out of range
    /// (reported per line, never fatal).
    ///
    /// Rollover rule: an anchor written in hour 0 paired with a line in
    /// hour 23 means the line was recorded just before midnight, so it is
    /// attributed to the previous calendar day.
    pub fn resolve(&self, line: &str) -> Option<NaiveDateTime> {
        let anchor = self.anchor?;
        let caps = self.time_prefix.captures(line.trim_start())?;

        // Two-digit captures always parse; range checking happens below.
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;

        let date = if anchor.hour() == 0 && hour == 23 {
            anchor.date().pred_opt()?
        } else {
            anchor.date()
        };

        match date.and_hms_opt(hour, minute, 0) {
            Some(ts) => Some(ts),
            None => {
                warn!(
                    "invalid time components {:02}:{:02} in line \"{}\"",
                    hour,
                    minute,
                    line.trim()
                );
                None
            }
        }
    }
}
