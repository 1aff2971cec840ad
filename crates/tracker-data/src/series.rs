//! Bounded time series for per-hour rate charting.
//!
//! Keeps only the trailing hour of samples relative to the most recent
//! insert. The engine stores and prunes; sampling cadence is the
//! caller's decision.

use chrono::{Duration, NaiveDateTime};
use std::collections::VecDeque;

/// One recorded metric value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub at: NaiveDateTime,
    pub value: u64,
}

/// A rate history pruned to the trailing one-hour window.
#[derive(Debug, Clone, Default)]
pub struct RateSeries {
    samples: VecDeque<Sample>,
}

impl RateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and evict everything older than one hour before it.
    ///
    /// Samples are expected in chronological order; the window is always
    /// measured from the newest insert.
    pub fn push(&mut self, at: NaiveDateTime, value: u64) {
        self.samples.push_back(Sample { at, value });
        let cutoff = at - Duration::hours(1);
        while let Some(front) = self.samples.front() {
            if front.at > cutoff {
                break;
            }
            self.samples.pop_front();
        }
    }

    /// Retained samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
