//! Half-open time spans `[start, end)`.
//!
//! Two spans intersect iff `a.start < b.end && a.end > b.start`, so spans
//! that merely touch at an endpoint never conflict.

use chrono::{DateTime, Utc};

use crate::models::{AvailabilityWindow, BookableInterval, Meeting};

/// Anything occupying a half-open span of time
pub trait Interval {
    fn start(&self) -> DateTime<Utc>;
    fn end(&self) -> DateTime<Utc>;

    /// `start < end`
    #[inline]
    fn is_valid(&self) -> bool {
        self.start() < self.end()
    }

    #[inline]
    fn overlaps<I: Interval + ?Sized>(&self, other: &I) -> bool {
        self.start() < other.end() && self.end() > other.start()
    }

    /// True when `other` lies entirely inside `self`
    #[inline]
    fn covers<I: Interval + ?Sized>(&self, other: &I) -> bool {
        self.start() <= other.start() && self.end() >= other.end()
    }
}

impl Interval for BookableInterval {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Interval for AvailabilityWindow {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Interval for Meeting {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl BookableInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn of<I: Interval + ?Sized>(span: &I) -> Self {
        Self::new(span.start(), span.end())
    }
}

/// Sort spans and coalesce those that overlap or touch.
///
/// Zero-length and inverted spans are dropped. The result is sorted by start
/// and pairwise disjoint, so both starts and ends are increasing.
pub fn merge_spans<I, T>(spans: I) -> Vec<BookableInterval>
where
    I: IntoIterator<Item = T>,
    T: Interval,
{
    let mut sorted: Vec<BookableInterval> = spans
        .into_iter()
        .filter(|s| s.is_valid())
        .map(|s| BookableInterval::of(&s))
        .collect();

    sorted.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<BookableInterval> = Vec::with_capacity(sorted.len());
    for span in sorted {
        if let Some(last) = merged.last_mut() {
            if span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }

    merged
}
