//! Availability reconciliation.
//!
//! Projects a babysitter's declared windows minus their approved meetings
//! into the spans a family can still book. Nothing here writes; every call
//! works from the rows it is handed.

use std::rc::Rc;

use crate::core::interval::{merge_spans, Interval};
use crate::models::{AvailabilityWindow, BookableInterval, Meeting};

/// Bookable time of one babysitter, computed lazily from a snapshot.
///
/// Each call to [`Reconciliation::iter`] starts a fresh pass over the
/// windows, so the sequence can be replayed any number of times.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    windows: &'a [AvailabilityWindow],
    busy: Rc<[BookableInterval]>,
}

impl<'a> Reconciliation<'a> {
    /// Only approved meetings occupy time; pending and declined ones are ignored.
    pub fn new(windows: &'a [AvailabilityWindow], meetings: &[Meeting]) -> Self {
        let busy = merge_spans(meetings.iter().filter(|m| m.is_approved()).cloned());

        Self {
            windows,
            busy: busy.into(),
        }
    }

    pub fn iter(&self) -> BookableIntervals<'a> {
        BookableIntervals {
            windows: self.windows.iter(),
            busy: Rc::clone(&self.busy),
            current: Vec::new().into_iter(),
        }
    }
}

impl<'a> IntoIterator for &Reconciliation<'a> {
    type Item = BookableInterval;
    type IntoIter = BookableIntervals<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over bookable intervals, window by window in input order
#[derive(Debug, Clone)]
pub struct BookableIntervals<'a> {
    windows: std::slice::Iter<'a, AvailabilityWindow>,
    busy: Rc<[BookableInterval]>,
    current: std::vec::IntoIter<BookableInterval>,
}

impl Iterator for BookableIntervals<'_> {
    type Item = BookableInterval;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(interval) = self.current.next() {
                return Some(interval);
            }
            let window = self.windows.next()?;
            self.current = subtract_busy(window, &self.busy).into_iter();
        }
    }
}

/// Free parts of one window given merged, sorted busy spans.
///
/// A window is cut by every busy span that intersects it, so it may yield
/// zero, one or several pieces. Pieces come out in chronological order and
/// are never zero-length.
pub fn subtract_busy<W: Interval + ?Sized>(window: &W, busy: &[BookableInterval]) -> Vec<BookableInterval> {
    let (start, end) = (window.start(), window.end());
    if start >= end {
        return Vec::new();
    }

    // busy is disjoint and sorted, so ends are sorted too
    let first = busy.partition_point(|b| b.end <= start);

    let mut free = Vec::new();
    let mut cursor = start;
    for block in busy[first..].iter().take_while(|b| b.start < end) {
        if cursor < block.start {
            free.push(BookableInterval::new(cursor, block.start));
        }
        cursor = cursor.max(block.end);
    }

    if cursor < end {
        free.push(BookableInterval::new(cursor, end));
    }

    free
}

/// Reconcile a snapshot into an owned list
pub fn bookable_intervals(windows: &[AvailabilityWindow], meetings: &[Meeting]) -> Vec<BookableInterval> {
    Reconciliation::new(windows, meetings).iter().collect()
}

/// Coalesce duplicate free time coming from overlapping windows
pub fn merge_overlapping<I>(intervals: I) -> Vec<BookableInterval>
where
    I: IntoIterator<Item = BookableInterval>,
{
    merge_spans(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeetingStatus;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn window(sitter: Uuid, sh: u32, eh: u32) -> AvailabilityWindow {
        AvailabilityWindow {
            id: Uuid::new_v4(),
            babysitter_id: sitter,
            start: at(sh, 0),
            end: at(eh, 0),
        }
    }

    fn meeting(sitter: Uuid, start: DateTime<Utc>, end: DateTime<Utc>, status: MeetingStatus) -> Meeting {
        let mut m = Meeting::pending(sitter, Uuid::new_v4(), start, end);
        m.status = status;
        m
    }

    #[test]
    fn test_mid_window_meeting_splits_window() {
        let sitter = Uuid::new_v4();
        let windows = vec![window(sitter, 9, 17)];
        let meetings = vec![meeting(sitter, at(12, 0), at(13, 0), MeetingStatus::Approved)];

        let result = bookable_intervals(&windows, &meetings);

        assert_eq!(
            result,
            vec![
                BookableInterval::new(at(9, 0), at(12, 0)),
                BookableInterval::new(at(13, 0), at(17, 0)),
            ]
        );
    }

    #[test]
    fn test_meeting_at_window_start() {
        let sitter = Uuid::new_v4();
        let windows = vec![window(sitter, 9, 17)];
        let meetings = vec![meeting(sitter, at(9, 0), at(11, 0), MeetingStatus::Approved)];

        assert_eq!(
            bookable_intervals(&windows, &meetings),
            vec![BookableInterval::new(at(11, 0), at(17, 0))]
        );
    }

    #[test]
    fn test_meeting_covering_whole_window_leaves_nothing() {
        let sitter = Uuid::new_v4();
        let windows = vec![window(sitter, 10, 12)];
        let meetings = vec![meeting(sitter, at(9, 0), at(13, 0), MeetingStatus::Approved)];

        assert!(bookable_intervals(&windows, &meetings).is_empty());
    }

    #[test]
    fn test_pending_and_declined_meetings_ignored() {
        let sitter = Uuid::new_v4();
        let windows = vec![window(sitter, 9, 17)];
        let meetings = vec![
            meeting(sitter, at(10, 0), at(11, 0), MeetingStatus::Pending),
            meeting(sitter, at(14, 0), at(15, 0), MeetingStatus::Declined),
        ];

        assert_eq!(
            bookable_intervals(&windows, &meetings),
            vec![BookableInterval::new(at(9, 0), at(17, 0))]
        );
    }

    #[test]
    fn test_subtract_busy_skips_spans_before_window() {
        let busy = vec![
            BookableInterval::new(at(6, 0), at(7, 0)),
            BookableInterval::new(at(9, 30), at(10, 0)),
        ];
        let w = BookableInterval::new(at(9, 0), at(11, 0));

        assert_eq!(
            subtract_busy(&w, &busy),
            vec![
                BookableInterval::new(at(9, 0), at(9, 30)),
                BookableInterval::new(at(10, 0), at(11, 0)),
            ]
        );
    }

    #[test]
    fn test_cloned_iterator_replays_from_same_point() {
        let sitter = Uuid::new_v4();
        let windows = vec![window(sitter, 9, 12), window(sitter, 14, 16)];
        let meetings = vec![meeting(sitter, at(10, 0), at(11, 0), MeetingStatus::Approved)];
        let reconciliation = Reconciliation::new(&windows, &meetings);

        let mut iter = reconciliation.iter();
        iter.next();
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, iter.collect::<Vec<_>>());
        assert_eq!(reconciliation.iter().count(), 3);
    }
}
