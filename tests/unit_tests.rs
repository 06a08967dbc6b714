// Unit tests for Nanny Hub scheduling rules

use chrono::{DateTime, TimeZone, Utc};
use nanny_hub::core::{
    bookable_intervals, merge_overlapping, merge_spans, Interval, Reconciliation,
};
use nanny_hub::models::{AvailabilityWindow, BookableInterval, Meeting, MeetingStatus};
use uuid::Uuid;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
}

fn span(from: (u32, u32), to: (u32, u32)) -> BookableInterval {
    BookableInterval::new(at(from.0, from.1), at(to.0, to.1))
}

fn window(babysitter_id: Uuid, from: (u32, u32), to: (u32, u32)) -> AvailabilityWindow {
    AvailabilityWindow {
        id: Uuid::new_v4(),
        babysitter_id,
        start: at(from.0, from.1),
        end: at(to.0, to.1),
    }
}

fn meeting(babysitter_id: Uuid, from: (u32, u32), to: (u32, u32), status: MeetingStatus) -> Meeting {
    let mut m = Meeting::pending(babysitter_id, Uuid::new_v4(), at(from.0, from.1), at(to.0, to.1));
    m.status = status;
    m
}

#[test]
fn test_half_open_overlap() {
    let a = span((9, 0), (10, 0));

    assert!(a.overlaps(&span((9, 30), (10, 30))));
    assert!(a.overlaps(&span((8, 0), (12, 0))));
    assert!(!a.overlaps(&span((10, 0), (11, 0))));
    assert!(!a.overlaps(&span((8, 0), (9, 0))));
}

#[test]
fn test_meeting_in_the_middle_splits_window() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (17, 0))];
    let meetings = vec![meeting(b, (12, 0), (13, 0), MeetingStatus::Approved)];

    assert_eq!(
        bookable_intervals(&windows, &meetings),
        vec![span((9, 0), (12, 0)), span((13, 0), (17, 0))]
    );
}

#[test]
fn test_meeting_at_window_start() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (17, 0))];
    let meetings = vec![meeting(b, (9, 0), (11, 0), MeetingStatus::Approved)];

    assert_eq!(bookable_intervals(&windows, &meetings), vec![span((11, 0), (17, 0))]);
}

#[test]
fn test_no_meetings_leaves_windows_unchanged() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (12, 0)), window(b, (14, 0), (18, 0))];

    assert_eq!(
        bookable_intervals(&windows, &[]),
        vec![span((9, 0), (12, 0)), span((14, 0), (18, 0))]
    );
}

#[test]
fn test_several_meetings_cut_one_window() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (8, 0), (18, 0))];
    let meetings = vec![
        meeting(b, (15, 0), (16, 0), MeetingStatus::Approved),
        meeting(b, (9, 0), (10, 0), MeetingStatus::Approved),
        meeting(b, (12, 0), (12, 30), MeetingStatus::Approved),
    ];

    assert_eq!(
        bookable_intervals(&windows, &meetings),
        vec![
            span((8, 0), (9, 0)),
            span((10, 0), (12, 0)),
            span((12, 30), (15, 0)),
            span((16, 0), (18, 0)),
        ]
    );
}

#[test]
fn test_touching_meetings_do_not_cut() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (12, 0))];
    let meetings = vec![
        meeting(b, (8, 0), (9, 0), MeetingStatus::Approved),
        meeting(b, (12, 0), (13, 0), MeetingStatus::Approved),
    ];

    assert_eq!(bookable_intervals(&windows, &meetings), vec![span((9, 0), (12, 0))]);
}

#[test]
fn test_back_to_back_meetings_leave_no_sliver() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (12, 0))];
    let meetings = vec![
        meeting(b, (10, 0), (10, 30), MeetingStatus::Approved),
        meeting(b, (10, 30), (11, 0), MeetingStatus::Approved),
    ];

    assert_eq!(
        bookable_intervals(&windows, &meetings),
        vec![span((9, 0), (10, 0)), span((11, 0), (12, 0))]
    );
}

#[test]
fn test_pending_and_declined_meetings_are_ignored() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (17, 0))];
    let meetings = vec![
        meeting(b, (10, 0), (11, 0), MeetingStatus::Pending),
        meeting(b, (13, 0), (14, 0), MeetingStatus::Declined),
    ];

    assert_eq!(bookable_intervals(&windows, &meetings), vec![span((9, 0), (17, 0))]);
}

#[test]
fn test_fully_booked_window_yields_nothing() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (10, 0))];
    let meetings = vec![meeting(b, (8, 0), (11, 0), MeetingStatus::Approved)];

    assert!(bookable_intervals(&windows, &meetings).is_empty());
}

#[test]
fn test_output_follows_window_order() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (14, 0), (16, 0)), window(b, (9, 0), (10, 0))];

    assert_eq!(
        bookable_intervals(&windows, &[]),
        vec![span((14, 0), (16, 0)), span((9, 0), (10, 0))]
    );
}

#[test]
fn test_overlapping_windows_are_kept_unless_merged() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (12, 0)), window(b, (11, 0), (14, 0))];
    let meetings = vec![meeting(b, (11, 30), (12, 30), MeetingStatus::Approved)];

    let raw = bookable_intervals(&windows, &meetings);
    assert_eq!(
        raw,
        vec![
            span((9, 0), (11, 30)),
            span((11, 0), (11, 30)),
            span((12, 30), (14, 0)),
        ]
    );

    let merged = merge_overlapping(raw);
    assert_eq!(merged, vec![span((9, 0), (11, 30)), span((12, 30), (14, 0))]);
}

#[test]
fn test_reconciliation_is_restartable() {
    let b = Uuid::new_v4();
    let windows = vec![window(b, (9, 0), (17, 0)), window(b, (18, 0), (20, 0))];
    let meetings = vec![meeting(b, (12, 0), (13, 0), MeetingStatus::Approved)];

    let reconciliation = Reconciliation::new(&windows, &meetings);
    let first: Vec<_> = reconciliation.iter().collect();
    let second: Vec<_> = (&reconciliation).into_iter().collect();
    assert_eq!(first, second);

    let mut iter = reconciliation.iter();
    assert_eq!(iter.next(), Some(span((9, 0), (12, 0))));
    let replay: Vec<_> = iter.clone().collect();
    let rest: Vec<_> = iter.collect();
    assert_eq!(replay, rest);
    assert_eq!(rest, vec![span((13, 0), (17, 0)), span((18, 0), (20, 0))]);
}

#[test]
fn test_merge_spans_drops_degenerate() {
    let merged = merge_spans(vec![
        span((10, 0), (10, 0)),
        span((12, 0), (11, 0)),
        span((9, 0), (9, 30)),
    ]);

    assert_eq!(merged, vec![span((9, 0), (9, 30))]);
}
