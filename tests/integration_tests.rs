// Integration tests for Nanny Hub: booking flows through the scheduling core

use actix_web::{http::StatusCode, test as actix_test, App};
use chrono::{DateTime, TimeZone, Utc};
use nanny_hub::core::access::{ensure, is_meeting_target, is_request_target, owns_window};
use nanny_hub::core::{
    answer_meeting, bookable_intervals, can_open_request, is_approved, request_meeting,
    BookingSnapshot, Conflict, MeetingRequest, Role, ScheduleError,
};
use nanny_hub::models::{
    AvailabilityWindow, BookableInterval, ConnectionRequest, ErrorResponse, Meeting, MeetingStatus,
    RequestStatus,
};
use nanny_hub::routes::{configure_routes, identity::USER_ID_HEADER};
use uuid::Uuid;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
}

fn connection(babysitter_id: Uuid, family_id: Uuid, status: RequestStatus, is_active: bool) -> ConnectionRequest {
    let now = Utc::now();
    ConnectionRequest {
        id: Uuid::new_v4(),
        babysitter_id,
        family_id,
        status,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

fn window(babysitter_id: Uuid, from: (u32, u32), to: (u32, u32)) -> AvailabilityWindow {
    AvailabilityWindow {
        id: Uuid::new_v4(),
        babysitter_id,
        start: at(from.0, from.1),
        end: at(to.0, to.1),
    }
}

fn ask(babysitter_id: Uuid, family_id: Uuid, from: (u32, u32), to: (u32, u32)) -> MeetingRequest {
    MeetingRequest {
        family_id,
        babysitter_id,
        start: at(from.0, from.1),
        end: at(to.0, to.1),
    }
}

struct Pair {
    babysitter_id: Uuid,
    family_id: Uuid,
    connections: Vec<ConnectionRequest>,
    windows: Vec<AvailabilityWindow>,
    meetings: Vec<Meeting>,
}

impl Pair {
    fn connected() -> Self {
        let babysitter_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();
        Pair {
            babysitter_id,
            family_id,
            connections: vec![connection(babysitter_id, family_id, RequestStatus::Approved, true)],
            windows: vec![window(babysitter_id, (9, 0), (17, 0))],
            meetings: Vec::new(),
        }
    }

    fn snapshot(&self) -> BookingSnapshot<'_> {
        BookingSnapshot {
            connections: &self.connections,
            windows: &self.windows,
            meetings: &self.meetings,
        }
    }

    fn book(&self, from: (u32, u32), to: (u32, u32)) -> Result<Meeting, ScheduleError> {
        request_meeting(&ask(self.babysitter_id, self.family_id, from, to), &self.snapshot())
    }
}

#[test]
fn test_integration_book_approve_and_reconcile() {
    let mut pair = Pair::connected();

    let meeting = pair.book((12, 0), (13, 0)).unwrap();
    assert_eq!(meeting.status, MeetingStatus::Pending);
    assert_eq!(meeting.babysitter_id, pair.babysitter_id);
    assert_eq!(meeting.family_id, pair.family_id);
    pair.meetings.push(meeting);

    // A pending meeting does not occupy time yet
    assert_eq!(
        bookable_intervals(&pair.windows, &pair.meetings),
        vec![BookableInterval::new(at(9, 0), at(17, 0))]
    );

    let status = answer_meeting(&pair.meetings[0], MeetingStatus::Approved, &pair.meetings).unwrap();
    pair.meetings[0].status = status;

    assert_eq!(
        bookable_intervals(&pair.windows, &pair.meetings),
        vec![
            BookableInterval::new(at(9, 0), at(12, 0)),
            BookableInterval::new(at(13, 0), at(17, 0)),
        ]
    );

    // The approved hour is now busy, its neighbours are not
    assert_eq!(pair.book((12, 30), (13, 30)), Err(ScheduleError::Conflict(Conflict::Busy)));
    assert!(pair.book((13, 0), (14, 0)).is_ok());
    assert!(pair.book((11, 0), (12, 0)).is_ok());
}

#[test]
fn test_integration_inverted_interval_rejected() {
    let pair = Pair::connected();
    assert_eq!(pair.book((14, 0), (13, 0)), Err(ScheduleError::invalid_interval()));
    assert_eq!(pair.book((14, 0), (14, 0)), Err(ScheduleError::invalid_interval()));
}

#[test]
fn test_integration_requires_approved_connection() {
    let mut pair = Pair::connected();

    pair.connections = vec![];
    assert!(matches!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Authorization(_))));

    pair.connections = vec![connection(pair.babysitter_id, pair.family_id, RequestStatus::Pending, true)];
    assert!(matches!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Authorization(_))));

    pair.connections = vec![connection(pair.babysitter_id, pair.family_id, RequestStatus::Approved, false)];
    assert!(matches!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Authorization(_))));

    // An approval for a different family does not count
    pair.connections = vec![connection(pair.babysitter_id, Uuid::new_v4(), RequestStatus::Approved, true)];
    assert!(matches!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Authorization(_))));
}

#[test]
fn test_integration_outside_availability() {
    let mut pair = Pair::connected();
    pair.windows = vec![window(pair.babysitter_id, (9, 0), (10, 0))];

    assert_eq!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Conflict(Conflict::NotAvailable)));
}

#[test]
fn test_integration_span_across_two_windows_is_not_available() {
    let mut pair = Pair::connected();
    pair.windows = vec![
        window(pair.babysitter_id, (9, 0), (10, 0)),
        window(pair.babysitter_id, (10, 0), (11, 0)),
    ];

    assert_eq!(pair.book((9, 30), (10, 30)), Err(ScheduleError::Conflict(Conflict::NotAvailable)));
    assert!(pair.book((9, 0), (10, 0)).is_ok());
}

#[test]
fn test_integration_busy_only_when_approved() {
    let mut pair = Pair::connected();
    let mut existing = Meeting::pending(pair.babysitter_id, Uuid::new_v4(), at(10, 30), at(10, 45));
    existing.status = MeetingStatus::Approved;
    pair.meetings = vec![existing];

    assert_eq!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Conflict(Conflict::Busy)));

    pair.meetings[0].status = MeetingStatus::Declined;
    let meeting = pair.book((10, 0), (11, 0)).unwrap();
    assert_eq!(meeting.status, MeetingStatus::Pending);
}

#[test]
fn test_integration_check_order() {
    // Every check would fail; each fix exposes the next one in line
    let mut pair = Pair::connected();
    pair.connections.clear();
    pair.windows = vec![window(pair.babysitter_id, (9, 0), (10, 0))];
    let mut existing = Meeting::pending(pair.babysitter_id, Uuid::new_v4(), at(10, 0), at(11, 0));
    existing.status = MeetingStatus::Approved;
    pair.meetings = vec![existing];

    assert!(matches!(pair.book((11, 0), (10, 0)), Err(ScheduleError::Validation(_))));
    assert!(matches!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Authorization(_))));

    pair.connections = vec![connection(pair.babysitter_id, pair.family_id, RequestStatus::Approved, true)];
    assert_eq!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Conflict(Conflict::NotAvailable)));

    pair.windows = vec![window(pair.babysitter_id, (9, 0), (12, 0))];
    assert_eq!(pair.book((10, 0), (11, 0)), Err(ScheduleError::Conflict(Conflict::Busy)));
}

#[test]
fn test_integration_second_approval_is_busy() {
    let mut pair = Pair::connected();
    let first = pair.book((10, 0), (11, 0)).unwrap();
    let second = pair.book((10, 30), (11, 30)).unwrap();
    pair.meetings = vec![first, second];

    pair.meetings[0].status =
        answer_meeting(&pair.meetings[0], MeetingStatus::Approved, &pair.meetings).unwrap();

    assert_eq!(
        answer_meeting(&pair.meetings[1], MeetingStatus::Approved, &pair.meetings),
        Err(ScheduleError::Conflict(Conflict::Busy))
    );
    // Declining the loser is still allowed
    assert_eq!(
        answer_meeting(&pair.meetings[1], MeetingStatus::Declined, &pair.meetings),
        Ok(MeetingStatus::Declined)
    );
}

#[test]
fn test_integration_answered_meetings_are_final() {
    let mut pair = Pair::connected();
    let mut meeting = pair.book((10, 0), (11, 0)).unwrap();
    meeting.status = MeetingStatus::Declined;
    pair.meetings = vec![meeting];

    assert!(matches!(
        answer_meeting(&pair.meetings[0], MeetingStatus::Approved, &pair.meetings),
        Err(ScheduleError::InvalidTransition { .. })
    ));
}

#[test]
fn test_integration_only_target_babysitter_answers() {
    let pair = Pair::connected();
    let meeting = pair.book((10, 0), (11, 0)).unwrap();

    assert!(is_meeting_target(&Role::Babysitter(pair.babysitter_id), &meeting));
    assert!(!is_meeting_target(&Role::Babysitter(Uuid::new_v4()), &meeting));
    assert!(!is_meeting_target(&Role::Parent(pair.family_id), &meeting));

    let request = &pair.connections[0];
    assert!(is_request_target(&Role::Babysitter(pair.babysitter_id), request));
    assert!(ensure(is_request_target(&Role::Parent(pair.family_id), request), "request").is_err());

    let own = &pair.windows[0];
    assert!(owns_window(&Role::Babysitter(pair.babysitter_id), own));
    assert!(!owns_window(&Role::Babysitter(Uuid::new_v4()), own));
}

#[test]
fn test_integration_duplicate_request_rejected_even_if_declined() {
    let babysitter_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();

    assert!(can_open_request(&[], babysitter_id, family_id));

    for (status, active) in [
        (RequestStatus::Pending, true),
        (RequestStatus::Declined, true),
        (RequestStatus::Approved, false),
    ] {
        let existing = vec![connection(babysitter_id, family_id, status, active)];
        assert!(!can_open_request(&existing, babysitter_id, family_id));
        assert!(can_open_request(&existing, Uuid::new_v4(), family_id));
    }
}

#[test]
fn test_integration_gate_is_a_plain_predicate() {
    let b = Uuid::new_v4();
    let f = Uuid::new_v4();

    assert!(!is_approved(&[], b, f));
    assert!(is_approved(&[connection(b, f, RequestStatus::Approved, true)], b, f));
}

#[test]
fn test_integration_reconciliation_is_idempotent() {
    let mut pair = Pair::connected();
    pair.windows.push(window(pair.babysitter_id, (18, 0), (21, 0)));
    let mut m = Meeting::pending(pair.babysitter_id, pair.family_id, at(19, 0), at(20, 0));
    m.status = MeetingStatus::Approved;
    pair.meetings.push(m);

    let first = bookable_intervals(&pair.windows, &pair.meetings);
    let second = bookable_intervals(&pair.windows, &pair.meetings);
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_integration_missing_identity_is_unauthenticated() {
    let app = actix_test::init_service(App::new().configure(configure_routes)).await;

    let req = actix_test::TestRequest::get().uri("/api/v1/meetings").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.error, "unauthenticated");
    assert_eq!(body.status_code, 401);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/meetings")
        .insert_header((USER_ID_HEADER, "nobody"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
