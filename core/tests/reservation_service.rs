//! `ReservationService` against the in-memory stores.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::Duration;
use cinebook_core::{
    AdmissionPolicy, Clock, DateTime, ReservationError, ReservationId, ReservationRequest,
    ReservationService, UserId, Utc,
};
use cinebook_testing::properties::{blank_movie_name, movie_name, offset_millis};
use cinebook_testing::{InMemoryReservationStore, InMemoryUserRepository, ManualClock, test_clock};
use proptest::prelude::*;
use std::sync::Arc;

struct Harness {
    service: ReservationService,
    store: Arc<InMemoryReservationStore>,
    users: Arc<InMemoryUserRepository>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryReservationStore::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(ManualClock::new(test_clock().now()));
    let service = ReservationService::new(store.clone(), users.clone(), clock.clone());
    Harness {
        service,
        store,
        users,
        clock,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

#[tokio::test]
async fn dune_then_arrival_scenario() {
    let h = harness();

    let dune = h
        .service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();
    assert_eq!(dune.movie_name, "Dune");
    assert_eq!(dune.reservation_date, test_clock().now());
    assert_eq!(h.store.len(), 1);

    let rejected = h
        .service
        .attempt_create(ReservationRequest::new("Arrival", UserId(2)))
        .await
        .unwrap_err();
    assert_eq!(rejected.to_string(), "Reservation is not possible, time frame taken.");
    assert_eq!(h.store.len(), 1);

    h.clock.advance(Duration::hours(3));
    let arrival = h
        .service
        .attempt_create(ReservationRequest::new("Arrival", UserId(2)))
        .await
        .unwrap();
    assert_eq!(arrival.user_id, UserId(2));
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn window_boundary_is_exclusive() {
    let h = harness();
    h.service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();

    h.clock.advance(Duration::hours(2));
    assert!(matches!(
        h.service.attempt_create(ReservationRequest::new("Arrival", UserId(1))).await,
        Err(ReservationError::AdmissionDenied { .. })
    ));

    h.clock.advance(Duration::milliseconds(1));
    assert!(
        h.service
            .attempt_create(ReservationRequest::new("Arrival", UserId(1)))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn future_dated_reservation_blocks_until_it_has_passed() {
    let h = harness();
    let later = test_clock().now() + Duration::days(1);
    h.service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)).with_date(later))
        .await
        .unwrap();

    h.clock.advance(Duration::hours(20));
    let err = h
        .service
        .attempt_create(ReservationRequest::new("Arrival", UserId(1)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ReservationError::AdmissionDenied {
            reopens_at: later + Duration::hours(2) + Duration::milliseconds(1),
        }
    );
}

#[tokio::test]
async fn reservation_at_end_of_time_denies_without_breaking_the_store() {
    let h = harness();
    let last_day = "+262142-12-31T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
    h.service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)).with_date(last_day))
        .await
        .unwrap();

    for _ in 0..2 {
        let err = h
            .service
            .attempt_create(ReservationRequest::new("Arrival", UserId(2)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ReservationError::AdmissionDenied {
                reopens_at: DateTime::<Utc>::MAX_UTC,
            }
        );
    }
    assert_eq!(h.store.len(), 1);

    let stored = h.store.all()[0].id;
    h.service.delete_by_id(stored).await.unwrap();
    h.service
        .attempt_create(ReservationRequest::new("Arrival", UserId(2)))
        .await
        .unwrap();
}

#[tokio::test]
async fn blank_name_never_reaches_the_store() {
    let h = harness();
    h.store.set_unavailable(true);

    // Validation runs first, so the outage is not observed.
    let err = h
        .service
        .attempt_create(ReservationRequest::new(" ", UserId(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));
}

#[tokio::test]
async fn storage_failure_is_reported() {
    let h = harness();
    h.store.set_unavailable(true);
    let err = h
        .service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Storage(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn list_by_user() {
    let h = harness();
    let ripley = h.users.seed_user("ripley", "ripley@nostromo.io");
    let hicks = h.users.seed_user("hicks", "hicks@sulaco.io");

    assert_eq!(h.service.list_by_user(hicks.id).await.unwrap(), vec![]);

    h.service
        .attempt_create(ReservationRequest::new("Alien", ripley.id))
        .await
        .unwrap();
    h.clock.advance(Duration::hours(3));
    h.service
        .attempt_create(ReservationRequest::new("Aliens", hicks.id))
        .await
        .unwrap();

    let ripleys = h.service.list_by_user(ripley.id).await.unwrap();
    assert_eq!(ripleys.len(), 1);
    assert_eq!(ripleys[0].movie_name, "Alien");
}

#[tokio::test]
async fn list_for_unknown_user_is_not_found() {
    let h = harness();
    assert_eq!(
        h.service.list_by_user(UserId(404)).await,
        Err(ReservationError::UserNotFound(UserId(404)))
    );
}

#[tokio::test]
async fn delete_returns_the_removed_record() {
    let h = harness();
    let created = h
        .service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();

    let removed = h.service.delete_by_id(created.id).await.unwrap();
    assert_eq!(removed, created);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn delete_unknown_leaves_store_unchanged() {
    let h = harness();
    h.service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();
    let before = h.store.all();

    assert_eq!(
        h.service.delete_by_id(ReservationId(99)).await,
        Err(ReservationError::ReservationNotFound(ReservationId(99)))
    );
    assert_eq!(h.store.all(), before);
}

#[tokio::test]
async fn deleting_the_latest_reopens_the_window() {
    let h = harness();
    let created = h
        .service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();
    h.service.delete_by_id(created.id).await.unwrap();

    assert!(
        h.service
            .attempt_create(ReservationRequest::new("Arrival", UserId(2)))
            .await
            .is_ok()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_admit_exactly_one() {
    let h = harness();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let service = h.service.clone();
            tokio::spawn(async move {
                service
                    .attempt_create(ReservationRequest::new("Dune", UserId(i)))
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    for task in tasks {
        if task.await.expect("task panicked").is_ok() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn custom_window_is_honoured() {
    let h = harness();
    let service = h
        .service
        .clone()
        .with_policy(AdmissionPolicy::new(Duration::minutes(15)));

    service
        .attempt_create(ReservationRequest::new("Dune", UserId(1)))
        .await
        .unwrap();
    h.clock.advance(Duration::minutes(16));
    assert!(
        service
            .attempt_create(ReservationRequest::new("Arrival", UserId(1)))
            .await
            .is_ok()
    );
}

proptest! {
    /// A create succeeds exactly when the previous reservation is more than
    /// two hours (in whole milliseconds) behind the clock.
    #[test]
    fn admission_matches_elapsed_time(
        name in movie_name(),
        offset in offset_millis(Duration::hours(2).num_milliseconds()),
    ) {
        let h = harness();
        let result = runtime().block_on(async {
            let anchor = test_clock().now();
            h.service
                .attempt_create(ReservationRequest::new("Anchor", UserId(1)).with_date(anchor))
                .await
                .unwrap();
            h.clock.advance(Duration::milliseconds(offset));
            h.service.attempt_create(ReservationRequest::new(name, UserId(2))).await
        });

        let window_ms = Duration::hours(2).num_milliseconds();
        prop_assert_eq!(result.is_ok(), offset > window_ms);
        prop_assert_eq!(h.store.len(), if offset > window_ms { 2 } else { 1 });
    }

    /// Blank names are rejected and nothing is written.
    #[test]
    fn blank_names_are_rejected(name in blank_movie_name()) {
        let h = harness();
        let result = runtime().block_on(h.service.attempt_create(ReservationRequest::new(name, UserId(1))));
        prop_assert!(matches!(result, Err(ReservationError::Validation(_))));
        prop_assert!(h.store.is_empty());
    }

    /// Successful creates never leave two reservations within one window of
    /// each other.
    #[test]
    fn stored_reservations_are_spaced_by_the_window(steps in prop::collection::vec(0i64..=180, 1..20)) {
        let h = harness();
        runtime().block_on(async {
            for minutes in steps {
                h.clock.advance(Duration::minutes(minutes));
                let _ = h.service.attempt_create(ReservationRequest::new("Dune", UserId(1))).await;
            }
        });

        let mut dates: Vec<_> = h.store.all().into_iter().map(|r| r.reservation_date).collect();
        dates.sort();
        for pair in dates.windows(2) {
            prop_assert!(pair[1] - pair[0] > Duration::hours(2));
        }
    }
}
