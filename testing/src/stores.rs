//! In-memory persistence for tests.
//!
//! Both stores keep their state behind a single `Mutex`, so every trait
//! method is atomic with respect to concurrent callers.

use chrono::Utc;
use cinebook_auth::{AuthError, AuthFuture, NewUser, User, UserRepository};
use cinebook_core::{
    AdmissionDecision, AdmissionPolicy, DateTime, NewReservation, Reservation, ReservationError, ReservationId,
    ReservationStore, StoreFuture, UserDirectory, UserId,
};
use std::collections::{BTreeMap, HashMap};
use std::future::ready;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Reservations {
    next_id: i64,
    rows: BTreeMap<ReservationId, Reservation>,
}

impl Reservations {
    fn latest(&self) -> Option<&Reservation> {
        self.rows.values().max_by_key(|r| r.reservation_date)
    }

    fn insert(&mut self, new: NewReservation) -> Reservation {
        self.next_id += 1;
        let reservation = new.into_reservation(ReservationId(self.next_id));
        self.rows.insert(reservation.id, reservation.clone());
        reservation
    }
}

/// In-memory [`ReservationStore`].
///
/// Ids are assigned sequentially from 1. Call
/// [`set_unavailable`](Self::set_unavailable) to make every operation fail
/// with a storage error.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    state: Mutex<Reservations>,
    unavailable: AtomicBool,
}

impl InMemoryReservationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored reservations. Ignores [`set_unavailable`](Self::set_unavailable).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored reservation, ordered by id. Ignores
    /// [`set_unavailable`](Self::set_unavailable).
    #[must_use]
    pub fn all(&self) -> Vec<Reservation> {
        self.rows()
    }

    fn rows(&self) -> Vec<Reservation> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .rows
            .values()
            .cloned()
            .collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Reservations>, ReservationError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ReservationError::Storage("store unavailable".to_string()));
        }
        self.state
            .lock()
            .map_err(|_| ReservationError::Storage("store mutex poisoned".to_string()))
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn find_latest(&self) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(ready(self.lock().map(|state| state.latest().cloned())))
    }

    fn insert(&self, reservation: NewReservation) -> StoreFuture<'_, Reservation> {
        Box::pin(ready(self.lock().map(|mut state| state.insert(reservation))))
    }

    fn insert_if_admitted(
        &self,
        reservation: NewReservation,
        policy: AdmissionPolicy,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Reservation> {
        let result = self.lock().and_then(|mut state| {
            let decision = policy.evaluate(state.latest(), now);
            match decision {
                AdmissionDecision::Admitted => Ok(state.insert(reservation)),
                AdmissionDecision::Denied { reopens_at } => {
                    Err(ReservationError::AdmissionDenied { reopens_at })
                },
            }
        });
        Box::pin(ready(result))
    }

    fn find_by_id(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(ready(self.lock().map(|state| state.rows.get(&id).cloned())))
    }

    fn find_all_by_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Reservation>> {
        let result = self.lock().map(|state| {
            state
                .rows
                .values()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect()
        });
        Box::pin(ready(result))
    }

    fn delete(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(ready(self.lock().map(|mut state| state.rows.remove(&id))))
    }

    fn check_health(&self) -> StoreFuture<'_, ()> {
        Box::pin(ready(self.lock().map(|_| ())))
    }
}

#[derive(Debug, Default)]
struct Users {
    next_id: i64,
    by_id: HashMap<UserId, User>,
}

/// In-memory user table serving both [`UserRepository`] and [`UserDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<Users>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user directly, bypassing registration. The password hash is
    /// empty, so the user cannot log in.
    ///
    /// # Panics
    ///
    /// Panics if the email is already taken or the mutex is poisoned.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn seed_user(&self, username: &str, email: &str) -> User {
        self.create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
        })
        .expect("seed user")
    }

    fn create(&self, new: NewUser) -> Result<User, AuthError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AuthError::DatabaseError("user mutex poisoned".to_string()))?;

        if state.by_id.values().any(|u| u.email == new.email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        state.next_id += 1;
        let user = User {
            id: UserId(state.next_id),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        state.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    fn find<F>(&self, predicate: F) -> Result<Option<User>, AuthError>
    where
        F: Fn(&User) -> bool,
    {
        let state = self
            .state
            .lock()
            .map_err(|_| AuthError::DatabaseError("user mutex poisoned".to_string()))?;
        Ok(state.by_id.values().find(|u| predicate(u)).cloned())
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create_user(&self, user: NewUser) -> AuthFuture<'_, User> {
        Box::pin(ready(self.create(user)))
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> AuthFuture<'a, Option<User>> {
        Box::pin(ready(self.find(|u| u.email == email)))
    }
}

impl UserDirectory for InMemoryUserRepository {
    fn user_exists(&self, user_id: UserId) -> StoreFuture<'_, bool> {
        let result = self
            .find(|u| u.id == user_id)
            .map(|user| user.is_some())
            .map_err(|e| ReservationError::Storage(e.to_string()));
        Box::pin(ready(result))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_clock;
    use cinebook_core::{Clock, ReservationRequest};

    fn new_reservation(name: &str, user: i64, at: DateTime<Utc>) -> NewReservation {
        NewReservation::from_request(ReservationRequest::new(name, UserId(user)).with_date(at), at)
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = InMemoryReservationStore::new();
        let now = test_clock().now();
        let a = store.insert(new_reservation("Dune", 1, now)).await.unwrap();
        let b = store.insert(new_reservation("Arrival", 1, now)).await.unwrap();
        assert_eq!(a.id, ReservationId(1));
        assert_eq!(b.id, ReservationId(2));
    }

    #[tokio::test]
    async fn latest_is_by_reservation_date() {
        let store = InMemoryReservationStore::new();
        let now = test_clock().now();
        store.insert(new_reservation("Later", 1, now + chrono::Duration::hours(5))).await.unwrap();
        store.insert(new_reservation("Earlier", 1, now)).await.unwrap();

        let latest = store.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.movie_name, "Later");
    }

    #[tokio::test]
    async fn outage_fails_every_call() {
        let store = InMemoryReservationStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.check_health().await, Err(ReservationError::Storage(_))));
        assert!(store.find_latest().await.is_err());

        store.set_unavailable(false);
        assert!(store.check_health().await.is_ok());
    }

    #[tokio::test]
    async fn size_is_visible_during_outage() {
        let store = InMemoryReservationStore::new();
        store.insert(new_reservation("Dune", 1, test_clock().now())).await.unwrap();

        store.set_unavailable(true);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.all()[0].movie_name, "Dune");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let users = InMemoryUserRepository::new();
        let _ = users.seed_user("a", "a@example.com");
        let err = users
            .create_user(NewUser {
                username: "b".to_string(),
                email: "a@example.com".to_string(),
                password_hash: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);
    }

    #[tokio::test]
    async fn directory_reports_existence() {
        let users = InMemoryUserRepository::new();
        let user = users.seed_user("a", "a@example.com");
        assert!(users.user_exists(user.id).await.unwrap());
        assert!(!users.user_exists(UserId(999)).await.unwrap());
    }
}
