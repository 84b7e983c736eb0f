//! Persistence abstractions consumed by the reservation service.
//!
//! # Implementations
//!
//! - `PostgresReservationStore` / `PostgresUserRepository` (in `cinebook-postgres`): production
//! - `InMemoryReservationStore` / `InMemoryUserRepository` (in `cinebook-testing`): tests
//!
//! # Dyn Compatibility
//!
//! Methods return [`StoreFuture`] instead of using `async fn` so the stores can
//! be shared as `Arc<dyn ReservationStore>` in HTTP state.

use crate::admission::AdmissionPolicy;
use crate::error::ReservationError;
use crate::reservation::{NewReservation, Reservation, ReservationId, UserId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by store methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ReservationError>> + Send + 'a>>;

/// Reservation persistence.
pub trait ReservationStore: Send + Sync {
    /// Most recent reservation by `reservation_date`, across all users.
    ///
    /// # Errors
    ///
    /// - `Storage`: query failed
    fn find_latest(&self) -> StoreFuture<'_, Option<Reservation>>;

    /// Insert unconditionally and return the stored record.
    ///
    /// # Errors
    ///
    /// - `Storage`: insert failed
    fn insert(&self, reservation: NewReservation) -> StoreFuture<'_, Reservation>;

    /// Atomically read the latest reservation, evaluate `policy` at `now`
    /// and insert only if admitted.
    ///
    /// Implementations must make the read and the insert a single unit with
    /// respect to concurrent callers: two racing calls against an empty store
    /// admit exactly one.
    ///
    /// # Errors
    ///
    /// - `AdmissionDenied`: window occupied, nothing written
    /// - `Storage`: transaction failed
    fn insert_if_admitted(
        &self,
        reservation: NewReservation,
        policy: AdmissionPolicy,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Reservation>;

    /// Look up a reservation by id.
    ///
    /// # Errors
    ///
    /// - `Storage`: query failed
    fn find_by_id(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>>;

    /// All reservations belonging to a user (order unspecified).
    ///
    /// # Errors
    ///
    /// - `Storage`: query failed
    fn find_all_by_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Reservation>>;

    /// Remove a reservation, returning it if it existed.
    ///
    /// # Errors
    ///
    /// - `Storage`: delete failed
    fn delete(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>>;

    /// Cheap connectivity probe used by readiness checks.
    ///
    /// # Errors
    ///
    /// - `Storage`: backend unreachable
    fn check_health(&self) -> StoreFuture<'_, ()>;
}

/// Read-only view of the user store needed by reservation lookups.
pub trait UserDirectory: Send + Sync {
    /// Whether a user with this id exists.
    ///
    /// # Errors
    ///
    /// - `Storage`: query failed
    fn user_exists(&self, user_id: UserId) -> StoreFuture<'_, bool>;
}
