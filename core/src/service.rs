//! Reservation service: the imperative shell around [`AdmissionPolicy`].

use crate::admission::AdmissionPolicy;
use crate::environment::Clock;
use crate::error::{ReservationError, Result};
use crate::reservation::{NewReservation, Reservation, ReservationId, ReservationRequest, UserId};
use crate::store::{ReservationStore, UserDirectory};
use std::sync::Arc;

/// Creates, lists and deletes reservations.
///
/// Cheap to clone; all dependencies are shared.
#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    policy: AdmissionPolicy,
}

impl ReservationService {
    /// Create a service with the default two-hour admission window.
    #[must_use]
    pub fn new(
        store: Arc<dyn ReservationStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            users,
            clock,
            policy: AdmissionPolicy::default(),
        }
    }

    /// Replace the admission policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active admission policy.
    #[must_use]
    pub const fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// The underlying store (used by readiness checks).
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ReservationStore> {
        &self.store
    }

    /// Validate the request and persist it if the admission window is clear.
    ///
    /// # Errors
    ///
    /// - `Validation`: blank movie name (no store access happens)
    /// - `AdmissionDenied`: a reservation exists within the window
    /// - `Storage`: persistence failed
    pub async fn attempt_create(&self, request: ReservationRequest) -> Result<Reservation> {
        let now = self.clock.now();
        let new = NewReservation::from_request(request, now)?;
        let user_id = new.user_id();

        match self.store.insert_if_admitted(new, self.policy, now).await {
            Ok(reservation) => {
                tracing::info!(
                    reservation_id = %reservation.id,
                    user_id = %reservation.user_id,
                    movie_name = %reservation.movie_name,
                    reservation_date = %reservation.reservation_date,
                    "Reservation admitted"
                );
                metrics::counter!("reservations.admission", "outcome" => "admitted").increment(1);
                Ok(reservation)
            },
            Err(ReservationError::AdmissionDenied { reopens_at }) => {
                tracing::info!(
                    user_id = %user_id,
                    reopens_at = %reopens_at,
                    "Reservation denied, admission window occupied"
                );
                metrics::counter!("reservations.admission", "outcome" => "denied").increment(1);
                Err(ReservationError::AdmissionDenied { reopens_at })
            },
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Reservation insert failed");
                Err(e)
            },
        }
    }

    /// All reservations of an existing user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`: no such user
    /// - `Storage`: persistence failed
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Reservation>> {
        if !self.users.user_exists(user_id).await? {
            return Err(ReservationError::UserNotFound(user_id));
        }

        let reservations = self.store.find_all_by_user(user_id).await?;
        tracing::debug!(user_id = %user_id, count = reservations.len(), "Listed reservations");
        Ok(reservations)
    }

    /// Delete a reservation and return it.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound`: no such reservation (store unchanged)
    /// - `Storage`: persistence failed
    pub async fn delete_by_id(&self, id: ReservationId) -> Result<Reservation> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(id))?;

        tracing::info!(
            reservation_id = %removed.id,
            user_id = %removed.user_id,
            "Reservation deleted"
        );
        Ok(removed)
    }
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
