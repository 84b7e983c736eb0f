//! Error types for reservation operations.

use crate::reservation::{ReservationId, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for reservation operations.
pub type Result<T> = std::result::Result<T, ReservationError>;

/// Every way a reservation operation can fail.
///
/// All variants are scoped to a single request; none is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// The admission window is still occupied. Nothing was persisted.
    #[error("Reservation is not possible, time frame taken.")]
    AdmissionDenied {
        /// First instant at which a new reservation would be admitted
        reopens_at: DateTime<Utc>,
    },

    /// No user with this id exists.
    #[error("User with id {0} not found")]
    UserNotFound(UserId),

    /// No reservation with this id exists.
    #[error("Reservation with id {0} not found")]
    ReservationNotFound(ReservationId),

    /// Malformed request, rejected before touching the store.
    #[error("Invalid reservation request: {0}")]
    Validation(String),

    /// The persistence layer failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReservationError {
    /// Returns `true` if the caller can fix the request and retry.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cinebook_core::ReservationError;
    /// assert!(ReservationError::Validation("movieName".into()).is_client_error());
    /// assert!(!ReservationError::Storage("down".into()).is_client_error());
    /// ```
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
