//! Reservation records and the identifiers they carry.

use crate::error::{ReservationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric reservation identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted reservation binding a user to a movie at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Store-assigned identifier
    pub id: ReservationId,
    /// Free-text movie title
    pub movie_name: String,
    /// User the reservation belongs to
    pub user_id: UserId,
    /// When the reservation takes effect
    pub reservation_date: DateTime<Utc>,
}

/// Incoming reservation request, as submitted by a client.
///
/// `reservation_date` is optional; when absent it defaults to the time the
/// reservation is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Movie title, must not be blank
    pub movie_name: String,
    /// Requesting user
    pub user_id: UserId,
    /// Optional explicit reservation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_date: Option<DateTime<Utc>>,
}

impl ReservationRequest {
    /// Build a request without an explicit date.
    #[must_use]
    pub fn new(movie_name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            movie_name: movie_name.into(),
            user_id,
            reservation_date: None,
        }
    }

    /// Set an explicit reservation date.
    #[must_use]
    pub const fn with_date(mut self, reservation_date: DateTime<Utc>) -> Self {
        self.reservation_date = Some(reservation_date);
        self
    }
}

/// A validated reservation that has not been persisted yet.
///
/// Only constructible through [`NewReservation::from_request`], so every
/// value reaching a store has a non-blank movie name and a resolved date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    movie_name: String,
    user_id: UserId,
    reservation_date: DateTime<Utc>,
}

impl NewReservation {
    /// Validate a request, defaulting the date to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] if the movie name is blank.
    pub fn from_request(request: ReservationRequest, now: DateTime<Utc>) -> Result<Self> {
        let movie_name = request.movie_name.trim();
        if movie_name.is_empty() {
            return Err(ReservationError::Validation(
                "movieName must not be empty".to_string(),
            ));
        }

        Ok(Self {
            movie_name: movie_name.to_string(),
            user_id: request.user_id,
            reservation_date: request.reservation_date.unwrap_or(now),
        })
    }

    /// Movie title (trimmed).
    #[must_use]
    pub fn movie_name(&self) -> &str {
        &self.movie_name
    }

    /// Requesting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Resolved reservation date.
    #[must_use]
    pub const fn reservation_date(&self) -> DateTime<Utc> {
        self.reservation_date
    }

    /// Attach a store-assigned id.
    #[must_use]
    pub fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            movie_name: self.movie_name,
            user_id: self.user_id,
            reservation_date: self.reservation_date,
        }
    }
}
