//! Reservation admission rule.
//!
//! A new reservation is admitted only when the globally most recent
//! reservation is strictly older than the admission window. The window is
//! measured from the latest stored `reservation_date` to the current time,
//! in whole milliseconds, and the threshold is exclusive:
//!
//! ```text
//! elapsed = now - latest.reservation_date
//!
//! elapsed >  window  → Admitted
//! elapsed <= window  → Denied   (includes a latest date in the future)
//! ```
//!
//! The throttle is global: it is not scoped per user or per movie.

use crate::reservation::Reservation;
use chrono::{DateTime, Duration, Utc};

/// Outcome of evaluating the admission rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The reservation may be persisted.
    Admitted,
    /// The window is still occupied.
    Denied {
        /// First instant at which a new reservation would be admitted
        reopens_at: DateTime<Utc>,
    },
}

impl AdmissionDecision {
    /// Returns `true` for [`AdmissionDecision::Admitted`].
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Pure admission policy: no I/O, no clock access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    window: Duration,
}

impl AdmissionPolicy {
    /// Create a policy with a custom window length.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window }
    }

    /// The admission window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether a reservation may be created at `now`, given the most
    /// recent stored reservation.
    #[must_use]
    pub fn evaluate(&self, latest: Option<&Reservation>, now: DateTime<Utc>) -> AdmissionDecision {
        let Some(latest) = latest else {
            return AdmissionDecision::Admitted;
        };

        let elapsed_ms = now
            .signed_duration_since(latest.reservation_date)
            .num_milliseconds();

        if elapsed_ms > self.window.num_milliseconds() {
            AdmissionDecision::Admitted
        } else {
            AdmissionDecision::Denied {
                reopens_at: self.reopens_at(latest.reservation_date),
            }
        }
    }

    // Saturates at the last representable instant for dates near the end of time
    fn reopens_at(&self, latest: DateTime<Utc>) -> DateTime<Utc> {
        self.window
            .checked_add(&Duration::milliseconds(1))
            .and_then(|gap| latest.checked_add_signed(gap))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for AdmissionPolicy {
    /// Two-hour window.
    fn default() -> Self {
        Self::new(Duration::hours(2))
    }
}
