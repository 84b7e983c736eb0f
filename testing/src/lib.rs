//! # Cinebook Testing
//!
//! Test doubles for the Cinebook workspace.
//!
//! This crate provides:
//! - Deterministic clocks ([`FixedClock`], [`ManualClock`])
//! - In-memory implementations of the persistence traits
//! - A canned movie catalog
//! - proptest strategies for reservation inputs
//!
//! ## Example
//!
//! ```
//! use cinebook_core::{ReservationRequest, ReservationService, UserId};
//! use cinebook_testing::{InMemoryReservationStore, InMemoryUserRepository, test_clock};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let users = Arc::new(InMemoryUserRepository::new());
//! let user = users.seed_user("ripley", "ripley@nostromo.io");
//! let service = ReservationService::new(
//!     Arc::new(InMemoryReservationStore::new()),
//!     users,
//!     Arc::new(test_clock()),
//! );
//!
//! let created = service
//!     .attempt_create(ReservationRequest::new("Alien", user.id))
//!     .await
//!     .unwrap();
//! assert_eq!(created.movie_name, "Alien");
//! # });
//! ```

use chrono::{DateTime, Utc};
use cinebook_core::environment::Clock;

pub mod catalog;
pub mod stores;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use cinebook_testing::mocks::FixedClock;
    /// use cinebook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Shared through an `Arc`, so a test can advance time while a service
    /// holds the same clock.
    ///
    /// ```
    /// use cinebook_testing::mocks::ManualClock;
    /// use cinebook_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = ManualClock::new(start);
    /// clock.advance(Duration::hours(3));
    /// assert_eq!(clock.now(), start + Duration::hours(3));
    /// ```
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Start at `time`.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward (or backward, for a negative duration).
        pub fn advance(&self, by: Duration) {
            let mut guard = self
                .time
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *guard += by;
        }

        /// Jump to an absolute instant.
        pub fn set(&self, time: DateTime<Utc>) {
            *self
                .time
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner) = time;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self
                .time
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Movie titles that survive validation (non-blank after trimming).
    pub fn movie_name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 :'-]{0,40}"
    }

    /// Strings that are empty or whitespace only.
    pub fn blank_movie_name() -> impl Strategy<Value = String> {
        "[ \t\n]{0,8}"
    }

    /// Millisecond offsets spanning a few windows either side of zero.
    pub fn offset_millis(window_ms: i64) -> impl Strategy<Value = i64> {
        -window_ms * 3..=window_ms * 3
    }
}

/// Install a `tracing` subscriber that writes to the test harness.
///
/// Safe to call from many tests; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

// Re-export commonly used items
pub use catalog::StubCatalog;
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use stores::{InMemoryReservationStore, InMemoryUserRepository};
