//! # Cinebook Core
//!
//! Domain types and the reservation admission rule for the Cinebook backend.
//!
//! The crate follows a "functional core, imperative shell" split:
//!
//! - [`admission::AdmissionPolicy`] is a pure decision over the latest stored
//!   reservation and the current time.
//! - [`store::ReservationStore`] and [`store::UserDirectory`] abstract the
//!   persistence layer and are injected, together with a [`environment::Clock`],
//!   into [`service::ReservationService`].
//!
//! ## Example
//!
//! ```ignore
//! use cinebook_core::{ReservationRequest, ReservationService, SystemClock};
//! use std::sync::Arc;
//!
//! let service = ReservationService::new(store, users, Arc::new(SystemClock));
//!
//! let created = service
//!     .attempt_create(ReservationRequest::new("Dune", UserId(1)))
//!     .await?;
//! ```

pub mod admission;
pub mod environment;
pub mod error;
pub mod reservation;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use admission::{AdmissionDecision, AdmissionPolicy};
pub use chrono::{DateTime, Utc};
pub use environment::{Clock, SystemClock};
pub use error::{ReservationError, Result};
pub use reservation::{NewReservation, Reservation, ReservationId, ReservationRequest, UserId};
pub use service::ReservationService;
pub use store::{ReservationStore, StoreFuture, UserDirectory};
