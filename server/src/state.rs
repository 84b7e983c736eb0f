//! Application state for the Cinebook HTTP server.

use axum::extract::FromRef;
use cinebook_auth::{AuthService, TokenService};
use cinebook_catalog::MovieCatalog;
use cinebook_core::ReservationService;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Reservation admission, listing and deletion
    pub reservations: ReservationService,

    /// Registration and login
    pub auth: AuthService,

    /// Movie catalog proxy
    pub catalog: Arc<dyn MovieCatalog>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        reservations: ReservationService,
        auth: AuthService,
        catalog: Arc<dyn MovieCatalog>,
    ) -> Self {
        Self {
            reservations,
            auth,
            catalog,
        }
    }
}

// Lets extractors verify tokens without knowing the rest of the state
impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.tokens().clone()
    }
}
