//! Reservation API endpoints.
//!
//! All routes require a bearer token:
//! - POST /reservation - Create a reservation if the admission window is clear
//! - GET /reservation/:userId - List a user's reservations
//! - DELETE /reservation/:id - Delete a reservation

use crate::auth::AuthUser;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use cinebook_core::{Reservation, ReservationId, ReservationRequest, UserId};
use cinebook_web::{AppError, CorrelationId, ValidJson, ValidPath};

// ============================================================================
// Handlers
// ============================================================================

/// Create a reservation.
///
/// # Errors
///
/// - 409 `ADMISSION_DENIED`: a reservation exists within the admission window
/// - 422: blank `movieName`, non-numeric `userId` or malformed JSON
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/reservation \
///   -H "Authorization: Bearer $TOKEN" \
///   -H "Content-Type: application/json" \
///   -d '{"movieName":"Dune","userId":1}'
/// ```
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    correlation_id: CorrelationId,
    ValidJson(request): ValidJson<ReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    tracing::debug!(
        correlation_id = %correlation_id.0,
        caller = %user.user_id,
        user_id = %request.user_id,
        "Reservation requested"
    );

    let reservation = state.reservations.attempt_create(request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List all reservations of a user.
///
/// # Errors
///
/// - 404: no such user
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/reservation/1 -H "Authorization: Bearer $TOKEN"
/// ```
pub async fn list_user_reservations(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(user_id): ValidPath<i64>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = state.reservations.list_by_user(UserId(user_id)).await?;
    Ok(Json(reservations))
}

/// Delete a reservation, returning the removed record.
///
/// # Errors
///
/// - 404: no such reservation
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:3000/reservation/7 -H "Authorization: Bearer $TOKEN"
/// ```
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Reservation>, AppError> {
    let removed = state.reservations.delete_by_id(ReservationId(id)).await?;
    tracing::debug!(reservation_id = id, caller = %user.user_id, "Reservation removed via API");
    Ok(Json(removed))
}
