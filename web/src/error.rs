//! Error types for web handlers.
//!
//! Every failure leaves the server as `{"code": ..., "message": ...}` with a
//! status derived from the domain error. Server-side failures are logged
//! with their source and reported to the client with a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cinebook_auth::AuthError;
use cinebook_catalog::CatalogError;
use cinebook_core::ReservationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Data>, AppError> {
///     let reservation = service.delete_by_id(id).await?;
///     Ok(Json(reservation))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 404 Not Found for a resource identified by `id`.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{resource} with id {id} not found"),
        )
    }

    /// 409 Conflict.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    /// 422 Unprocessable Entity.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    /// 429 Too Many Requests.
    #[must_use]
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", message)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR", message)
    }

    /// 502 Bad Gateway, for upstream failures.
    #[must_use]
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "BAD_GATEWAY", message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code (for client error handling).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Request failed"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Request failed"
                ),
            }
        } else {
            tracing::debug!(status = %self.status, code = self.code, "Request rejected");
        }

        let body = ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::AdmissionDenied { .. } => {
                Self::new(StatusCode::CONFLICT, "ADMISSION_DENIED", err.to_string())
            },
            ReservationError::UserNotFound(id) => Self::not_found("User", id),
            ReservationError::ReservationNotFound(id) => Self::not_found("Reservation", id),
            ReservationError::Validation(message) => Self::validation(message),
            ReservationError::Storage(_) => {
                Self::internal("An internal error occurred").with_source(err)
            },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::TokenExpired => Self::unauthorized(err.to_string()).with_source(err),
            AuthError::EmailAlreadyRegistered => Self::conflict(err.to_string()),
            AuthError::Validation(message) => Self::validation(message),
            AuthError::Hashing(_) | AuthError::TokenEncoding(_) | AuthError::DatabaseError(_) => {
                Self::internal("An internal error occurred").with_source(err)
            },
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Movie not found"),
            CatalogError::RateLimited => {
                Self::too_many_requests("Movie catalog rate limit reached, retry later")
            },
            CatalogError::MissingApiKey
            | CatalogError::Unauthorized
            | CatalogError::RequestFailed(_)
            | CatalogError::ResponseParseFailed(_)
            | CatalogError::ApiError { .. } => {
                Self::bad_gateway("Movie catalog is unavailable").with_source(err)
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::{ReservationId, UserId, Utc};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("User", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] User with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn admission_denied_is_conflict() {
        let err = AppError::from(ReservationError::AdmissionDenied { reopens_at: Utc::now() });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "ADMISSION_DENIED");
        assert_eq!(err.message(), "Reservation is not possible, time frame taken.");
    }

    #[test]
    fn reservation_errors_map_to_status() {
        assert_eq!(
            AppError::from(ReservationError::UserNotFound(UserId(7))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ReservationError::ReservationNotFound(ReservationId(7))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ReservationError::Validation("movieName".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn storage_details_are_hidden() {
        let err = AppError::from(ReservationError::Storage("connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("connection refused"));
    }

    #[test]
    fn auth_errors_map_to_status() {
        assert_eq!(AppError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(AuthError::EmailAlreadyRegistered).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(AuthError::DatabaseError("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn catalog_errors_map_to_status() {
        assert_eq!(AppError::from(CatalogError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(CatalogError::RateLimited).status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::from(CatalogError::Unauthorized).status(), StatusCode::BAD_GATEWAY);
    }
}
