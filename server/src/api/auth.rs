//! Authentication API endpoints.
//!
//! - POST /auth/register - Create an account
//! - POST /auth/login - Exchange credentials for an access token

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use cinebook_auth::{LoginRequest, PublicUser, RegisterRequest, TokenResponse};
use cinebook_web::{AppError, ValidJson};

/// Register a new user.
///
/// # Errors
///
/// - 409: email already registered
/// - 422: blank username, malformed email or short password
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/auth/register \
///   -H "Content-Type: application/json" \
///   -d '{"username":"ripley","email":"ripley@nostromo.io","password":"nostromo"}'
/// # {"id":1,"username":"ripley","email":"ripley@nostromo.io"}
/// ```
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in.
///
/// # Errors
///
/// - 401: unknown email or wrong password
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"ripley@nostromo.io","password":"nostromo"}'
/// # {"access_token":"eyJ..."}
/// ```
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth.login(request).await?;
    Ok(Json(token))
}
