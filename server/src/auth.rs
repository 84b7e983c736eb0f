//! Authentication extractor for protected routes.
//!
//! ```rust,ignore
//! async fn create(user: AuthUser, ...) -> Result<..., AppError> {
//!     // user.user_id comes from a verified, unexpired token
//! }
//! ```

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use cinebook_auth::TokenService;
use cinebook_core::UserId;
use cinebook_web::{AppError, BearerToken};

/// The caller identified by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Token subject
    pub user_id: UserId,
    /// Email at issue time
    pub email: String,
    /// Username at issue time
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let tokens = TokenService::from_ref(state);

        let claims = tokens.verify(&token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::from(e)
        })?;

        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            username: claims.username,
        })
    }
}
