//! User records and the repository seam.

use crate::error::AuthError;
use cinebook_core::{DateTime, UserId, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`UserRepository`] methods.
pub type AuthFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + Send + 'a>>;

/// A stored user, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Login email, unique across users.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The view of this user that is safe to return to clients.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// A user ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Login email (already normalized).
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

/// User fields exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed JWT to send as `Authorization: Bearer <token>`.
    pub access_token: String,
}

/// User persistence.
///
/// This trait abstracts over the user table (`PostgreSQL` in production,
/// an in-memory map in tests).
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Email already exists → `AuthError::EmailAlreadyRegistered`
    /// - Database query fails
    fn create_user(&self, user: NewUser) -> AuthFuture<'_, User>;

    /// Look up a user by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn find_by_email<'a>(&'a self, email: &'a str) -> AuthFuture<'a, Option<User>>;
}
