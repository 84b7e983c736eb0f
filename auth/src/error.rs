//! Error types for authentication operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of registration, login and token checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Unknown email or wrong password. The two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No `Authorization: Bearer` header on a protected request.
    #[error("Missing bearer token")]
    MissingToken,

    /// Token signature or structure is invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token `exp` is in the past.
    #[error("Token has expired")]
    TokenExpired,

    // ═══════════════════════════════════════════════════════════
    // Registration Errors
    // ═══════════════════════════════════════════════════════════

    /// An account already uses this email.
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /// Malformed registration or login payload.
    #[error("Validation failed: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════
    // Infrastructure Errors
    // ═══════════════════════════════════════════════════════════

    /// bcrypt failed or the blocking task was cancelled.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// JWT encoding failed.
    #[error("Token encoding failed: {0}")]
    TokenEncoding(String),

    /// User store failed.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AuthError {
    /// Returns `true` if the error was caused by the caller's input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::InvalidToken(_)
                | Self::TokenExpired
                | Self::EmailAlreadyRegistered
                | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors() {
        assert!(AuthError::InvalidCredentials.is_user_error());
        assert!(AuthError::TokenExpired.is_user_error());
        assert!(AuthError::EmailAlreadyRegistered.is_user_error());
        assert!(!AuthError::DatabaseError("down".into()).is_user_error());
        assert!(!AuthError::Hashing("cancelled".into()).is_user_error());
    }
}
