//! Registration and login.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::password::{hash_password, verify_password};
use crate::token::TokenService;
use crate::user::{
    LoginRequest, NewUser, PublicUser, RegisterRequest, TokenResponse, UserRepository,
};
use crate::utils::{is_valid_email, normalize_email, validate_password, validate_username};
use std::sync::Arc;

/// Registers users and exchanges credentials for access tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create the service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, config: &AuthConfig) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Token service used to sign and verify tokens.
    #[must_use]
    pub const fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `Validation`: blank username, malformed email or short password
    /// - `EmailAlreadyRegistered`: email is taken
    /// - `Hashing` / `DatabaseError`: infrastructure failures
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser> {
        let username = validate_username(&request.username).map_err(AuthError::Validation)?;
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AuthError::Validation("email is not a valid address".to_string()));
        }
        validate_password(&request.password).map_err(AuthError::Validation)?;

        if self.users.find_by_email(&email).await?.is_some() {
            metrics::counter!("auth.register", "outcome" => "duplicate").increment(1);
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        metrics::counter!("auth.register", "outcome" => "created").increment(1);
        Ok(user.to_public())
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials`: unknown email or wrong password
    /// - `Hashing` / `TokenEncoding` / `DatabaseError`: infrastructure failures
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse> {
        let email = normalize_email(&request.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!("Login for unknown email");
            metrics::counter!("auth.login", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(request.password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            metrics::counter!("auth.login", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        metrics::counter!("auth.login", "outcome" => "success").increment(1);
        Ok(TokenResponse { access_token })
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}
