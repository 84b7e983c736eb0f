//! Authentication configuration.
//!
//! Values are supplied by the application; only the secret has no default.

use chrono::Duration;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Token signing and password hashing settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens.
    pub jwt_secret: String,

    /// Access token lifetime.
    ///
    /// Default: 1 hour
    pub token_ttl: Duration,

    /// bcrypt cost factor.
    ///
    /// Default: 10
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create a configuration with default lifetime and cost.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(1),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Set the token lifetime.
    #[must_use]
    pub const fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the bcrypt cost. Tests use the minimum (4) to stay fast.
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AuthConfig::new("secret");
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert_eq!(config.bcrypt_cost, DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", AuthConfig::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
