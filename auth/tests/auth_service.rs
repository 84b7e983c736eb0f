//! Registration and login against the in-memory user repository.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::Duration;
use cinebook_auth::{
    AuthConfig, AuthError, AuthService, LoginRequest, RegisterRequest, TokenService,
};
use cinebook_core::Clock;
use cinebook_testing::{InMemoryUserRepository, ManualClock, test_clock};
use std::sync::Arc;

struct Harness {
    service: AuthService,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let config = AuthConfig::new("test-secret").with_bcrypt_cost(4);
    let clock = Arc::new(ManualClock::new(test_clock().now()));
    let tokens = TokenService::new(&config, clock.clone());
    let service = AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens, &config);
    Harness { service, clock }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        username: "ripley".to_string(),
        email: email.to_string(),
        password: "nostromo".to_string(),
    }
}

#[tokio::test]
async fn register_returns_public_user() {
    let h = harness();
    let user = h.service.register(register_request("Ripley@Nostromo.io")).await.unwrap();

    assert_eq!(user.username, "ripley");
    assert_eq!(user.email, "ripley@nostromo.io");

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let h = harness();
    h.service.register(register_request("ripley@nostromo.io")).await.unwrap();

    let err = h
        .service
        .register(register_request("RIPLEY@nostromo.io"))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::EmailAlreadyRegistered);
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let h = harness();

    let mut bad_email = register_request("not-an-email");
    assert!(matches!(h.service.register(bad_email.clone()).await, Err(AuthError::Validation(_))));

    bad_email.email = "ripley@nostromo.io".to_string();
    bad_email.password = "123".to_string();
    assert!(matches!(h.service.register(bad_email.clone()).await, Err(AuthError::Validation(_))));

    bad_email.password = "nostromo".to_string();
    bad_email.username = "  ".to_string();
    assert!(matches!(h.service.register(bad_email).await, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn login_issues_verifiable_token() {
    let h = harness();
    let user = h.service.register(register_request("ripley@nostromo.io")).await.unwrap();

    let response = h
        .service
        .login(LoginRequest {
            email: "ripley@nostromo.io".to_string(),
            password: "nostromo".to_string(),
        })
        .await
        .unwrap();

    let claims = h.service.tokens().verify(&response.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, "ripley@nostromo.io");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let h = harness();
    h.service.register(register_request("ripley@nostromo.io")).await.unwrap();

    let wrong_password = h
        .service
        .login(LoginRequest {
            email: "ripley@nostromo.io".to_string(),
            password: "sulaco".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = h
        .service
        .login(LoginRequest {
            email: "hicks@sulaco.io".to_string(),
            password: "nostromo".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(wrong_password, AuthError::InvalidCredentials);
    assert_eq!(unknown_email, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn token_expires_after_an_hour() {
    let h = harness();
    h.service.register(register_request("ripley@nostromo.io")).await.unwrap();
    let token = h
        .service
        .login(LoginRequest {
            email: "ripley@nostromo.io".to_string(),
            password: "nostromo".to_string(),
        })
        .await
        .unwrap()
        .access_token;

    h.clock.advance(Duration::hours(1));
    assert_eq!(h.service.tokens().verify(&token), Err(AuthError::TokenExpired));
}
