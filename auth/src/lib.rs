//! Password authentication for Cinebook.
//!
//! Users register with a username, email and password; passwords are stored
//! as bcrypt hashes. A successful login returns an HS256 JWT that the HTTP
//! layer accepts as a bearer token on protected routes.
//!
//! # Modules
//!
//! - [`service`]: `register` / `login`
//! - [`token`]: issuing and verifying access tokens
//! - [`password`]: bcrypt hashing on the blocking pool
//! - [`user`]: user records and the [`UserRepository`] seam

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;
pub mod user;
pub mod utils;

pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use service::AuthService;
pub use token::{Claims, TokenService};
pub use user::{
    AuthFuture, LoginRequest, NewUser, PublicUser, RegisterRequest, TokenResponse, User,
    UserRepository,
};
