//! Axum integration for Cinebook.
//!
//! Shared pieces of the HTTP shell that do not depend on application state:
//!
//! - [`AppError`]: the `{code, message}` error envelope and the mapping from
//!   every domain error to a status code
//! - [`extractors`]: bearer tokens, correlation ids and JSON bodies whose
//!   rejections use the same envelope
//! - [`middleware`]: per-request correlation id and tracing span
//!
//! # Request Flow
//!
//! 1. **Correlation layer** assigns an id and opens a span
//! 2. **Extractors** parse the token, path and body
//! 3. **Handler** calls a domain service
//! 4. **Domain error** converts into [`AppError`] via `From`
//! 5. **Response** carries the correlation id header

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{BearerToken, CorrelationId, ValidJson, ValidPath, ValidQuery};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationIdLayer, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
