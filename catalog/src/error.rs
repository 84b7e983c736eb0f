//! Error types for the TMDB client

use thiserror::Error;

/// Errors that can occur when talking to TMDB
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Missing `MOVIE_BEARER_TOKEN` environment variable
    #[error("Missing MOVIE_BEARER_TOKEN environment variable")]
    MissingApiKey,

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The requested movie does not exist
    #[error("Movie not found")]
    NotFound,

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid bearer token
    #[error("Unauthorized - invalid bearer token")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from API
        message: String,
    },
}
