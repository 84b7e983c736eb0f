//! TMDB API client implementation

use crate::error::CatalogError;
use crate::types::{DiscoverQuery, GenreList, MovieDetails, MovieResponse};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

/// Public TMDB v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Boxed future returned by [`MovieCatalog`] methods.
pub type CatalogFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'a>>;

/// Movie listings used by the HTTP layer.
///
/// # Implementations
///
/// - [`TmdbClient`]: production
/// - `StubCatalog` (in `cinebook-testing`): tests
pub trait MovieCatalog: Send + Sync {
    /// A discover page.
    fn discover(&self, query: DiscoverQuery) -> CatalogFuture<'_, MovieResponse>;

    /// Movies currently in theatres.
    fn now_playing(&self) -> CatalogFuture<'_, MovieResponse>;

    /// Title search.
    fn search(&self, query: String) -> CatalogFuture<'_, MovieResponse>;

    /// Details of one movie.
    fn movie(&self, id: i64) -> CatalogFuture<'_, MovieDetails>;

    /// All movie genres.
    fn genres(&self) -> CatalogFuture<'_, GenreList>;
}

/// TMDB API client
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    bearer_token: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a new client with the bearer token from the environment
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingApiKey` if `MOVIE_BEARER_TOKEN` is not set
    pub fn from_env() -> Result<Self, CatalogError> {
        let token = std::env::var("MOVIE_BEARER_TOKEN").map_err(|_| CatalogError::MissingApiKey)?;
        Ok(Self::new(token))
    }

    /// Create a new client against the public TMDB endpoint
    #[must_use]
    pub fn new(bearer_token: String) -> Self {
        Self::with_base_url(bearer_token, DEFAULT_BASE_URL)
    }

    /// Create a new client against a custom endpoint (proxies, tests)
    #[must_use]
    pub fn with_base_url(bearer_token: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            bearer_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.bearer_token)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| CatalogError::ResponseParseFailed(e.to_string())),
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), path, "TMDB request failed");
                Err(CatalogError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    /// `GET /discover/movie`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn fetch_discover(&self, query: &DiscoverQuery) -> Result<MovieResponse, CatalogError> {
        self.get(
            "/discover/movie",
            &[("page", query.page.to_string()), ("sort_by", query.sort_by.clone())],
        )
        .await
    }

    /// `GET /movie/now_playing`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn fetch_now_playing(&self) -> Result<MovieResponse, CatalogError> {
        self.get("/movie/now_playing", &[]).await
    }

    /// `GET /search/movie`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn fetch_search(&self, query: &str) -> Result<MovieResponse, CatalogError> {
        self.get("/search/movie", &[("query", query.to_string())]).await
    }

    /// `GET /movie/{id}`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown ids, plus the usual
    /// network, API and parsing failures
    pub async fn fetch_movie(&self, id: i64) -> Result<MovieDetails, CatalogError> {
        self.get(&format!("/movie/{id}"), &[]).await
    }

    /// `GET /genre/movie/list`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn fetch_genres(&self) -> Result<GenreList, CatalogError> {
        self.get("/genre/movie/list", &[]).await
    }
}

impl MovieCatalog for TmdbClient {
    fn discover(&self, query: DiscoverQuery) -> CatalogFuture<'_, MovieResponse> {
        Box::pin(async move { self.fetch_discover(&query).await })
    }

    fn now_playing(&self) -> CatalogFuture<'_, MovieResponse> {
        Box::pin(self.fetch_now_playing())
    }

    fn search(&self, query: String) -> CatalogFuture<'_, MovieResponse> {
        Box::pin(async move { self.fetch_search(&query).await })
    }

    fn movie(&self, id: i64) -> CatalogFuture<'_, MovieDetails> {
        Box::pin(self.fetch_movie(id))
    }

    fn genres(&self) -> CatalogFuture<'_, GenreList> {
        Box::pin(self.fetch_genres())
    }
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TmdbClient::new("test-token".to_string());
        assert_eq!(client.bearer_token, "test-token");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = TmdbClient::with_base_url("t".to_string(), "http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn debug_hides_token() {
        let client = TmdbClient::new("secret-token".to_string());
        assert!(!format!("{client:?}").contains("secret-token"));
    }
}
