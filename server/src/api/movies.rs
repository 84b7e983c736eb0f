//! Movie catalog proxy endpoints (public).
//!
//! - GET /movies?page&sort_by - Discover movies
//! - GET /movie/now_playing - Movies in theatres
//! - GET /search/movie?query - Title search
//! - GET /movie/:movie_id - Movie details
//! - GET /genre/movie/list - Genres

use crate::state::AppState;
use axum::{Json, extract::State};
use cinebook_catalog::{DiscoverQuery, GenreList, MovieDetails, MovieResponse};
use cinebook_web::{AppError, ValidPath, ValidQuery};
use serde::Deserialize;

/// Highest page TMDB serves.
const MAX_PAGE: u32 = 500;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters of `GET /movies`.
#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    /// 1-based page (default 1)
    pub page: Option<u32>,
    /// TMDB sort key (default `popularity.desc`)
    pub sort_by: Option<String>,
}

/// Query parameters of `GET /search/movie`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Title fragment
    #[serde(default)]
    pub query: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Discover movies.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:3000/movies?page=2&sort_by=vote_average.desc"
/// ```
pub async fn discover(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DiscoverParams>,
) -> Result<Json<MovieResponse>, AppError> {
    let page = params.page.unwrap_or(1);
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(AppError::validation(format!("page must be between 1 and {MAX_PAGE}")));
    }

    let sort_by = params
        .sort_by
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DiscoverQuery::DEFAULT_SORT.to_string());

    let movies = state.catalog.discover(DiscoverQuery { page, sort_by }).await?;
    Ok(Json(movies))
}

/// Movies currently in theatres.
pub async fn now_playing(State(state): State<AppState>) -> Result<Json<MovieResponse>, AppError> {
    Ok(Json(state.catalog.now_playing().await?))
}

/// Search movies by title.
///
/// # Errors
///
/// - 422: missing or blank `query`
pub async fn search(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SearchParams>,
) -> Result<Json<MovieResponse>, AppError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::validation("query must not be empty"));
    }

    Ok(Json(state.catalog.search(query.to_string()).await?))
}

/// Details of one movie.
///
/// # Errors
///
/// - 404: unknown movie id
pub async fn movie(
    State(state): State<AppState>,
    ValidPath(movie_id): ValidPath<i64>,
) -> Result<Json<MovieDetails>, AppError> {
    Ok(Json(state.catalog.movie(movie_id).await?))
}

/// All movie genres.
pub async fn genres(State(state): State<AppState>) -> Result<Json<GenreList>, AppError> {
    Ok(Json(state.catalog.genres().await?))
}
