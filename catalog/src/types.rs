//! Catalog payloads, in TMDB's snake_case wire format.
//!
//! Fields TMDB sometimes omits or nulls are defaulted so a sparse record
//! never fails the whole page.

use serde::{Deserialize, Serialize};

/// A movie as it appears in list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie id
    pub id: i64,
    /// Localized title
    #[serde(default)]
    pub title: String,
    /// Backdrop image path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Plot summary
    #[serde(default)]
    pub overview: String,
    /// `YYYY-MM-DD`, empty when unknown
    #[serde(default)]
    pub release_date: String,
    /// Genre ids, see [`Genre`]
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: String,
    /// Title in the original language
    #[serde(default)]
    pub original_title: String,
    /// TMDB popularity score
    #[serde(default)]
    pub popularity: f64,
    /// Whether this entry is a video rather than a feature
    #[serde(default)]
    pub video: bool,
    /// Mean rating, 0-10
    #[serde(default)]
    pub vote_average: f64,
    /// Number of ratings
    #[serde(default)]
    pub vote_count: i64,
    /// Adult content flag
    #[serde(default)]
    pub adult: bool,
}

/// One page of movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    /// 1-based page number
    pub page: u32,
    /// Movies on this page
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Number of pages available
    #[serde(default)]
    pub total_pages: u32,
    /// Number of movies across all pages
    #[serde(default)]
    pub total_results: u64,
}

/// A genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id
    pub id: i64,
    /// Display name
    pub name: String,
}

/// Response of the genre list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// All movie genres
    pub genres: Vec<Genre>,
}

/// Full record of a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie id
    pub id: i64,
    /// Localized title
    #[serde(default)]
    pub title: String,
    /// Plot summary
    #[serde(default)]
    pub overview: String,
    /// One-line tagline
    #[serde(default)]
    pub tagline: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status, e.g. `Released`
    #[serde(default)]
    pub status: Option<String>,
    /// Official site
    #[serde(default)]
    pub homepage: Option<String>,
    /// `YYYY-MM-DD`, empty when unknown
    #[serde(default)]
    pub release_date: String,
    /// Genres, expanded
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Backdrop image path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path
    #[serde(default)]
    pub poster_path: Option<String>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: String,
    /// Title in the original language
    #[serde(default)]
    pub original_title: String,
    /// TMDB popularity score
    #[serde(default)]
    pub popularity: f64,
    /// Mean rating, 0-10
    #[serde(default)]
    pub vote_average: f64,
    /// Number of ratings
    #[serde(default)]
    pub vote_count: i64,
    /// Adult content flag
    #[serde(default)]
    pub adult: bool,
    /// Whether this entry is a video rather than a feature
    #[serde(default)]
    pub video: bool,
}

/// Parameters of the discover endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverQuery {
    /// 1-based page
    pub page: u32,
    /// TMDB sort key, e.g. `popularity.desc`
    pub sort_by: String,
}

impl DiscoverQuery {
    /// Default sort order.
    pub const DEFAULT_SORT: &'static str = "popularity.desc";
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort_by: Self::DEFAULT_SORT.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sparse_movie_deserializes() {
        let movie: Movie = serde_json::from_str(r#"{"id": 438631, "title": "Dune", "poster_path": null}"#).unwrap();
        assert_eq!(movie.id, 438_631);
        assert_eq!(movie.poster_path, None);
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn discover_defaults() {
        let query = DiscoverQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.sort_by, "popularity.desc");
    }
}
