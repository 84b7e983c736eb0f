//! Canned movie catalog.

use cinebook_catalog::{
    CatalogError, CatalogFuture, DiscoverQuery, Genre, GenreList, Movie, MovieCatalog,
    MovieDetails, MovieResponse,
};
use std::future::ready;
use std::sync::Mutex;

/// [`MovieCatalog`] serving a fixed list of movies.
///
/// `search` matches titles case-insensitively; `movie` returns
/// [`CatalogError::NotFound`] for ids outside the list. A failure set with
/// [`fail_with`](Self::fail_with) is returned by every call instead.
#[derive(Debug)]
pub struct StubCatalog {
    movies: Vec<Movie>,
    genres: Vec<Genre>,
    failure: Mutex<Option<CatalogError>>,
}

impl StubCatalog {
    /// Catalog with two movies and two genres.
    #[must_use]
    pub fn new() -> Self {
        Self {
            movies: vec![movie(438_631, "Dune", &[878, 12]), movie(329_865, "Arrival", &[878, 18])],
            genres: vec![
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
                Genre {
                    id: 18,
                    name: "Drama".to_string(),
                },
            ],
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: CatalogError) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(error);
        }
    }

    fn check(&self) -> Result<(), CatalogError> {
        match self.failure.lock() {
            Ok(failure) => failure.clone().map_or(Ok(()), Err),
            Err(_) => Err(CatalogError::RequestFailed("stub mutex poisoned".to_string())),
        }
    }
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn page(page: u32, movies: Vec<Movie>) -> MovieResponse {
    MovieResponse {
        page,
        total_pages: 1,
        total_results: movies.len() as u64,
        results: movies,
    }
}

fn movie(id: i64, title: &str, genre_ids: &[i64]) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        backdrop_path: None,
        poster_path: Some(format!("/{id}.jpg")),
        overview: String::new(),
        release_date: "2021-09-15".to_string(),
        genre_ids: genre_ids.to_vec(),
        original_language: "en".to_string(),
        original_title: title.to_string(),
        popularity: 100.0,
        video: false,
        vote_average: 7.5,
        vote_count: 1000,
        adult: false,
    }
}

impl MovieCatalog for StubCatalog {
    fn discover(&self, query: DiscoverQuery) -> CatalogFuture<'_, MovieResponse> {
        let result = self.check().map(|()| page(query.page, self.movies.clone()));
        Box::pin(ready(result))
    }

    fn now_playing(&self) -> CatalogFuture<'_, MovieResponse> {
        let result = self.check().map(|()| page(1, self.movies.clone()));
        Box::pin(ready(result))
    }

    fn search(&self, query: String) -> CatalogFuture<'_, MovieResponse> {
        let needle = query.to_lowercase();
        let result = self.check().map(|()| {
            let hits = self
                .movies
                .iter()
                .filter(|m| m.title.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            page(1, hits)
        });
        Box::pin(ready(result))
    }

    fn movie(&self, id: i64) -> CatalogFuture<'_, MovieDetails> {
        let result = self.check().and_then(|()| {
            let found = self.movies.iter().find(|m| m.id == id).ok_or(CatalogError::NotFound)?;
            Ok(MovieDetails {
                id: found.id,
                title: found.title.clone(),
                overview: found.overview.clone(),
                tagline: None,
                runtime: Some(120),
                status: Some("Released".to_string()),
                homepage: None,
                release_date: found.release_date.clone(),
                genres: self
                    .genres
                    .iter()
                    .filter(|g| found.genre_ids.contains(&g.id))
                    .cloned()
                    .collect(),
                backdrop_path: found.backdrop_path.clone(),
                poster_path: found.poster_path.clone(),
                original_language: found.original_language.clone(),
                original_title: found.original_title.clone(),
                popularity: found.popularity,
                vote_average: found.vote_average,
                vote_count: found.vote_count,
                adult: found.adult,
                video: found.video,
            })
        });
        Box::pin(ready(result))
    }

    fn genres(&self) -> CatalogFuture<'_, GenreList> {
        let result = self.check().map(|()| GenreList {
            genres: self.genres.clone(),
        });
        Box::pin(ready(result))
    }
}
