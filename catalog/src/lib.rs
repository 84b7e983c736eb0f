//! # TMDB movie catalog
//!
//! Read-only client for the movie listings the frontend browses before
//! making a reservation.
//!
//! ## Example
//!
//! ```no_run
//! use cinebook_catalog::{DiscoverQuery, MovieCatalog, TmdbClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads MOVIE_BEARER_TOKEN
//!     let client = TmdbClient::from_env()?;
//!
//!     let page = client.discover(DiscoverQuery::default()).await?;
//!     println!("{} movies", page.total_results);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{CatalogFuture, MovieCatalog, TmdbClient, DEFAULT_BASE_URL};
pub use error::CatalogError;
pub use types::{DiscoverQuery, Genre, GenreList, Movie, MovieDetails, MovieResponse};
