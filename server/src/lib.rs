//! # Cinebook Server
//!
//! HTTP surface of Cinebook: authentication, throttled movie reservations
//! and a read-only proxy to the TMDB catalog.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | POST | `/auth/register` | - |
//! | POST | `/auth/login` | - |
//! | POST | `/reservation` | bearer |
//! | GET | `/reservation/:userId` | bearer |
//! | DELETE | `/reservation/:id` | bearer |
//! | GET | `/movies`, `/movie/now_playing`, `/search/movie`, `/movie/:id`, `/genre/movie/list` | - |
//! | GET | `/health`, `/ready` | - |

pub mod api;
pub mod auth;
pub mod config;
pub mod health;
pub mod routes;
pub mod state;

pub use auth::AuthUser;
pub use config::{Config, ConfigError};
pub use routes::build_router;
pub use state::AppState;
