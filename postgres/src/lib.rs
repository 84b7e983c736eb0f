//! `PostgreSQL` persistence for Cinebook.
//!
//! Implements the reservation and user traits from `cinebook-core` and
//! `cinebook-auth` on top of a shared sqlx pool. Queries are built at runtime
//! (`query_as` + `FromRow`), so no database is needed at compile time.
//!
//! # Example
//!
//! ```no_run
//! use cinebook_postgres::{PoolSettings, PostgresReservationStore, connect, migrate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect("postgres://localhost/cinebook", &PoolSettings::default()).await?;
//! migrate(&pool).await?;
//! let store = PostgresReservationStore::new(pool);
//! # Ok(())
//! # }
//! ```

mod pool;
mod reservation;
mod user;

pub use pool::{PoolSettings, connect, migrate};
pub use reservation::PostgresReservationStore;
pub use user::PostgresUserRepository;
