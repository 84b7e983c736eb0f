//! `PostgreSQL` user repository.

use chrono::{DateTime, Utc};
use cinebook_auth::{AuthError, AuthFuture, NewUser, User, UserRepository};
use cinebook_core::{ReservationError, StoreFuture, UserDirectory, UserId};
use sqlx::{FromRow, PgPool};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// User persistence backed by the `users` table.
///
/// Also serves as the [`UserDirectory`] the reservation service consults
/// before listing a user's reservations.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    fn create_user(&self, user: NewUser) -> AuthFuture<'_, User> {
        Box::pin(async move {
            let row: UserRow = sqlx::query_as(
                "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
                 RETURNING id, username, email, password_hash, created_at",
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Concurrent registrations can both pass the service's
                // pre-check; the unique index decides.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::EmailAlreadyRegistered;
                    }
                }
                AuthError::DatabaseError(format!("Failed to create user: {e}"))
            })?;

            metrics::counter!("postgres.users.inserted").increment(1);
            Ok(row.into())
        })
    }

    fn find_by_email<'a>(&'a self, email: &'a str) -> AuthFuture<'a, Option<User>> {
        Box::pin(async move {
            let row: Option<UserRow> = sqlx::query_as(
                "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to get user: {e}")))?;
            Ok(row.map(Into::into))
        })
    }
}

impl UserDirectory for PostgresUserRepository {
    fn user_exists(&self, user_id: UserId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| ReservationError::Storage(format!("Failed to check user: {e}")))?;
            Ok(exists)
        })
    }
}

impl std::fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresUserRepository").finish_non_exhaustive()
    }
}
