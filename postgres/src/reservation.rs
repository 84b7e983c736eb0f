//! `PostgreSQL` reservation store.
//!
//! # Admission atomicity
//!
//! `insert_if_admitted` runs in one transaction that first takes
//! `SHARE ROW EXCLUSIVE` on the `reservations` table. The mode conflicts with
//! itself and with the `ROW EXCLUSIVE` lock taken by plain inserts, so
//! concurrent admissions serialize: each one reads the latest row only after
//! the previous writer has committed.

use chrono::{DateTime, Utc};
use cinebook_core::{
    AdmissionDecision, AdmissionPolicy, NewReservation, Reservation, ReservationError,
    ReservationId, ReservationStore, StoreFuture, UserId,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

const COLUMNS: &str = "id, movie_name, user_id, reservation_date";

#[derive(Debug, FromRow)]
struct ReservationRow {
    id: i64,
    movie_name: String,
    user_id: i64,
    reservation_date: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: ReservationId(row.id),
            movie_name: row.movie_name,
            user_id: UserId(row.user_id),
            reservation_date: row.reservation_date,
        }
    }
}

fn storage(context: &'static str) -> impl Fn(sqlx::Error) -> ReservationError {
    move |e| ReservationError::Storage(format!("{context}: {e}"))
}

/// Reservation persistence backed by the `reservations` table.
#[derive(Clone)]
pub struct PostgresReservationStore {
    pool: PgPool,
}

impl PostgresReservationStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_row(
        executor: &mut Transaction<'_, Postgres>,
        reservation: &NewReservation,
    ) -> Result<Reservation, ReservationError> {
        let row: ReservationRow = sqlx::query_as(&format!(
            "INSERT INTO reservations (movie_name, user_id, reservation_date) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(reservation.movie_name())
        .bind(reservation.user_id().0)
        .bind(reservation.reservation_date())
        .fetch_one(&mut **executor)
        .await
        .map_err(storage("Failed to insert reservation"))?;

        Ok(row.into())
    }

    async fn admit(
        &self,
        reservation: NewReservation,
        policy: AdmissionPolicy,
        now: DateTime<Utc>,
    ) -> Result<Reservation, ReservationError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to begin transaction"))?;

        sqlx::query("LOCK TABLE reservations IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(storage("Failed to lock reservations"))?;

        let latest: Option<Reservation> = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {COLUMNS} FROM reservations ORDER BY reservation_date DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage("Failed to read latest reservation"))?
        .map(Into::into);

        match policy.evaluate(latest.as_ref(), now) {
            AdmissionDecision::Denied { reopens_at } => {
                tx.rollback()
                    .await
                    .map_err(storage("Failed to roll back"))?;
                Err(ReservationError::AdmissionDenied { reopens_at })
            },
            AdmissionDecision::Admitted => {
                let created = Self::insert_row(&mut tx, &reservation).await?;
                tx.commit()
                    .await
                    .map_err(storage("Failed to commit reservation"))?;
                metrics::counter!("postgres.reservations.inserted").increment(1);
                Ok(created)
            },
        }
    }
}

impl ReservationStore for PostgresReservationStore {
    fn find_latest(&self) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(async move {
            let row: Option<ReservationRow> = sqlx::query_as(&format!(
                "SELECT {COLUMNS} FROM reservations ORDER BY reservation_date DESC, id DESC LIMIT 1"
            ))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to read latest reservation"))?;
            Ok(row.map(Into::into))
        })
    }

    fn insert(&self, reservation: NewReservation) -> StoreFuture<'_, Reservation> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(storage("Failed to begin transaction"))?;
            let created = Self::insert_row(&mut tx, &reservation).await?;
            tx.commit()
                .await
                .map_err(storage("Failed to commit reservation"))?;
            Ok(created)
        })
    }

    fn insert_if_admitted(
        &self,
        reservation: NewReservation,
        policy: AdmissionPolicy,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Reservation> {
        Box::pin(self.admit(reservation, policy, now))
    }

    fn find_by_id(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(async move {
            let row: Option<ReservationRow> =
                sqlx::query_as(&format!("SELECT {COLUMNS} FROM reservations WHERE id = $1"))
                    .bind(id.0)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(storage("Failed to get reservation"))?;
            Ok(row.map(Into::into))
        })
    }

    fn find_all_by_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Reservation>> {
        Box::pin(async move {
            let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
                "SELECT {COLUMNS} FROM reservations WHERE user_id = $1 ORDER BY id"
            ))
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(storage("Failed to list reservations"))?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn delete(&self, id: ReservationId) -> StoreFuture<'_, Option<Reservation>> {
        Box::pin(async move {
            let row: Option<ReservationRow> = sqlx::query_as(&format!(
                "DELETE FROM reservations WHERE id = $1 RETURNING {COLUMNS}"
            ))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to delete reservation"))?;
            Ok(row.map(Into::into))
        })
    }

    fn check_health(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(storage("Health check failed"))?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for PostgresReservationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresReservationStore").finish_non_exhaustive()
    }
}
