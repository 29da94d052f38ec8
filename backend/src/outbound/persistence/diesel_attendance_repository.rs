//! PostgreSQL-backed `AttendanceRepository` implementation using Diesel ORM.
//!
//! Every mutation runs inside one `AsyncConnection::transaction`, covering
//! both the lazy venue resolve-or-create and the ledger write. Rollback on
//! any failure means a venue row is never committed without its companion
//! ledger change, and `ON CONFLICT DO NOTHING` keeps both inserts race-safe
//! and idempotent.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{AttendanceError, AttendanceRepository};

use super::models::{NewAttendanceRow, NewVenueRow};
use super::pool::{DbPool, PoolError};
use super::schema::{users_venues, venues};

/// Diesel-backed implementation of the `AttendanceRepository` port.
#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain attendance errors.
fn map_pool_error(error: PoolError) -> AttendanceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AttendanceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain attendance errors.
fn map_diesel_error(error: diesel::result::Error) -> AttendanceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            AttendanceError::query("unknown user or venue reference")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AttendanceError::connection("database connection error")
        }
        _ => AttendanceError::query("database error"),
    }
}

/// Resolve the surrogate key for an external venue id, creating the venue on
/// first sight. Runs inside the caller's transaction: the conflict-tolerant
/// insert serialises concurrent first references, and the follow-up select
/// observes whichever row won.
async fn resolve_or_create_venue(
    conn: &mut AsyncPgConnection,
    venue_yelp_id: &str,
) -> Result<i32, diesel::result::Error> {
    diesel::insert_into(venues::table)
        .values(NewVenueRow { venue_yelp_id })
        .on_conflict(venues::venue_yelp_id)
        .do_nothing()
        .execute(conn)
        .await?;

    venues::table
        .filter(venues::venue_yelp_id.eq(venue_yelp_id))
        .select(venues::venue_id)
        .first(conn)
        .await
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn add_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let venue_id = resolve_or_create_venue(conn, venue_yelp_id).await?;
                diesel::insert_into(users_venues::table)
                    .values(NewAttendanceRow { user_id, venue_id })
                    .on_conflict((users_venues::user_id, users_venues::venue_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn remove_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let venue_id: Option<i32> = venues::table
                    .filter(venues::venue_yelp_id.eq(venue_yelp_id))
                    .select(venues::venue_id)
                    .first(conn)
                    .await
                    .optional()?;

                // Unknown venue: the pair is already not-attending.
                let Some(venue_id) = venue_id else {
                    return Ok(());
                };

                diesel::delete(
                    users_venues::table
                        .filter(users_venues::user_id.eq(user_id))
                        .filter(users_venues::venue_id.eq(venue_id)),
                )
                .execute(conn)
                .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_attendance_ids(&self, user_id: i32) -> Result<Vec<String>, AttendanceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users_venues::table
            .inner_join(venues::table)
            .filter(users_venues::user_id.eq(user_id))
            .select(venues::venue_yelp_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_attendees(&self, venue_yelp_id: &str) -> Result<i64, AttendanceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One transaction so the venue lookup and the count observe the same
        // snapshot.
        conn.transaction(|conn| {
            async move {
                let venue_id: Option<i32> = venues::table
                    .filter(venues::venue_yelp_id.eq(venue_yelp_id))
                    .select(venues::venue_id)
                    .first(conn)
                    .await
                    .optional()?;

                let Some(venue_id) = venue_id else {
                    return Ok(0);
                };

                users_venues::table
                    .filter(users_venues::venue_id.eq(venue_id))
                    .count()
                    .get_result(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
