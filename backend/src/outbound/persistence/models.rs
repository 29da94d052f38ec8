//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{users, users_venues, venues};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i32,
    pub username: String,
    pub password_hash: Option<String>,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: Option<&'a str>,
}

/// Insertable struct for lazily creating venue records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = venues)]
pub(crate) struct NewVenueRow<'a> {
    pub venue_yelp_id: &'a str,
}

/// Insertable struct for ledger rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users_venues)]
pub(crate) struct NewAttendanceRow {
    pub user_id: i32,
    pub venue_id: i32,
}
