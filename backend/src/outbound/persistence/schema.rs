//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Credential store: one row per registered account.
    users (user_id) {
        /// Primary key, generated by the database.
        user_id -> Int4,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 hash; NULL for accounts created by an OAuth login.
        password_hash -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Venue directory: external identifier to surrogate key mapping.
    venues (venue_id) {
        /// Primary key, generated by the database; never leaves the backend.
        venue_id -> Int4,
        /// External identifier in the upstream directory, unique.
        venue_yelp_id -> Varchar,
    }
}

diesel::table! {
    /// Attendance ledger joining users to venues. The composite primary key
    /// makes attendance idempotent at the storage layer.
    users_venues (user_id, venue_id) {
        /// References `users.user_id`.
        user_id -> Int4,
        /// References `venues.venue_id`.
        venue_id -> Int4,
    }
}

diesel::joinable!(users_venues -> users (user_id));
diesel::joinable!(users_venues -> venues (venue_id));

diesel::allow_tables_to_appear_in_same_query!(users, venues, users_venues);
