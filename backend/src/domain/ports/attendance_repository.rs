//! Port abstraction for the venue directory and attendance ledger.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by attendance ledger adapters.
    pub enum AttendanceError {
        /// Repository connection could not be established.
        Connection { message: String } => "attendance store connection failed: {message}",
        /// Query or transaction failed during execution.
        Query { message: String } => "attendance store query failed: {message}",
    }
}

/// Venue directory and attendance ledger.
///
/// Venues are created lazily the first time any caller references an unseen
/// external identifier. Both mutations run as a single atomic transaction
/// spanning the venue resolve-or-create and the ledger write, so a failed
/// ledger write never commits a venue row on its own.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Mark the user as attending the venue. Idempotent: adding an existing
    /// pairing leaves exactly one ledger row.
    async fn add_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError>;

    /// Remove the pairing if present. Unknown venues and absent pairings are
    /// successful no-ops, not errors.
    async fn remove_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError>;

    /// External identifiers of every venue the user plans to attend.
    /// Ordering is unspecified.
    async fn list_attendance_ids(&self, user_id: i32) -> Result<Vec<String>, AttendanceError>;

    /// Number of users attending the venue; 0 for venues never seen.
    async fn count_attendees(&self, venue_yelp_id: &str) -> Result<i64, AttendanceError>;
}
