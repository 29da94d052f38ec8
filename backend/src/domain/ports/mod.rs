//! Port abstractions between the domain and its adapters.
//!
//! Each port is an object-safe trait paired with its own error enum so
//! adapters stay swappable and the HTTP layer never depends on a concrete
//! store or upstream client.

pub mod attendance_repository;
pub mod business_directory;
mod macros;
pub mod oauth_exchange;
pub mod password_hasher;
pub mod user_repository;

pub use attendance_repository::{AttendanceError, AttendanceRepository};
pub use business_directory::{BusinessDirectory, DirectoryError, SearchFilters};
pub use oauth_exchange::{OAuthExchange, OAuthExchangeError};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use user_repository::{UserPersistenceError, UserRepository};

pub(crate) use macros::define_port_error;
