/// Database module for antigravity-projects
///
/// Durable key/value slots on top of SQLite and sqlx.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats};
pub use models::*;
