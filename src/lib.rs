/// antigravity-projects library
///
/// Keeps the list of known projects, which one is active, and what kind of
/// project each directory is.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod persistence;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{RegistryError, Result};
