/// Error types for antigravity-projects
///
/// Most registry operations never fail: unknown ids are no-ops and detection
/// degrades to `other`. These errors cover the edges around the core:
/// opening storage, reading the durable slot, configuration and CLI input.

use thiserror::Error;

/// Main error type for antigravity-projects operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot could not be handed to durable storage
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Bad input from the UI layer (unknown project type, missing argument)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup by id found nothing. Only raised by the UI layer; the store
    /// itself treats unknown ids as no-ops.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

/// Result type alias for antigravity-projects operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Convert RegistryError to a user-friendly error message
impl RegistryError {
    pub fn user_message(&self) -> String {
        match self {
            RegistryError::Database(e) => {
                format!("Could not read or write the project database. Details: {}", e)
            }
            RegistryError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            RegistryError::Serialization(e) => {
                format!("Stored project data is malformed: {}", e)
            }
            RegistryError::Config(msg) => format!("Configuration issue: {}", msg),
            RegistryError::Persistence(msg) => {
                format!("Changes could not be saved: {}", msg)
            }
            RegistryError::InvalidArgument(msg) => msg.clone(),
            RegistryError::ProjectNotFound(id) => format!("No project with id '{}'", id),
        }
    }
}
