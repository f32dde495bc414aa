/// Data models for database entities

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One durable slot in the key/value table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredItem {
    pub key: String,
    pub value: String,      // JSON document
    pub updated_at: String, // ISO 8601 format from SQLite
}
