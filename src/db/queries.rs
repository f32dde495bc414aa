/// Key/value queries
///
/// The registry only ever needs whole-document reads and writes per slot.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;

impl Database {
    /// Read a slot
    ///
    /// # Returns
    /// * `Ok(Some(StoredItem))` - The slot exists
    /// * `Ok(None)` - Nothing has been written under `key` yet
    pub async fn get_item(&self, key: &str) -> Result<Option<StoredItem>> {
        let item = sqlx::query_as::<_, StoredItem>(
            "SELECT key, value, updated_at FROM kv_store WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(item)
    }

    /// Write a slot, replacing whatever was there
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a slot
    ///
    /// Returns true if something was removed.
    pub async fn remove_item(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
