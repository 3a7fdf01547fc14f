//! Durable key-value storage for application state.
//!
//! Every public operation is best-effort: failures are logged and the caller
//! gets the default value (for loads) or nothing (for writes). Nothing here
//! ever returns an error to the tracker.

mod schema;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("storage medium unavailable")]
    Unavailable,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) struct Store {
    conn: Option<Connection>,
}

impl Store {
    /// Open (or create) the store at `path`. A file that cannot be opened
    /// yields a detached store instead of an error.
    pub(crate) fn open(path: &Path) -> Self {
        match Self::try_open(path) {
            Ok(conn) => {
                tracing::info!(path = %path.display(), "opened store");
                Self { conn: Some(conn) }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to open store, running without persistence: {e}");
                Self::detached()
            }
        }
    }

    fn try_open(path: &Path) -> Result<Connection, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(conn)
    }

    /// A store with no backing medium: loads return defaults, writes are dropped.
    pub(crate) fn detached() -> Self {
        Self { conn: None }
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().ok().and_then(|conn| {
            conn.execute_batch(schema::SCHEMA).ok()?;
            Some(conn)
        });
        Self { conn }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Unavailable)
    }

    // ── Public, infallible API ────────────────────────────────

    pub(crate) fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match self.try_save(key, value) {
            Ok(()) => tracing::debug!(key, "saved"),
            Err(StoreError::Unavailable) => tracing::debug!(key, "store detached, save skipped"),
            Err(e) => tracing::error!(key, "error saving data: {e}"),
        }
    }

    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) | Err(StoreError::Unavailable) => default,
            Err(e) => {
                tracing::error!(key, "error loading data, using default: {e}");
                default
            }
        }
    }

    pub(crate) fn remove(&self, key: &str) {
        match self.try_remove(key) {
            Ok(()) => tracing::debug!(key, "removed"),
            Err(StoreError::Unavailable) => {}
            Err(e) => tracing::error!(key, "error removing data: {e}"),
        }
    }

    // ── Fallible internals ────────────────────────────────────

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let text = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, text, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let conn = self.conn()?;
        let text: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match text {
            Some(t) => Ok(Some(serde_json::from_str(&t)?)),
            None => Ok(None),
        }
    }

    fn try_remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.conn
            .as_ref()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .ok()
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, text: &str) {
        if let Some(conn) = &self.conn {
            let _ = conn.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, '')",
                params![key, text],
            );
        }
    }
}

#[cfg(test)]
mod tests;
