//! Key/value repository over the `selection_state` table.
//!
//! # Invariants
//! - Values are opaque text; this layer never parses them.
//! - `write_batch` is all-or-nothing.

use crate::db::DbResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable storage for serialized state slots.
pub trait KvRepository {
    /// Returns the raw value stored under `key`, if any.
    fn read_raw(&self, key: &str) -> DbResult<Option<String>>;
    /// Upserts every `(key, raw)` pair in one atomic write.
    fn write_batch(&self, entries: &[(&str, String)]) -> DbResult<()>;
    /// Deletes every key in one atomic write. Absent keys are skipped.
    fn remove_batch(&self, keys: &[&str]) -> DbResult<()>;
}

impl<R: KvRepository + ?Sized> KvRepository for &R {
    fn read_raw(&self, key: &str) -> DbResult<Option<String>> {
        (**self).read_raw(key)
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> DbResult<()> {
        (**self).write_batch(entries)
    }

    fn remove_batch(&self, keys: &[&str]) -> DbResult<()> {
        (**self).remove_batch(keys)
    }
}

/// SQLite-backed key/value repository.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn read_raw(&self, key: &str) -> DbResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM selection_state WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO selection_state (key, value)
                 VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
            )?;
            for (key, raw) in entries {
                stmt.execute(params![key, raw])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_batch(&self, keys: &[&str]) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM selection_state WHERE key = ?1;")?;
            for key in keys {
                stmt.execute([key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
