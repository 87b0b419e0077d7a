//! Key-value settings persistence.
//!
//! # Invariants
//! - One integer value per key; writes replace the previous value.

use crate::repo::note_repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for integer preferences.
pub trait SettingsRepository {
    fn get_int(&self, key: &str) -> RepoResult<Option<i64>>;
    fn set_int(&self, key: &str, value: i64) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_int(&self, key: &str) -> RepoResult<Option<i64>> {
        let value = self
            .conn
            .query_row(
                "SELECT int_value FROM settings WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_int(&self, key: &str, value: i64) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, int_value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET int_value = excluded.int_value;",
            params![key, value],
        )?;
        Ok(())
    }
}
