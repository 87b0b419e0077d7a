//! Planner record store.
//!
//! # Responsibility
//! - Own the SQLite connection shared by every screen.
//! - Route note/category/settings reads and writes through the repositories.
//! - Publish one [`StoreChange`] after every successful mutation.
//!
//! # Invariants
//! - Writes are committed before the call returns; a following read observes them.
//! - Failed writes publish nothing.
//! - All access happens on the thread that owns the store.

pub mod changes;

pub use changes::{drain_pending, ChangeFeed, StoreChange};

use crate::db::{open_db, open_db_in_memory};
use crate::model::category::{Category, CategoryId};
use crate::model::note::{Note, NoteId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::note_repo::{
    ensure_connection_ready, NoteQuery, NoteRepository, RepoResult, SqliteNoteRepository,
};
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use log::debug;
use rusqlite::Connection;
use std::path::Path;
use std::sync::mpsc::Receiver;

/// Single-owner store of notes, categories and settings.
pub struct PlannerStore {
    conn: Connection,
    changes: ChangeFeed,
}

impl PlannerStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn,
            changes: ChangeFeed::default(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Subscribes to changes published from now on.
    pub fn subscribe(&self) -> Receiver<StoreChange> {
        self.changes.subscribe()
    }

    pub fn fetch_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>> {
        self.notes()?.list_notes(query)
    }

    pub fn count_notes(&self, query: &NoteQuery) -> RepoResult<u32> {
        self.notes()?.count_notes(query)
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.notes()?.get_note(id)
    }

    pub fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        let id = self.notes()?.create_note(note)?;
        self.announce(StoreChange::NoteCreated(id));
        Ok(id)
    }

    pub fn update_note(&self, note: &Note) -> RepoResult<()> {
        self.notes()?.update_note(note)?;
        self.announce(StoreChange::NoteUpdated(note.id));
        Ok(())
    }

    pub fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.notes()?.delete_note(id)?;
        self.announce(StoreChange::NoteDeleted(id));
        Ok(())
    }

    /// Categories sorted by name.
    pub fn fetch_categories(&self) -> RepoResult<Vec<Category>> {
        self.categories()?.list_categories()
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.categories()?.get_category(id)
    }

    pub fn insert_category(&self, category: &Category) -> RepoResult<CategoryId> {
        let id = self.categories()?.create_category(category)?;
        self.announce(StoreChange::CategoryCreated(id));
        Ok(id)
    }

    pub fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.categories()?.update_category(category)?;
        self.announce(StoreChange::CategoryUpdated(category.id));
        Ok(())
    }

    /// Deletes a category, detaching its notes in the same transaction.
    pub fn delete_category(&self, id: CategoryId) -> RepoResult<usize> {
        let detached_notes = self.categories()?.delete_category(id)?;
        self.announce(StoreChange::CategoryDeleted { id, detached_notes });
        Ok(detached_notes)
    }

    pub fn setting_int(&self, key: &str) -> RepoResult<Option<i64>> {
        SqliteSettingsRepository::try_new(&self.conn)?.get_int(key)
    }

    pub fn set_setting_int(&self, key: &str, value: i64) -> RepoResult<()> {
        SqliteSettingsRepository::try_new(&self.conn)?.set_int(key, value)?;
        self.announce(StoreChange::SettingChanged);
        Ok(())
    }

    fn notes(&self) -> RepoResult<SqliteNoteRepository<'_>> {
        SqliteNoteRepository::try_new(&self.conn)
    }

    fn categories(&self) -> RepoResult<SqliteCategoryRepository<'_>> {
        SqliteCategoryRepository::try_new(&self.conn)
    }

    fn announce(&self, change: StoreChange) {
        debug!("event=store_change module=store status=ok change={change:?}");
        self.changes.publish(change);
    }
}
