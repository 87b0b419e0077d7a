//! Notes of one category on one day.

use crate::model::category::Category;
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteQuery, RepoError};
use crate::store::{drain_pending, PlannerStore, StoreChange};
use chrono::NaiveDate;
use log::error;
use std::sync::mpsc::Receiver;

/// `"HH:MM • N min"`; the time part is empty for untimed notes.
pub fn time_and_duration_label(note: &Note) -> String {
    let time = note
        .time
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default();
    format!("{time} • {} min", note.duration_minutes)
}

/// Category detail screen state.
pub struct CategoryNotes<'s> {
    store: &'s PlannerStore,
    changes: Receiver<StoreChange>,
    category: Category,
    day: NaiveDate,
    notes: Vec<Note>,
    last_error: Option<RepoError>,
}

impl<'s> CategoryNotes<'s> {
    pub fn new(store: &'s PlannerStore, category: Category, day: NaiveDate) -> Self {
        let mut screen = Self {
            store,
            changes: store.subscribe(),
            category,
            day,
            notes: Vec::new(),
            last_error: None,
        };
        screen.fetch_notes(day);
        screen
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn last_error(&self) -> Option<&RepoError> {
        self.last_error.as_ref()
    }

    /// Switches to `day` and loads the category's notes on it. A failed fetch
    /// leaves the list empty.
    pub fn fetch_notes(&mut self, day: NaiveDate) {
        self.day = day;
        let query = NoteQuery::on_day(day).in_category(self.category.id);
        match self.store.fetch_notes(&query) {
            Ok(notes) => {
                self.notes = notes;
                self.last_error = None;
            }
            Err(err) => {
                self.notes.clear();
                self.record_failure("category_notes_fetch", err);
            }
        }
    }

    pub fn sync_changes(&mut self) -> bool {
        let changed = drain_pending(&self.changes);
        if changed {
            self.fetch_notes(self.day);
        }
        changed
    }

    pub fn delete_note(&mut self, id: NoteId) {
        match self.store.delete_note(id) {
            Ok(()) | Err(RepoError::NotFound(_)) => {
                drain_pending(&self.changes);
                self.fetch_notes(self.day);
            }
            Err(err) => self.record_failure("note_delete", err),
        }
    }

    fn record_failure(&mut self, event: &str, err: RepoError) {
        error!(
            "event={event} module=category_notes status=error category={} error={err}",
            self.category.id
        );
        self.last_error = Some(err);
    }
}
