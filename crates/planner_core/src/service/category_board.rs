//! Category aggregator and category board screen.
//!
//! # Responsibility
//! - Count a category's notes on one day and pick the first few as preview.
//! - Hold the category list screen state and category mutations.
//!
//! # Invariants
//! - `count` is the full match count, independent of the preview limit.
//! - Preview order is the store's note order: untimed first, then by time.
//! - A failed summary degrades to an empty one; it never hides the category.

use crate::model::category::{Category, CategoryId};
use crate::model::note::Note;
use crate::repo::note_repo::{NoteQuery, RepoError, RepoResult};
use crate::store::{drain_pending, PlannerStore, StoreChange};
use chrono::NaiveDate;
use log::{error, info};
use std::sync::mpsc::Receiver;

/// Notes shown under each category card.
pub const PREVIEW_LIMIT: u32 = 3;

/// Per-day aggregate of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDaySummary {
    pub count: u32,
    pub preview: Vec<Note>,
}

/// Counts `category_id`'s notes on `day` and returns the first
/// [`PREVIEW_LIMIT`] of them.
pub fn count_and_preview(
    store: &PlannerStore,
    category_id: CategoryId,
    day: NaiveDate,
) -> RepoResult<CategoryDaySummary> {
    let query = NoteQuery::on_day(day).in_category(category_id);
    let count = store.count_notes(&query)?;
    let preview = store.fetch_notes(&query.limited_to(PREVIEW_LIMIT))?;
    Ok(CategoryDaySummary { count, preview })
}

/// A category together with its summary for the board's day.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCard {
    pub category: Category,
    pub summary: CategoryDaySummary,
}

/// Category list screen state.
pub struct CategoryBoard<'s> {
    store: &'s PlannerStore,
    changes: Receiver<StoreChange>,
    day: NaiveDate,
    cards: Vec<CategoryCard>,
    last_error: Option<RepoError>,
}

impl<'s> CategoryBoard<'s> {
    pub fn new(store: &'s PlannerStore, day: NaiveDate) -> Self {
        let mut board = Self {
            store,
            changes: store.subscribe(),
            day,
            cards: Vec::new(),
            last_error: None,
        };
        board.refresh();
        board
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Cards sorted by category name.
    pub fn cards(&self) -> &[CategoryCard] {
        &self.cards
    }

    pub fn last_error(&self) -> Option<&RepoError> {
        self.last_error.as_ref()
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.cards
            .iter()
            .map(|card| &card.category)
            .find(|category| category.id == id)
    }

    /// Name of `id`, or an empty string when unknown.
    pub fn category_name(&self, id: CategoryId) -> &str {
        self.category(id).map_or("", |category| category.name.as_str())
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.day = day;
        self.refresh();
    }

    /// Refetches categories and their summaries.
    ///
    /// A failed category fetch keeps the previous cards. A failed summary
    /// leaves that card empty and records the error.
    pub fn refresh(&mut self) {
        let categories = match self.store.fetch_categories() {
            Ok(categories) => categories,
            Err(err) => {
                self.record_failure("category_fetch", err);
                return;
            }
        };

        self.last_error = None;
        let mut cards = Vec::with_capacity(categories.len());
        for category in categories {
            let summary = match count_and_preview(self.store, category.id, self.day) {
                Ok(summary) => summary,
                Err(err) => {
                    self.record_failure("category_summary", err);
                    CategoryDaySummary::default()
                }
            };
            cards.push(CategoryCard { category, summary });
        }
        self.cards = cards;
    }

    /// Refetches when the store changed since the last call.
    pub fn sync_changes(&mut self) -> bool {
        let changed = drain_pending(&self.changes);
        if changed {
            self.refresh();
        }
        changed
    }

    pub fn create_category(&mut self, category: &Category) -> Option<CategoryId> {
        match self.store.insert_category(category) {
            Ok(id) => {
                info!("event=category_create module=category_board status=ok");
                self.reload();
                Some(id)
            }
            Err(err) => {
                self.record_failure("category_create", err);
                None
            }
        }
    }

    /// Saves edits; a category deleted meanwhile is ignored.
    pub fn update_category(&mut self, category: &Category) {
        match self.store.update_category(category) {
            Ok(()) | Err(RepoError::NotFound(_)) => self.reload(),
            Err(err) => self.record_failure("category_update", err),
        }
    }

    /// Deletes the category; its notes stay with no category.
    pub fn delete_category(&mut self, id: CategoryId) {
        match self.store.delete_category(id) {
            Ok(_) | Err(RepoError::NotFound(_)) => self.reload(),
            Err(err) => self.record_failure("category_delete", err),
        }
    }

    fn reload(&mut self) {
        drain_pending(&self.changes);
        self.refresh();
    }

    fn record_failure(&mut self, event: &str, err: RepoError) {
        error!("event={event} module=category_board status=error day={} error={err}", self.day);
        self.last_error = Some(err);
    }
}
