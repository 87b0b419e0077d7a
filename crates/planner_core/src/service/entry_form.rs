//! Quick-add drafts for categories and tasks.
//!
//! # Responsibility
//! - Hold in-progress form input.
//! - Gate submission on required fields before anything reaches the store.
//!
//! # Invariants
//! - A refused submit leaves the store untouched and the draft unchanged.

use crate::model::category::{random_palette_pair, Category, CategoryId};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::RepoError;
use crate::store::PlannerStore;
use chrono::{NaiveDate, NaiveTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_TASK_HOURS: u32 = 0;
pub const DEFAULT_TASK_MINUTES: u32 = 30;

/// Submission failures of entry forms.
#[derive(Debug)]
pub enum FormError {
    /// A required field is empty.
    Incomplete { field: &'static str },
    /// The drafted record was rejected by validation or the store.
    Repo(RepoError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete { field } => write!(f, "required field `{field}` is empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Incomplete { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for FormError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Draft of a new category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty()
    }

    /// Creates the category with a random palette pair, stamped now.
    pub fn submit(&self, store: &PlannerStore) -> Result<CategoryId, FormError> {
        if !self.can_submit() {
            warn!("event=category_form_submit module=entry_form status=refused field=name");
            return Err(FormError::Incomplete { field: "name" });
        }
        let colors = random_palette_pair();
        let mut category = Category::new(self.name.clone(), colors.background, colors.text);
        category.created_at = Some(Utc::now());
        category.validate().map_err(RepoError::from)?;

        let id = store.insert_category(&category)?;
        info!("event=category_form_submit module=entry_form status=ok category={id}");
        Ok(id)
    }
}

/// Draft of a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub time: Option<NaiveTime>,
    pub duration_hours: u32,
    pub duration_minutes: u32,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category_id: None,
            time: None,
            duration_hours: DEFAULT_TASK_HOURS,
            duration_minutes: DEFAULT_TASK_MINUTES,
        }
    }
}

impl TaskDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and category are both required.
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty() && self.category_id.is_some()
    }

    pub fn total_minutes(&self) -> u32 {
        self.duration_hours
            .saturating_mul(60)
            .saturating_add(self.duration_minutes)
    }

    /// Builds the note this draft describes on `day`.
    pub fn to_note(&self, day: NaiveDate) -> Result<Note, FormError> {
        if self.name.is_empty() {
            return Err(FormError::Incomplete { field: "name" });
        }
        let Some(category_id) = self.category_id else {
            return Err(FormError::Incomplete { field: "category" });
        };

        let mut note = Note::new(self.name.clone(), day)
            .lasting(self.total_minutes())
            .in_category(category_id);
        if let Some(time) = self.time {
            note = note.at(time);
        }
        if !self.description.is_empty() {
            note = note.described(self.description.clone());
        }
        note.validate().map_err(RepoError::from)?;
        Ok(note)
    }

    /// Stores the drafted note on `day`.
    pub fn submit(&self, store: &PlannerStore, day: NaiveDate) -> Result<NoteId, FormError> {
        let note = self.to_note(day).inspect_err(|err| {
            warn!("event=task_form_submit module=entry_form status=refused error={err}");
        })?;
        let id = store.insert_note(&note)?;
        info!("event=task_form_submit module=entry_form status=ok note={id} day={day}");
        Ok(id)
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
