//! Note (task) domain model.
//!
//! # Responsibility
//! - Define the time-boxed record shown on the calendar and in statistics.
//! - Provide derived time helpers used by schedule and list screens.
//!
//! # Invariants
//! - `day` is the calendar day the note belongs to, independent of `time`.
//! - `time == None` means an untimed (all-day) note.
//! - `duration_minutes` is strictly positive.

use crate::model::category::CategoryId;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Duration given to notes created without an explicit one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Validation failures for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Name is empty or whitespace only.
    BlankName,
    /// Duration is zero minutes.
    ZeroDuration,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "note name cannot be blank"),
            Self::ZeroDuration => write!(f, "note duration must be greater than zero minutes"),
        }
    }
}

impl Error for NoteValidationError {}

/// A user task/event placed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    /// Optional long-form text.
    pub description: Option<String>,
    pub day: NaiveDate,
    /// Start time-of-day. `None` keeps the note off the hour grid.
    pub time: Option<NaiveTime>,
    pub duration_minutes: u32,
    /// Foreign key to the owning category, cleared when the category is deleted.
    pub category_id: Option<CategoryId>,
}

impl Note {
    /// Creates an untimed note on `day` with a fresh id and default duration.
    pub fn new(name: impl Into<String>, day: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), name, day)
    }

    /// Creates an untimed note with a caller-provided id.
    pub fn with_id(id: NoteId, name: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            day,
            time: None,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            category_id: None,
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn lasting(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks write-time invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.name.trim().is_empty() {
            return Err(NoteValidationError::BlankName);
        }
        if self.duration_minutes == 0 {
            return Err(NoteValidationError::ZeroDuration);
        }
        Ok(())
    }

    /// Hour-of-day of the start time, `None` for untimed notes.
    pub fn hour(&self) -> Option<u32> {
        self.time.map(|time| time.hour())
    }

    /// Minute within the start hour, `None` for untimed notes.
    pub fn minute(&self) -> Option<u32> {
        self.time.map(|time| time.minute())
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.time.map(|time| self.day.and_time(time))
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.starts_at()
            .map(|start| start + Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Whether the note is already over at `now`.
    ///
    /// Untimed notes are never past. A timed note on `now`'s day is past once
    /// its end has passed; timed notes on earlier days are always past.
    pub fn is_past_at(&self, now: NaiveDateTime) -> bool {
        let Some(end) = self.ends_at() else {
            return false;
        };
        if self.day == now.date() {
            now > end
        } else {
            self.day < now.date()
        }
    }

    /// `"HH:MM-HH:MM"` span label; empty for untimed notes.
    pub fn time_range_label(&self) -> String {
        let Some(start) = self.time else {
            return String::new();
        };
        let end = start + Duration::minutes(i64::from(self.duration_minutes));
        format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
    }
}
