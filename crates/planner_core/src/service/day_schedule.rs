//! Day scheduler: hour buckets and block layout for one calendar day.
//!
//! # Responsibility
//! - Bucket a day's notes by hour-of-day.
//! - Compute vertical offset and height of each time block in its hour row.
//! - Hold the day schedule screen state and its note mutations.
//!
//! # Invariants
//! - Untimed notes never appear in an hour bucket.
//! - Blocks in the same hour are positioned independently; overlapping notes
//!   overlap on screen.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteQuery, RepoError};
use crate::store::{drain_pending, PlannerStore, StoreChange};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use log::{error, info};
use std::sync::mpsc::Receiver;

pub const HOURS_PER_DAY: u32 = 24;
/// Height of one hour row in layout units.
pub const HOUR_ROW_HEIGHT: f64 = 70.0;
/// Space taken by the hour label at the top of every row.
pub const ROW_LABEL_INSET: f64 = 35.0;
/// Hour scrolled to when the displayed day is not today.
pub const DEFAULT_SCROLL_HOUR: u32 = 8;

/// Position of a time block inside its hour row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLayout {
    pub offset: f64,
    pub height: f64,
}

/// Notes whose start time falls inside `hour`.
pub fn notes_for_hour(hour: u32, notes: &[Note]) -> Vec<&Note> {
    notes
        .iter()
        .filter(|note| note.hour() == Some(hour))
        .collect()
}

/// Layout of `note` in a row `hour_row_height` tall; `None` when untimed.
pub fn block_layout(note: &Note, hour_row_height: f64) -> Option<BlockLayout> {
    let minute = note.minute()?;
    Some(BlockLayout {
        offset: f64::from(minute) / 60.0 * hour_row_height + ROW_LABEL_INSET,
        height: f64::from(note.duration_minutes) / 60.0 * hour_row_height,
    })
}

/// Hour the schedule opens on: one hour before now for today, else 8.
pub fn initial_scroll_hour(displayed: NaiveDate, now: NaiveDateTime) -> u32 {
    if displayed == now.date() {
        now.hour().saturating_sub(1)
    } else {
        DEFAULT_SCROLL_HOUR
    }
}

/// `"HH:00"` row label.
pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Whether the row for `hour` on `displayed` lies entirely before `now`'s hour.
pub fn is_past_hour(hour: u32, displayed: NaiveDate, now: NaiveDateTime) -> bool {
    if displayed != now.date() {
        return displayed < now.date();
    }
    hour < now.hour()
}

/// One hour row with its positioned blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct HourRow<'a> {
    pub hour: u32,
    pub label: String,
    pub blocks: Vec<(&'a Note, BlockLayout)>,
}

/// Day schedule screen state.
pub struct DaySchedule<'s> {
    store: &'s PlannerStore,
    changes: Receiver<StoreChange>,
    day: NaiveDate,
    notes: Vec<Note>,
    last_error: Option<RepoError>,
}

impl<'s> DaySchedule<'s> {
    pub fn new(store: &'s PlannerStore, day: NaiveDate) -> Self {
        let mut schedule = Self {
            store,
            changes: store.subscribe(),
            day,
            notes: Vec::new(),
            last_error: None,
        };
        schedule.refresh();
        schedule
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Notes of the day sorted by time, untimed first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn last_error(&self) -> Option<&RepoError> {
        self.last_error.as_ref()
    }

    pub fn notes_for_hour(&self, hour: u32) -> Vec<&Note> {
        notes_for_hour(hour, &self.notes)
    }

    /// Every hour of the day with the blocks that start in it.
    pub fn hour_rows(&self, hour_row_height: f64) -> Vec<HourRow<'_>> {
        (0..HOURS_PER_DAY)
            .map(|hour| HourRow {
                hour,
                label: hour_label(hour),
                blocks: self
                    .notes_for_hour(hour)
                    .into_iter()
                    .filter_map(|note| Some((note, block_layout(note, hour_row_height)?)))
                    .collect(),
            })
            .collect()
    }

    pub fn initial_scroll_hour(&self) -> u32 {
        initial_scroll_hour(self.day, Local::now().naive_local())
    }

    pub fn update_date(&mut self, day: NaiveDate) {
        self.day = day;
        self.refresh();
    }

    /// Refetches the day. On failure the previous notes stay.
    pub fn refresh(&mut self) {
        match self.store.fetch_notes(&NoteQuery::on_day(self.day)) {
            Ok(notes) => {
                self.notes = notes;
                self.last_error = None;
            }
            Err(err) => self.record_failure("day_fetch", err),
        }
    }

    /// Refetches when the store changed since the last call.
    pub fn sync_changes(&mut self) -> bool {
        let changed = drain_pending(&self.changes);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Stores `note` on this screen's day.
    pub fn create_note(&mut self, mut note: Note) -> Option<NoteId> {
        note.day = self.day;
        match self.store.insert_note(&note) {
            Ok(id) => {
                info!("event=note_create module=day_schedule status=ok");
                self.reload();
                Some(id)
            }
            Err(err) => {
                self.record_failure("note_create", err);
                None
            }
        }
    }

    /// Saves edits; a note deleted meanwhile is ignored.
    pub fn update_note(&mut self, note: &Note) {
        match self.store.update_note(note) {
            Ok(()) | Err(RepoError::NotFound(_)) => self.reload(),
            Err(err) => self.record_failure("note_update", err),
        }
    }

    pub fn delete_note(&mut self, id: NoteId) {
        match self.store.delete_note(id) {
            Ok(()) | Err(RepoError::NotFound(_)) => self.reload(),
            Err(err) => self.record_failure("note_delete", err),
        }
    }

    fn reload(&mut self) {
        drain_pending(&self.changes);
        self.refresh();
    }

    fn record_failure(&mut self, event: &str, err: RepoError) {
        error!("event={event} module=day_schedule status=error day={} error={err}", self.day);
        self.last_error = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        block_layout, hour_label, initial_scroll_hour, is_past_hour, notes_for_hour,
        BlockLayout, DEFAULT_SCROLL_HOUR, HOUR_ROW_HEIGHT,
    };
    use crate::model::note::Note;
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn notes_for_hour_matches_hour_component_only() {
        let notes = vec![
            Note::new("a", day()).at(hm(9, 0)),
            Note::new("b", day()).at(hm(9, 59)),
            Note::new("c", day()).at(hm(10, 0)),
            Note::new("untimed", day()),
        ];
        let nine: Vec<_> = notes_for_hour(9, &notes).iter().map(|n| n.name.as_str()).collect();
        assert_eq!(nine, ["a", "b"]);
        assert_eq!(notes_for_hour(10, &notes).len(), 1);

        let bucketed: usize = (0..24).map(|hour| notes_for_hour(hour, &notes).len()).sum();
        assert_eq!(bucketed, 3);
    }

    #[test]
    fn block_layout_scales_minutes_and_duration() {
        let note = Note::new("focus", day()).at(hm(14, 30)).lasting(90);
        assert_eq!(
            block_layout(&note, HOUR_ROW_HEIGHT),
            Some(BlockLayout {
                offset: 35.0 + 35.0,
                height: 105.0,
            })
        );
        assert_eq!(block_layout(&Note::new("untimed", day()), HOUR_ROW_HEIGHT), None);
    }

    #[test]
    fn overlapping_notes_keep_independent_offsets() {
        let first = Note::new("one", day()).at(hm(11, 0)).lasting(60);
        let second = Note::new("two", day()).at(hm(11, 0)).lasting(30);
        let a = block_layout(&first, 60.0).unwrap();
        let b = block_layout(&second, 60.0).unwrap();
        assert_eq!(a.offset, b.offset);
    }

    #[test]
    fn initial_scroll_targets_previous_hour_today_and_eight_otherwise() {
        assert_eq!(initial_scroll_hour(day(), day().and_time(hm(15, 20))), 14);
        assert_eq!(initial_scroll_hour(day(), day().and_time(hm(0, 10))), 0);
        let tomorrow = day().succ_opt().unwrap();
        assert_eq!(
            initial_scroll_hour(tomorrow, day().and_time(hm(15, 20))),
            DEFAULT_SCROLL_HOUR
        );
    }

    #[test]
    fn hour_rows_helpers_format_and_compare() {
        assert_eq!(hour_label(7), "07:00");
        let now = day().and_time(hm(10, 5));
        assert!(is_past_hour(9, day(), now));
        assert!(!is_past_hour(10, day(), now));
        assert!(is_past_hour(23, day().pred_opt().unwrap(), now));
        assert!(!is_past_hour(0, day().succ_opt().unwrap(), now));
    }
}
