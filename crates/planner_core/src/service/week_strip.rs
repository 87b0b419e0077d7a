//! Week strip navigator for horizontal calendar paging.
//!
//! # Responsibility
//! - Track the Monday of the centered week and the live drag offset.
//! - Expose the 21-day window: previous, current and next week.
//!
//! # Invariants
//! - `current_start` is always a Monday.
//! - The window is `[current_start - 7, current_start + 14)`.
//! - The drag offset is zero whenever no drag is in progress.

use chrono::{Datelike, Days, NaiveDate};

/// Net horizontal displacement needed to page to another week.
pub const DRAG_THRESHOLD: f64 = 50.0;
pub const WINDOW_DAYS: u64 = 21;
const WEEK_DAYS: u64 = 7;

/// Monday of the week containing `day`.
pub fn monday_of(day: NaiveDate) -> NaiveDate {
    let back = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

/// First letter of the abbreviated weekday, e.g. `"M"` for Monday.
pub fn weekday_initial(day: NaiveDate) -> String {
    day.format("%a").to_string().chars().take(1).collect()
}

pub fn is_today(day: NaiveDate, today: NaiveDate) -> bool {
    day == today
}

pub fn is_past_day(day: NaiveDate, today: NaiveDate) -> bool {
    day < today
}

/// Week strip state.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekStrip {
    current_start: NaiveDate,
    drag_offset: f64,
}

impl WeekStrip {
    /// Centers the strip on the week containing `pivot`.
    pub fn new(pivot: NaiveDate) -> Self {
        Self {
            current_start: monday_of(pivot),
            drag_offset: 0.0,
        }
    }

    pub fn current_start(&self) -> NaiveDate {
        self.current_start
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    /// Recenters on the week of a newly selected day.
    pub fn set_pivot(&mut self, pivot: NaiveDate) {
        self.current_start = monday_of(pivot);
    }

    /// The 21 consecutive days around the current week.
    pub fn days(&self) -> Vec<NaiveDate> {
        let Some(first) = self.current_start.checked_sub_days(Days::new(WEEK_DAYS)) else {
            return Vec::new();
        };
        first
            .iter_days()
            .take(WINDOW_DAYS as usize)
            .collect()
    }

    /// Records the live horizontal translation of an ongoing drag.
    pub fn drag_changed(&mut self, translation: f64) {
        self.drag_offset = translation;
    }

    /// Finishes a drag: pages past the threshold, then snaps the offset back.
    pub fn drag_ended(&mut self) {
        if self.drag_offset > DRAG_THRESHOLD {
            self.move_week(false);
        } else if self.drag_offset < -DRAG_THRESHOLD {
            self.move_week(true);
        }
        self.drag_offset = 0.0;
    }

    /// Shifts the centered week by one.
    pub fn move_week(&mut self, forward: bool) {
        let days = Days::new(WEEK_DAYS);
        let shifted = if forward {
            self.current_start.checked_add_days(days)
        } else {
            self.current_start.checked_sub_days(days)
        };
        if let Some(start) = shifted {
            self.current_start = start;
        }
    }

    pub fn is_selected(&self, day: NaiveDate, selected: NaiveDate) -> bool {
        day == selected
    }
}

#[cfg(test)]
mod tests {
    use super::{is_past_day, is_today, monday_of, weekday_initial, WeekStrip, WINDOW_DAYS};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pivot_snaps_to_monday() {
        assert_eq!(monday_of(day(2024, 5, 15)), day(2024, 5, 13));
        assert_eq!(monday_of(day(2024, 5, 19)), day(2024, 5, 13));
        assert_eq!(monday_of(day(2024, 5, 13)), day(2024, 5, 13));
        assert_eq!(monday_of(day(2025, 1, 1)), day(2024, 12, 30));
    }

    #[test]
    fn window_spans_previous_current_and_next_week() {
        let strip = WeekStrip::new(day(2024, 5, 15));
        let days = strip.days();
        assert_eq!(days.len() as u64, WINDOW_DAYS);
        assert_eq!(days[0], day(2024, 5, 6));
        assert_eq!(days[7], day(2024, 5, 13));
        assert_eq!(days[20], day(2024, 5, 26));
        assert_eq!(days[0].weekday(), Weekday::Mon);
    }

    #[test]
    fn left_drag_past_threshold_moves_forward() {
        let mut strip = WeekStrip::new(day(2024, 5, 13));
        strip.drag_changed(-60.0);
        strip.drag_ended();
        assert_eq!(strip.current_start(), day(2024, 5, 20));
        assert_eq!(strip.drag_offset(), 0.0);
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut strip = WeekStrip::new(day(2024, 5, 13));
        strip.drag_changed(-40.0);
        assert_eq!(strip.drag_offset(), -40.0);
        strip.drag_ended();
        assert_eq!(strip.current_start(), day(2024, 5, 13));
        assert_eq!(strip.drag_offset(), 0.0);

        strip.drag_changed(50.0);
        strip.drag_ended();
        assert_eq!(strip.current_start(), day(2024, 5, 13));
    }

    #[test]
    fn right_drag_past_threshold_moves_back() {
        let mut strip = WeekStrip::new(day(2024, 5, 13));
        strip.drag_changed(75.0);
        strip.drag_ended();
        assert_eq!(strip.current_start(), day(2024, 5, 6));
    }

    #[test]
    fn set_pivot_recenters_on_new_week() {
        let mut strip = WeekStrip::new(day(2024, 5, 13));
        strip.set_pivot(day(2024, 6, 2));
        assert_eq!(strip.current_start(), day(2024, 5, 27));
    }

    #[test]
    fn day_helpers() {
        assert_eq!(weekday_initial(day(2024, 5, 13)), "M");
        assert_eq!(weekday_initial(day(2024, 5, 18)), "S");
        assert!(is_past_day(day(2024, 5, 12), day(2024, 5, 13)));
        assert!(!is_past_day(day(2024, 5, 13), day(2024, 5, 13)));
        assert!(is_today(day(2024, 5, 13), day(2024, 5, 13)));
        let strip = WeekStrip::new(day(2024, 5, 13));
        assert!(strip.is_selected(day(2024, 5, 14), day(2024, 5, 14)));
    }
}
