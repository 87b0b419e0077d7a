//! Period statistics engine.
//!
//! # Responsibility
//! - Cut a reference day's week, month, half-year or year into labeled buckets.
//! - Count notes per bucket through the store's count operation.
//! - Hold the statistics screen state (selected period, buckets, last error).
//!
//! # Invariants
//! - Buckets are half-open `[start, end)` day ranges in chronological order.
//! - Week buckets start on the Monday on or before the reference day.
//! - Month arithmetic rolls over year boundaries.
//! - Changing the period recomputes every bucket from scratch.

use crate::repo::note_repo::{NoteQuery, RepoError, RepoResult};
use crate::store::{drain_pending, PlannerStore, StoreChange};
use chrono::{Datelike, Days, Local, NaiveDate};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MAX_MONTH_BUCKETS: u32 = 4;
const HALF_YEAR_MONTHS: i32 = 6;

/// Aggregation window selectable on the statistics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticPeriod {
    #[default]
    Week,
    Month,
    HalfYear,
    Year,
}

impl StatisticPeriod {
    pub const ALL: [StatisticPeriod; 4] = [Self::Week, Self::Month, Self::HalfYear, Self::Year];

    /// Short code shown on the period picker.
    pub fn code(self) -> &'static str {
        match self {
            Self::Week => "W",
            Self::Month => "M",
            Self::HalfYear => "6M",
            Self::Year => "Y",
        }
    }
}

/// Labeled day range before counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketWindow {
    pub label: String,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

/// Counted bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: u32,
}

/// Computes the bucket boundaries of `period` around `reference`.
pub fn bucket_windows(period: StatisticPeriod, reference: NaiveDate) -> Vec<BucketWindow> {
    match period {
        StatisticPeriod::Week => week_windows(reference),
        StatisticPeriod::Month => month_windows(reference),
        StatisticPeriod::HalfYear => half_year_windows(reference),
        StatisticPeriod::Year => year_windows(reference),
    }
}

/// Counts notes per bucket of `period` around `reference`.
pub fn statistics_for(
    store: &PlannerStore,
    period: StatisticPeriod,
    reference: NaiveDate,
) -> RepoResult<Vec<StatisticBucket>> {
    bucket_windows(period, reference)
        .into_iter()
        .map(|window| {
            let count = store.count_notes(&NoteQuery::between(window.start, window.end))?;
            Ok(StatisticBucket {
                label: window.label,
                start: window.start,
                end: window.end,
                count,
            })
        })
        .collect()
}

/// Largest bucket count, floored at 1 so bar heights can divide by it.
pub fn max_count_value(buckets: &[StatisticBucket]) -> u32 {
    buckets
        .iter()
        .map(|bucket| bucket.count)
        .max()
        .unwrap_or(0)
        .max(1)
}

fn week_windows(reference: NaiveDate) -> Vec<BucketWindow> {
    // Sunday=1 .. Saturday=7.
    let weekday = reference.weekday().number_from_sunday();
    let days_to_subtract = if weekday == 1 { 6 } else { weekday - 2 };
    let Some(monday) = reference.checked_sub_days(Days::new(u64::from(days_to_subtract))) else {
        return Vec::new();
    };

    WEEKDAY_LABELS
        .iter()
        .zip(0u64..)
        .filter_map(|(label, offset)| {
            let start = monday.checked_add_days(Days::new(offset))?;
            Some(BucketWindow {
                label: (*label).to_string(),
                start,
                end: start.succ_opt()?,
            })
        })
        .collect()
}

fn month_windows(reference: NaiveDate) -> Vec<BucketWindow> {
    let Some(first) = first_of_month(reference.year(), reference.month()) else {
        return Vec::new();
    };
    let (next_year, next_month) = shift_month(reference.year(), reference.month(), 1);
    let Some(next_first) = first_of_month(next_year, next_month) else {
        return Vec::new();
    };

    let days_in_month = (next_first - first).num_days() as u32;
    let bucket_count = MAX_MONTH_BUCKETS.min(days_in_month.div_ceil(7));

    (0..bucket_count)
        .filter_map(|index| {
            let start = first.checked_add_days(Days::new(u64::from(index * 7)))?;
            let end = if index + 1 < bucket_count {
                first.checked_add_days(Days::new(u64::from((index + 1) * 7)))?
            } else {
                next_first
            };
            Some(BucketWindow {
                label: format!("W{}", index + 1),
                start,
                end,
            })
        })
        .collect()
}

fn half_year_windows(reference: NaiveDate) -> Vec<BucketWindow> {
    (0..HALF_YEAR_MONTHS)
        .rev()
        .filter_map(|back| {
            let (year, month) = shift_month(reference.year(), reference.month(), -back);
            month_window(year, month)
        })
        .collect()
}

fn year_windows(reference: NaiveDate) -> Vec<BucketWindow> {
    (1..=12)
        .filter_map(|month| month_window(reference.year(), month))
        .collect()
}

fn month_window(year: i32, month: u32) -> Option<BucketWindow> {
    let start = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    Some(BucketWindow {
        label: MONTH_LABELS[(month - 1) as usize].to_string(),
        start,
        end: first_of_month(next_year, next_month)?,
    })
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Moves `(year, month)` by `delta` months; `month` is 1-based.
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

/// Statistics screen state.
pub struct StatisticsScreen<'s> {
    store: &'s PlannerStore,
    changes: Receiver<StoreChange>,
    selected: StatisticPeriod,
    pinned_reference: Option<NaiveDate>,
    buckets: Vec<StatisticBucket>,
    last_error: Option<RepoError>,
}

impl<'s> StatisticsScreen<'s> {
    /// Opens the screen on the week period, counted around today.
    pub fn new(store: &'s PlannerStore) -> Self {
        Self::build(store, None)
    }

    /// Opens the screen counted around a fixed reference day.
    pub fn pinned_to(store: &'s PlannerStore, reference: NaiveDate) -> Self {
        Self::build(store, Some(reference))
    }

    fn build(store: &'s PlannerStore, pinned_reference: Option<NaiveDate>) -> Self {
        let mut screen = Self {
            store,
            changes: store.subscribe(),
            selected: StatisticPeriod::default(),
            pinned_reference,
            buckets: Vec::new(),
            last_error: None,
        };
        screen.refresh();
        screen
    }

    pub fn selected_period(&self) -> StatisticPeriod {
        self.selected
    }

    pub fn buckets(&self) -> &[StatisticBucket] {
        &self.buckets
    }

    pub fn last_error(&self) -> Option<&RepoError> {
        self.last_error.as_ref()
    }

    pub fn max_count_value(&self) -> u32 {
        max_count_value(&self.buckets)
    }

    /// Switches period and recomputes all buckets. A failed recount keeps
    /// the previous period.
    pub fn select_period(&mut self, period: StatisticPeriod) {
        self.load(period);
    }

    /// Recounts the selected period. On failure the previous buckets stay.
    pub fn refresh(&mut self) {
        self.load(self.selected);
    }

    /// Counts `period`; the period and its buckets change together on success.
    fn load(&mut self, period: StatisticPeriod) {
        let reference = self
            .pinned_reference
            .unwrap_or_else(|| Local::now().date_naive());
        match statistics_for(self.store, period, reference) {
            Ok(buckets) => {
                info!(
                    "event=statistics_refresh module=statistics status=ok period={} buckets={} total={}",
                    period.code(),
                    buckets.len(),
                    buckets.iter().map(|bucket| bucket.count).sum::<u32>()
                );
                self.selected = period;
                self.buckets = buckets;
                self.last_error = None;
            }
            Err(err) => {
                error!(
                    "event=statistics_refresh module=statistics status=error period={} error={err}",
                    period.code()
                );
                self.last_error = Some(err);
            }
        }
    }

    /// Recounts when the store changed since the last call.
    pub fn sync_changes(&mut self) -> bool {
        let changed = drain_pending(&self.changes);
        if changed {
            self.refresh();
        }
        changed
    }
}
