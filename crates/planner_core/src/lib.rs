//! Core domain logic for the planner.
//! This crate is the single source of truth for notes, categories and the
//! calendar computations built on them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{start, CoreConfig, StartupError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId, CategoryValidationError, Rgba};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::theme::BackgroundTheme;
pub use repo::note_repo::{NoteQuery, RepoError, RepoResult};
pub use service::category_board::{count_and_preview, CategoryBoard, CategoryDaySummary};
pub use service::category_notes::CategoryNotes;
pub use service::day_schedule::DaySchedule;
pub use service::entry_form::{CategoryDraft, FormError, TaskDraft};
pub use service::settings::SettingsService;
pub use service::statistics::{statistics_for, StatisticBucket, StatisticPeriod, StatisticsScreen};
pub use service::timer::{Countdown, TimerState};
pub use service::week_strip::WeekStrip;
pub use store::{PlannerStore, StoreChange};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
