//! Use-case services driven by the UI shell.
//!
//! # Responsibility
//! - Hold per-screen state fetched from the store.
//! - Translate store failures into a recorded `last_error` instead of panics.
//! - Provide the pure calendar, statistics and timer computations screens use.

pub mod category_board;
pub mod category_notes;
pub mod day_schedule;
pub mod entry_form;
pub mod settings;
pub mod statistics;
pub mod timer;
pub mod week_strip;
