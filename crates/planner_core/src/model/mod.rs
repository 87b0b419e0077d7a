//! Planner domain model.
//!
//! # Responsibility
//! - Define the records persisted by the store: notes and categories.
//! - Hold value types shared by services (colors, themes).
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - A note references its category by id only; it never owns it.

pub mod category;
pub mod note;
pub mod theme;
