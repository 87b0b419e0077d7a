//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts the store and services depend on.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod category_repo;
pub mod note_repo;
pub mod settings_repo;
