//! dsquest-core — Curriculum model, progress bookkeeping, routing and checks.
//!
//! This crate defines the data model and the storage, routing and
//! code-checking logic that the rest of dsquest builds on.

pub mod checks;
pub mod error;
pub mod model;
pub mod parser;
pub mod progress;
pub mod repository;
pub mod router;
pub mod runner;
pub mod store;
pub mod traits;

pub use error::{CurriculumError, StoreError};

#[cfg(test)]
pub(crate) mod fixtures;
