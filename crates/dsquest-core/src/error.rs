//! Typed errors for the curriculum loader and the persistent store.
//!
//! Corrupt stored *content* is never an error (it reads as defaults);
//! these types cover the failures a caller has to show to the user.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving the curriculum.
#[derive(Debug, Error)]
pub enum CurriculumError {
    /// The curriculum document or a lesson file could not be read.
    #[error("failed to fetch {}: {message}", path.display())]
    Fetch { path: PathBuf, message: String },

    /// The curriculum document is not valid curriculum JSON.
    #[error("invalid curriculum {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    /// Two lessons share the same id.
    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(String),

    /// No lesson with the given id exists.
    #[error("lesson not found: {0}")]
    LessonNotFound(String),

    /// No chapter with the given id exists.
    #[error("chapter not found: {0}")]
    ChapterNotFound(String),
}

/// Errors raised by a key/value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode record for key {key}: {message}")]
    Encode { key: String, message: String },
}
