//! dsquest-report — Terminal views and code export.
//!
//! Pure renderers for every routed view plus the ZIP and single-file
//! exports of lesson code.

pub mod export;
pub mod views;

pub use export::{collect_export, slugify, ExportBundle, DEFAULT_EXPORT_NAME};
pub use views::LessonPage;
