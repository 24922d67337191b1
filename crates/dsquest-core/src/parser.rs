//! Curriculum document loader.
//!
//! Loads the JSON curriculum once at startup, resolves lesson Markdown
//! relative to the document, and validates it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::CurriculumError;
use crate::model::{Curriculum, Lesson};

/// A loaded curriculum plus the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct CurriculumSource {
    pub curriculum: Curriculum,
    root: PathBuf,
}

impl CurriculumSource {
    /// Wrap an already-parsed curriculum whose lesson paths resolve against `root`.
    pub fn new(curriculum: Curriculum, root: impl Into<PathBuf>) -> Self {
        Self {
            curriculum,
            root: root.into(),
        }
    }

    /// Absolute-or-relative path of a lesson's Markdown file.
    pub fn lesson_path(&self, lesson: &Lesson) -> PathBuf {
        self.root.join(&lesson.md)
    }

    /// Fetch the Markdown text for a lesson.
    pub async fn fetch_lesson_text(&self, lesson: &Lesson) -> Result<String, CurriculumError> {
        let path = self.lesson_path(lesson);
        tracing::debug!("fetching lesson text from {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CurriculumError::Fetch {
                path,
                message: e.to_string(),
            })
    }
}

/// Load a curriculum document from disk.
pub fn load_curriculum(path: &Path) -> Result<CurriculumSource, CurriculumError> {
    let content = std::fs::read_to_string(path).map_err(|e| CurriculumError::Fetch {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let curriculum = parse_curriculum_str(&content, path)?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(CurriculumSource::new(curriculum, root))
}

/// Parse curriculum JSON, rejecting duplicate lesson ids.
pub fn parse_curriculum_str(
    content: &str,
    source_path: &Path,
) -> Result<Curriculum, CurriculumError> {
    let curriculum: Curriculum =
        serde_json::from_str(content).map_err(|e| CurriculumError::Invalid {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    for r in curriculum.lessons() {
        if !seen.insert(r.lesson.id.as_str()) {
            return Err(CurriculumError::DuplicateLesson(r.lesson.id.clone()));
        }
    }

    Ok(curriculum)
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The lesson or chapter id (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a loaded curriculum for common authoring mistakes.
pub fn validate_curriculum(source: &CurriculumSource) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let curriculum = &source.curriculum;

    let mut seen_chapters = HashSet::new();
    for chapter in &curriculum.chapters {
        if !seen_chapters.insert(&chapter.id) {
            warnings.push(ValidationWarning {
                item_id: Some(chapter.id.clone()),
                message: format!("duplicate chapter ID: {}", chapter.id),
            });
        }
        if chapter.lessons.is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(chapter.id.clone()),
                message: "chapter has no lessons".into(),
            });
        }
    }

    for r in curriculum.lessons() {
        let lesson = r.lesson;
        if lesson.md.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(lesson.id.clone()),
                message: "lesson has no Markdown file".into(),
            });
        } else if !source.lesson_path(lesson).is_file() {
            warnings.push(ValidationWarning {
                item_id: Some(lesson.id.clone()),
                message: format!(
                    "Markdown file not found: {}",
                    source.lesson_path(lesson).display()
                ),
            });
        }
        if lesson.tests.is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(lesson.id.clone()),
                message: "lesson has no tests and always passes".into(),
            });
        }
        if lesson.xp == 0 {
            warnings.push(ValidationWarning {
                item_id: Some(lesson.id.clone()),
                message: "lesson awards no XP".into(),
            });
        }
    }

    warnings
}
