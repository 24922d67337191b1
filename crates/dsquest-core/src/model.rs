//! Core data model types for dsquest.
//!
//! The curriculum is an ordered tree of chapters and lessons. It is loaded
//! once at startup and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};

/// The whole curriculum: ordered chapters, each with ordered lessons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// An ordered group of lessons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique identifier, used in routes and export paths.
    pub id: String,
    /// Decorative emoji shown before the title.
    #[serde(default)]
    pub emoji: String,
    /// Human-readable title.
    pub title: String,
    /// One-line description shown on the map.
    #[serde(default)]
    pub blurb: String,
    /// The lessons in this chapter.
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// The atomic curriculum unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Identifier, unique across the whole curriculum.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// XP awarded on first completion.
    #[serde(default)]
    pub xp: u64,
    /// Path of the Markdown explanation, relative to the curriculum file.
    #[serde(default)]
    pub md: String,
    /// Source text the editor starts with.
    #[serde(default)]
    pub starter: String,
    /// Checks run against the captured output, in order.
    #[serde(default)]
    pub tests: Vec<TestExpectation>,
}

/// A declarative check against captured program output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestExpectation {
    /// The normalized output must equal `expected` exactly.
    StdoutEquals { expected: String },
    /// The normalized output must contain every fragment.
    StdoutContains {
        #[serde(deserialize_with = "one_or_many")]
        expected: Vec<String>,
    },
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// A lesson together with the chapter that contains it.
#[derive(Debug, Clone, Copy)]
pub struct LessonRef<'a> {
    pub chapter: &'a Chapter,
    pub lesson: &'a Lesson,
}

/// The lessons before and after a lesson in curriculum order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
}

impl Curriculum {
    /// Find a chapter by id.
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// Find a lesson (and its chapter) by id.
    pub fn lesson(&self, id: &str) -> Option<LessonRef<'_>> {
        self.lessons().find(|r| r.lesson.id == id)
    }

    /// Iterate over every lesson in curriculum order.
    pub fn lessons(&self) -> impl Iterator<Item = LessonRef<'_>> {
        self.chapters.iter().flat_map(|chapter| {
            chapter
                .lessons
                .iter()
                .map(move |lesson| LessonRef { chapter, lesson })
        })
    }

    /// Total number of lessons across all chapters.
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }

    /// Previous and next lesson across chapter boundaries.
    ///
    /// An unknown id has neither neighbor.
    pub fn neighbors(&self, lesson_id: &str) -> Neighbors<'_> {
        let flat: Vec<&Lesson> = self.lessons().map(|r| r.lesson).collect();
        let Some(idx) = flat.iter().position(|l| l.id == lesson_id) else {
            return Neighbors::default();
        };
        Neighbors {
            prev: idx.checked_sub(1).map(|i| flat[i]),
            next: flat.get(idx + 1).copied(),
        }
    }
}
