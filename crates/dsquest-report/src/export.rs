//! ZIP export of every lesson's code, plus single-lesson downloads.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use dsquest_core::model::{Chapter, Curriculum, Lesson};
use dsquest_core::progress::ProgressStore;

/// File name used when no output path is given.
pub const DEFAULT_EXPORT_NAME: &str = "dsquest_my_code.zip";

/// Summary file placed at the archive root.
pub const README_NAME: &str = "README_EXPORT.txt";

const SLUG_MAX: usize = 50;

/// Lowercase, runs outside `[a-z0-9]` collapsed to `_`, trimmed of `_`, then
/// cut to 50 chars.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_sep = false;
    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    // Only ASCII is pushed, so byte truncation is safe.
    slug.truncate(SLUG_MAX);
    slug
}

pub fn chapter_dir_name(chapter: &Chapter) -> String {
    format!("{}_{}", chapter.id, slugify(&chapter.title))
}

pub fn lesson_file_name(lesson: &Lesson) -> String {
    format!("{}_{}.py", lesson.id, slugify(&lesson.title))
}

/// One file of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub path: String,
    pub contents: String,
}

/// The archive contents, assembled before anything is written.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub entries: Vec<ExportEntry>,
}

/// Gather every lesson's current code (saved or starter) in curriculum order.
pub fn collect_export(
    curriculum: &Curriculum,
    store: &ProgressStore,
    exported_at: DateTime<Utc>,
) -> Result<ExportBundle> {
    let progress = store.get_progress().context("failed to read progress")?;

    let mut entries = vec![ExportEntry {
        path: README_NAME.to_string(),
        contents: format!(
            "This ZIP was exported from Data Science Quest.\n\
             It contains your saved lesson code files.\n\
             Completed lessons: {}\n\
             Total XP: {}\n\
             Exported at: {}\n",
            progress.completed_count(),
            progress.xp,
            exported_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    }];

    for chapter in &curriculum.chapters {
        let dir = chapter_dir_name(chapter);
        for lesson in &chapter.lessons {
            let code = store
                .current_code(lesson)
                .with_context(|| format!("failed to read saved code for {}", lesson.id))?;
            entries.push(ExportEntry {
                path: format!("{dir}/{}", lesson_file_name(lesson)),
                contents: code,
            });
        }
    }

    tracing::debug!("collected {} export entries", entries.len());
    Ok(ExportBundle { entries })
}

impl ExportBundle {
    /// Archive paths in insertion order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    /// Encode the bundle as a deflated ZIP in memory.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            zip.start_file(entry.path.as_str(), options)
                .with_context(|| format!("failed to add {} to archive", entry.path))?;
            zip.write_all(entry.contents.as_bytes())
                .with_context(|| format!("failed to write {} to archive", entry.path))?;
        }

        let cursor = zip.finish().context("failed to finish archive")?;
        Ok(cursor.into_inner())
    }

    /// Build the archive, then write it to `path` in one step.
    pub fn write_zip(&self, path: &Path) -> Result<()> {
        let bytes = self.to_zip_bytes()?;
        write_atomically(path, &bytes)?;
        tracing::info!(
            "exported {} files to {}",
            self.entries.len().saturating_sub(1),
            path.display()
        );
        Ok(())
    }
}

/// Write one lesson's code as `<lessonId>_<slug>.py` inside `dir`.
pub fn write_lesson_file(dir: &Path, lesson: &Lesson, code: &str) -> Result<PathBuf> {
    let path = dir.join(lesson_file_name(lesson));
    write_atomically(&path, code.as_bytes())?;
    Ok(path)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::Arc;

    use dsquest_core::repository::KvProgressRepository;
    use dsquest_core::store::MemoryStore;

    const CURRICULUM: &str = r#"{
      "chapters": [
        {"id": "c1", "emoji": "🐍", "title": "Python Basics!", "blurb": "",
         "lessons": [
           {"id": "l1", "title": "Hello, World", "xp": 50, "md": "l1.md", "starter": "print('hi')"},
           {"id": "l2", "title": "Lists & Loops", "xp": 75, "md": "l2.md", "starter": "xs = []"}
         ]},
        {"id": "c2", "emoji": "🐼", "title": "Pandas 101", "blurb": "",
         "lessons": [{"id": "l3", "title": "Series", "xp": 100, "md": "l3.md"}]}
      ]
    }"#;

    fn setup() -> (Curriculum, ProgressStore) {
        let curriculum = serde_json::from_str(CURRICULUM).unwrap();
        let repo = KvProgressRepository::new(Arc::new(MemoryStore::new()));
        (curriculum, ProgressStore::new(Arc::new(repo)))
    }

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-14T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn slug_rules() {
        assert_eq!(slugify("Hello, World"), "hello_world");
        assert_eq!(slugify("  --Lists & Loops--  "), "lists_loops");
        assert_eq!(slugify("Pandas 101"), "pandas_101");
        assert_eq!(slugify("Café au lait"), "caf_au_lait");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(&"a".repeat(80)).len(), 50);
        // Trimming happens before the cut.
        let s = format!("{} b", "a".repeat(49));
        assert_eq!(slugify(&s), format!("{}_", "a".repeat(49)));
    }

    #[test]
    fn one_file_per_lesson_with_saved_code() {
        let (curriculum, store) = setup();
        store.save_code("l2", "xs = [1, 2, 3]\n").unwrap();
        store.set_completed("l1", 50).unwrap();

        let bundle = collect_export(&curriculum, &store, timestamp()).unwrap();
        assert_eq!(
            bundle.paths(),
            vec![
                "README_EXPORT.txt",
                "c1_python_basics/l1_hello_world.py",
                "c1_python_basics/l2_lists_loops.py",
                "c2_pandas_101/l3_series.py",
            ]
        );
        assert_eq!(bundle.entries[1].contents, "print('hi')");
        assert_eq!(bundle.entries[2].contents, "xs = [1, 2, 3]\n");
        assert_eq!(bundle.entries[3].contents, "");

        let readme = &bundle.entries[0].contents;
        assert!(readme.contains("Completed lessons: 1"));
        assert!(readme.contains("Total XP: 50"));
        assert!(readme.contains("Exported at: 2026-10-14 09:30:00 UTC"));
    }

    #[test]
    fn zip_round_trip_reads_back() {
        let (curriculum, store) = setup();
        let bundle = collect_export(&curriculum, &store, timestamp()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);
        bundle.write_zip(&path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 4);

        let mut code = String::new();
        archive
            .by_name("c1_python_basics/l1_hello_world.py")
            .unwrap()
            .read_to_string(&mut code)
            .unwrap();
        assert_eq!(code, "print('hi')");
    }

    #[test]
    fn single_lesson_download() {
        let (curriculum, _) = setup();
        let lesson = curriculum.lesson("l2").unwrap().lesson;
        let dir = tempfile::tempdir().unwrap();

        let path = write_lesson_file(dir.path(), lesson, "xs = [1]\n").unwrap();
        assert_eq!(path.file_name().unwrap(), "l2_lists_loops.py");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "xs = [1]\n");
    }
}
