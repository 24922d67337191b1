//! The `dsquest validate` command.

use anyhow::Result;

use dsquest_core::parser::{load_curriculum, validate_curriculum};

use crate::config::QuestConfig;

pub fn execute(config: &QuestConfig) -> Result<()> {
    let path = config.curriculum_path();
    let source = load_curriculum(&path)?;
    let curriculum = &source.curriculum;

    println!(
        "Curriculum: {} ({} chapters, {} lessons)",
        path.display(),
        curriculum.chapters.len(),
        curriculum.lesson_count()
    );

    let warnings = validate_curriculum(&source);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Curriculum valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
