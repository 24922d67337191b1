//! The `dsquest run` and `dsquest check` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dsquest_report::views;

use crate::app::QuestApp;
use crate::config::QuestConfig;

/// Save code from `file` (when given) as the lesson's current code.
pub(crate) fn save_from_file(app: &QuestApp, lesson_id: &str, file: &Path) -> Result<()> {
    let lesson = app.lesson(lesson_id)?.lesson;
    let code = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    app.store().save_code(&lesson.id, &code)?;
    tracing::debug!("saved {} bytes of code for {}", code.len(), lesson.id);
    Ok(())
}

/// Execute the lesson's code and report whether the checks pass.
pub async fn execute_run(config: &QuestConfig, lesson_id: String, file: Option<PathBuf>) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    if let Some(file) = &file {
        save_from_file(&app, &lesson_id, file)?;
    }

    eprintln!("Running {lesson_id}…");
    let report = app.run_lesson(&lesson_id).await?;
    println!("{}", views::render_terminal(&report.output));
    println!("{}", views::render_run_summary(&report));
    Ok(())
}

/// Execute the lesson's code and record completion when the checks pass.
pub async fn execute_check(
    config: &QuestConfig,
    lesson_id: String,
    file: Option<PathBuf>,
) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    if let Some(file) = &file {
        save_from_file(&app, &lesson_id, file)?;
    }

    eprintln!("Checking {lesson_id}…");
    let result = app.check_lesson(&lesson_id).await?;
    let lesson = app.lesson(&lesson_id)?.lesson;
    println!("{}", views::render_terminal(&result.report.output));
    println!(
        "{}",
        views::render_check_summary(&result.report, lesson, result.newly_completed)
    );
    Ok(())
}
