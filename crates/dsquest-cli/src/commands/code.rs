//! Saved-code commands: `save`, `show-code`, `reset-code` and `download`.

use std::path::PathBuf;

use anyhow::Result;

use dsquest_report::export::write_lesson_file;

use crate::app::QuestApp;
use crate::commands::run::save_from_file;
use crate::config::QuestConfig;

pub fn execute_save(config: &QuestConfig, lesson_id: String, file: PathBuf) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    save_from_file(&app, &lesson_id, &file)?;
    println!("Saved code for {lesson_id}.");
    Ok(())
}

pub fn execute_show(config: &QuestConfig, lesson_id: String) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    let lesson = app.lesson(&lesson_id)?.lesson;
    let code = app.store().current_code(lesson)?;
    print!("{code}");
    if !code.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn execute_reset(config: &QuestConfig, lesson_id: String) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    let lesson = app.lesson(&lesson_id)?.lesson;
    app.store().reset_code(lesson)?;
    println!("Reset code for {lesson_id} back to the starter code.");
    Ok(())
}

pub fn execute_download(config: &QuestConfig, lesson_id: String, out: Option<PathBuf>) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    let lesson = app.lesson(&lesson_id)?.lesson;
    let code = app.store().current_code(lesson)?;
    let dir = out.unwrap_or_else(|| PathBuf::from("."));
    let path = write_lesson_file(&dir, lesson, &code)?;
    println!("Wrote {}", path.display());
    Ok(())
}
