//! The `dsquest export` command.

use std::path::PathBuf;

use anyhow::Result;

use dsquest_report::collect_export;

use crate::app::QuestApp;
use crate::config::QuestConfig;

pub fn execute(config: &QuestConfig, out: Option<PathBuf>) -> Result<()> {
    let app = QuestApp::from_config(config)?;
    let bundle = collect_export(app.curriculum(), app.store(), chrono::Utc::now())?;

    let path = out.unwrap_or_else(|| config.export_path());
    bundle.write_zip(&path)?;
    println!(
        "Exported {} lesson files to {}",
        app.curriculum().lesson_count(),
        path.display()
    );
    Ok(())
}
