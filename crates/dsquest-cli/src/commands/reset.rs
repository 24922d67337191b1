//! The `dsquest reset` command.

use anyhow::Result;

use crate::app::QuestApp;
use crate::config::QuestConfig;

pub fn execute(config: &QuestConfig, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("this clears all progress AND saved code; re-run with --yes to confirm");
    }
    let app = QuestApp::from_config(config)?;
    app.store().reset_all(app.curriculum())?;
    println!("Progress reset.");
    Ok(())
}
