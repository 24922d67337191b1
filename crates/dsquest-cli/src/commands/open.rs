//! The `dsquest open` command.

use anyhow::Result;

use crate::app::{QuestApp, Terminal};
use crate::config::QuestConfig;

pub async fn execute(config: &QuestConfig, fragment: Option<String>) -> Result<()> {
    let mut app = QuestApp::from_config(config)?;
    app.navigate(fragment.as_deref().unwrap_or("#/"));
    app.render(&mut Terminal).await
}
