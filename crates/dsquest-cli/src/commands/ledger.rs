//! The `dsquest ledger` commands for The Great Ledger game.

use std::path::PathBuf;

use anyhow::{Context, Result};

use dsquest_ledger::render;
use dsquest_ledger::{LedgerClient, LedgerError, Submission};

use crate::config::QuestConfig;

/// What `ledger submit` sends for the current node.
pub enum Answer {
    Continue,
    Quiz(usize),
    CodeFile(PathBuf),
}

impl Answer {
    fn into_submission(self) -> Result<Submission> {
        Ok(match self {
            Answer::Continue => Submission::Continue {},
            Answer::Quiz(index) => Submission::quiz(index),
            Answer::CodeFile(path) => {
                let code = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Submission::code(code)
            }
        })
    }
}

fn connect(config: &QuestConfig) -> Result<LedgerClient> {
    let client = LedgerClient::new(&config.ledger_url)?;
    tracing::debug!("using ledger backend at {}", client.base_url());
    Ok(client)
}

/// Log the details and surface only the toast text.
fn request_failed(e: LedgerError) -> anyhow::Error {
    tracing::warn!("ledger request failed: {e}");
    anyhow::anyhow!(e.toast())
}

pub async fn execute_map(config: &QuestConfig) -> Result<()> {
    let client = connect(config)?;
    eprintln!("{}", render::LOADING_TEXT);
    let map = client.get_map().await.map_err(request_failed)?;
    println!("{}", render::render_map(&map));
    Ok(())
}

pub async fn execute_node(config: &QuestConfig) -> Result<()> {
    let client = connect(config)?;
    let map = client.get_map().await.map_err(request_failed)?;
    let node = client.get_node().await.map_err(request_failed)?;
    println!("{}\n", render::render_header(Some(&map), true));
    println!("{}", render::render_node(&node));
    Ok(())
}

pub async fn execute_submit(config: &QuestConfig, answer: Answer) -> Result<()> {
    let client = connect(config)?;
    let submission = answer.into_submission()?;

    let result = match client.submit(&submission).await {
        Ok(result) => result,
        Err(e) => {
            println!("{}", render::render_request_error(&e));
            return Err(request_failed(e));
        }
    };
    println!("{}", render::render_feedback(&result));

    if result.success {
        let map = client.get_map().await.map_err(request_failed)?;
        println!("\n{}", render::render_map(&map));
    }
    Ok(())
}
