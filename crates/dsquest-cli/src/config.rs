//! dsquest configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "dsquest.toml";

/// Top-level dsquest configuration.
///
/// Relative paths resolve against the directory of the config file they were
/// read from, or the current directory when no file was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Curriculum JSON document.
    #[serde(default = "default_curriculum")]
    pub curriculum: PathBuf,
    /// JSON file holding progress and saved code.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Python interpreter used to run lesson code.
    #[serde(default = "default_python")]
    pub python: String,
    /// Packages imported when the engine starts.
    #[serde(default)]
    pub preload_packages: Vec<String>,
    /// Per-run time limit.
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,
    /// Base URL of The Great Ledger backend.
    #[serde(default = "default_ledger_url")]
    pub ledger_url: String,
    /// Archive name used by `export` without `--out`.
    #[serde(default = "default_export_name")]
    pub export_name: String,
    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_curriculum() -> PathBuf {
    PathBuf::from("curriculum.json")
}
fn default_store_path() -> PathBuf {
    PathBuf::from(".dsquest/progress.json")
}
fn default_python() -> String {
    "python3".to_string()
}
fn default_run_timeout() -> u64 {
    30
}
fn default_ledger_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_export_name() -> String {
    dsquest_report::DEFAULT_EXPORT_NAME.to_string()
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            curriculum: default_curriculum(),
            store_path: default_store_path(),
            python: default_python(),
            preload_packages: Vec::new(),
            run_timeout_secs: default_run_timeout(),
            ledger_url: default_ledger_url(),
            export_name: default_export_name(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl QuestConfig {
    pub fn curriculum_path(&self) -> PathBuf {
        self.base_dir.join(&self.curriculum)
    }

    pub fn store_path(&self) -> PathBuf {
        self.base_dir.join(&self.store_path)
    }

    /// Where `export` writes when no `--out` is given.
    pub fn export_path(&self) -> PathBuf {
        self.base_dir.join(&self.export_name)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(p: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&p.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `dsquest.toml` in the current directory
/// 2. `~/.config/dsquest/config.toml`
///
/// Environment variable overrides: `DSQUEST_PYTHON`, `DSQUEST_LEDGER_URL`,
/// `DSQUEST_STORE`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<QuestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            config.base_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuestConfig::default(),
    };

    // Apply env var overrides
    if let Ok(python) = std::env::var("DSQUEST_PYTHON") {
        config.python = python;
    }
    if let Ok(url) = std::env::var("DSQUEST_LEDGER_URL") {
        config.ledger_url = url;
    }
    if let Ok(store) = std::env::var("DSQUEST_STORE") {
        config.store_path = PathBuf::from(store);
    }

    config.python = resolve_env_vars(&config.python);
    config.ledger_url = resolve_env_vars(&config.ledger_url);
    config.curriculum = resolve_path(&config.curriculum);
    config.store_path = resolve_path(&config.store_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("dsquest"))
}
