//! Throwaway working directory for one Python run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::harness::HARNESS_PY;

/// File the lesson source is written to.
pub const LESSON_FILE: &str = "lesson.py";

/// File the harness script is written to.
pub const HARNESS_FILE: &str = "harness.py";

/// A temporary directory holding the lesson source and the harness.
///
/// On drop, the temporary directory is automatically cleaned up.
pub struct Sandbox {
    work_dir: TempDir,
    timeout: Duration,
}

impl Sandbox {
    /// Create a sandbox with the harness already in place.
    pub fn new(timeout: Duration) -> Result<Self> {
        let work_dir = TempDir::new().context("failed to create temp directory")?;
        std::fs::write(work_dir.path().join(HARNESS_FILE), HARNESS_PY)
            .context("failed to write harness.py")?;
        Ok(Self { work_dir, timeout })
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn harness_path(&self) -> PathBuf {
        self.work_dir.path().join(HARNESS_FILE)
    }

    pub fn lesson_path(&self) -> PathBuf {
        self.work_dir.path().join(LESSON_FILE)
    }

    /// Write the user's source as `lesson.py`.
    pub fn write_source(&self, code: &str) -> Result<()> {
        std::fs::write(self.lesson_path(), code).context("failed to write lesson.py")?;
        Ok(())
    }

    /// Environment for the interpreter process.
    ///
    /// Forces UTF-8 I/O and blanks credentials so lesson code cannot read them.
    pub fn build_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("PYTHONIOENCODING".to_string(), "utf-8".to_string()),
            ("PYTHONDONTWRITEBYTECODE".to_string(), "1".to_string()),
            ("MPLBACKEND".to_string(), "Agg".to_string()),
        ];

        for var in &[
            "SSH_AUTH_SOCK",
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "AWS_SESSION_TOKEN",
            "GITHUB_TOKEN",
            "GH_TOKEN",
            "ANTHROPIC_API_KEY",
            "OPENAI_API_KEY",
            "DOCKER_HOST",
            "DOCKER_CONFIG",
            "KUBECONFIG",
            "DATABASE_URL",
            "NPM_TOKEN",
        ] {
            env.push((var.to_string(), String::new()));
        }

        env
    }
}
