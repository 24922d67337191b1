//! dsquest-runner — Sandboxed Python execution.
//!
//! Runs lesson source through a local Python interpreter inside a temporary
//! directory, capturing stdout/stderr and converting exceptions into faults.

pub mod error;
pub mod harness;
pub mod mock;
pub mod sandbox;

use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use dsquest_core::traits::{CodeExecutionEngine, ExecutionResult, Fault};

pub use error::EngineError;
pub use mock::ScriptedEngine;

const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PROBE_TIMEOUT_SECS: u64 = 60;

/// Python interpreter engine.
pub struct PythonEngine {
    interpreter: String,
    timeout: Duration,
    preload_packages: Vec<String>,
}

impl PythonEngine {
    pub fn new(interpreter: &str) -> Self {
        let interpreter = if interpreter.is_empty() {
            DEFAULT_INTERPRETER
        } else {
            interpreter
        };
        Self {
            interpreter: interpreter.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            preload_packages: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Packages that must import successfully during initialization.
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.preload_packages = packages;
        self
    }

    /// Run `python -c <script>` with output captured.
    async fn probe(&self, script: &str) -> Result<std::process::Output, EngineError> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), cmd.output())
            .await
            .map_err(|_| EngineError::Timeout(PROBE_TIMEOUT_SECS))?;

        output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EngineError::InterpreterNotFound(self.interpreter.clone())
            } else {
                EngineError::Spawn(e.to_string())
            }
        })
    }
}

impl Default for PythonEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

#[async_trait]
impl CodeExecutionEngine for PythonEngine {
    fn name(&self) -> &str {
        &self.interpreter
    }

    async fn initialize(&self) -> Result<()> {
        let output = self
            .probe("import sys; print('%d.%d.%d' % sys.version_info[:3])")
            .await?;
        if !output.status.success() {
            return Err(EngineError::Spawn(String::from_utf8_lossy(&output.stderr).into()).into());
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::info!("using {} (Python {version})", self.interpreter);

        for package in &self.preload_packages {
            if !is_module_name(package) {
                return Err(EngineError::InvalidPackage(package.clone()).into());
            }
            tracing::info!("loading package {package}");
            let output = self.probe(&format!("import {package}")).await?;
            if !output.status.success() {
                return Err(EngineError::MissingPackage {
                    package: package.clone(),
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    async fn run(&self, source: &str) -> Result<ExecutionResult> {
        let start = Instant::now();
        let sandbox = sandbox::Sandbox::new(self.timeout)?;
        sandbox.write_source(source)?;

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-u")
            .arg(sandbox.harness_path())
            .arg(sandbox.lesson_path())
            .current_dir(sandbox.work_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, val) in sandbox.build_env() {
            cmd.env(&key, &val);
        }

        let result = match tokio::time::timeout(sandbox.timeout(), cmd.output()).await {
            Ok(output) => output.with_context(|| format!("failed to run {}", self.interpreter))?,
            Err(_) => {
                let secs = sandbox.timeout().as_secs();
                tracing::warn!("lesson code timed out after {secs}s");
                return Ok(Err(Fault {
                    partial: String::new(),
                    diagnostic: format!("Execution timed out after {secs}s"),
                }));
            }
        };

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        let outcome = harness::parse_harness_output(&stdout, &stderr, result.status.code());

        tracing::debug!(
            "python run finished in {}ms (fault: {})",
            start.elapsed().as_millis(),
            outcome.is_err()
        );
        Ok(outcome)
    }
}

/// Dotted Python module path such as `pandas` or `matplotlib.pyplot`.
fn is_module_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsquest_core::traits::Output;

    fn engine() -> PythonEngine {
        PythonEngine::default().with_timeout(Duration::from_secs(20))
    }

    #[test]
    fn module_name_validation() {
        assert!(is_module_name("pandas"));
        assert!(is_module_name("matplotlib.pyplot"));
        assert!(!is_module_name("os; import shutil"));
        assert!(!is_module_name("1abc"));
        assert!(!is_module_name(""));
    }

    #[tokio::test]
    async fn initialize_reports_missing_interpreter() {
        let engine = PythonEngine::new("definitely-not-a-python-binary");
        let err = engine.initialize().await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn initialize_rejects_missing_package() {
        let engine = engine().with_packages(vec!["dsquest_no_such_module".into()]);
        let err = engine.initialize().await.unwrap_err();
        assert!(err.to_string().contains("dsquest_no_such_module"));
    }

    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let engine = engine();
        engine.initialize().await.unwrap();
        let result = engine
            .run("import sys\nprint(2 + 3)\nprint('warn', file=sys.stderr)\n")
            .await
            .unwrap();
        assert_eq!(
            result,
            Ok(Output {
                text: "5\nwarn\n".into()
            })
        );
    }

    #[tokio::test]
    async fn exception_becomes_fault_with_partial_output() {
        let result = engine().run("print('before')\n1 / 0\n").await.unwrap();
        let fault = result.unwrap_err();
        assert_eq!(fault.partial, "before\n");
        assert!(fault.diagnostic.contains("ZeroDivisionError"));
        assert!(!fault.diagnostic.contains("harness.py"));
    }

    #[tokio::test]
    async fn syntax_error_is_fault() {
        let fault = engine().run("def broken(:\n").await.unwrap().unwrap_err();
        assert!(fault.diagnostic.contains("SyntaxError"));
    }

    #[tokio::test]
    async fn clean_exit_is_not_a_fault() {
        let result = engine().run("import sys\nprint('ok')\nsys.exit(0)\n").await.unwrap();
        assert_eq!(result.unwrap().text, "ok\n");

        let fault = engine().run("import sys\nsys.exit(3)\n").await.unwrap().unwrap_err();
        assert!(fault.diagnostic.contains("SystemExit: 3"));
    }

    #[tokio::test]
    async fn descriptor_level_output_is_captured_in_order() {
        let source = "import os\nprint('a')\nos.system('echo b')\nprint('c')\n";
        let result = engine().run(source).await.unwrap().unwrap();
        assert_eq!(result.text, "a\nb\nc\n");
    }

    #[tokio::test]
    async fn hard_exit_keeps_printed_output() {
        let result = engine()
            .run("import os\nprint('hi')\nos._exit(0)\n")
            .await
            .unwrap();
        assert_eq!(result, Ok(Output { text: "hi\n".into() }));

        let fault = engine()
            .run("import os\nprint('hi')\nos._exit(2)\n")
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fault.partial, "hi\n");
        assert_eq!(fault.diagnostic, "interpreter exited with status 2");
    }

    #[tokio::test]
    async fn multiline_strings_survive_wrapping() {
        let source = "text = \"\"\"line one\nline two\"\"\"\nprint(text)\n";
        let result = engine().run(source).await.unwrap().unwrap();
        assert_eq!(result.text, "line one\nline two\n");
    }

    #[tokio::test]
    async fn infinite_loop_times_out() {
        let engine = PythonEngine::default().with_timeout(Duration::from_secs(1));
        let fault = engine.run("while True:\n    pass\n").await.unwrap().unwrap_err();
        assert_eq!(fault.diagnostic, "Execution timed out after 1s");
    }
}
