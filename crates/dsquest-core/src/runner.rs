//! Lesson code runner: lazy engine start-up, execution and checks.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::checks::{run_checks, CheckOutcome};
use crate::model::TestExpectation;
use crate::traits::CodeExecutionEngine;

/// What a run produced and whether it satisfied the lesson's checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub ok: bool,
    /// Captured terminal text (including any traceback).
    pub output: String,
    pub message: String,
    /// The program raised instead of finishing.
    pub faulted: bool,
}

/// Runs lesson source against an engine that is initialized on first use.
pub struct CodeRunner {
    engine: Arc<dyn CodeExecutionEngine>,
    ready: OnceCell<()>,
}

impl CodeRunner {
    pub fn new(engine: Arc<dyn CodeExecutionEngine>) -> Self {
        Self {
            engine,
            ready: OnceCell::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Initialize the engine once. Concurrent callers wait on the same
    /// initialization; a failure leaves the cell empty for the next attempt.
    pub async fn ensure_ready(&self) -> anyhow::Result<()> {
        self.ready
            .get_or_try_init(|| async {
                tracing::info!("loading {} engine", self.engine.name());
                self.engine.initialize().await?;
                tracing::info!("{} engine ready", self.engine.name());
                Ok::<(), anyhow::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Run source and evaluate `tests` against its output.
    ///
    /// Engine start-up failures are returned as errors. Everything after that
    /// (user faults and execution infrastructure errors) ends up in the report.
    pub async fn run(&self, source: &str, tests: &[TestExpectation]) -> anyhow::Result<RunReport> {
        self.ensure_ready().await?;

        let (output, faulted) = match self.engine.run(source).await {
            Ok(Ok(out)) => (out.text, false),
            Ok(Err(fault)) => {
                tracing::debug!("user code faulted");
                (fault.display_text(), true)
            }
            Err(e) => {
                tracing::warn!("execution failed: {e:#}");
                (format!("{e:#}"), true)
            }
        };

        let CheckOutcome { ok, message } = run_checks(&output, tests);
        Ok(RunReport {
            ok,
            output,
            message,
            faulted,
        })
    }
}
