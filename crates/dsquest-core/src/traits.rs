//! The code execution capability implemented by `dsquest-runner`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text captured from a run that finished normally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Interleaved stdout and stderr.
    pub text: String,
}

/// A user-code failure, captured instead of propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Whatever the program printed before it failed.
    pub partial: String,
    /// Traceback or other diagnostic text.
    pub diagnostic: String,
}

impl Fault {
    /// Captured output followed by the diagnostic, as shown in the terminal.
    pub fn display_text(&self) -> String {
        if self.partial.is_empty() {
            self.diagnostic.clone()
        } else if self.partial.ends_with('\n') {
            format!("{}{}", self.partial, self.diagnostic)
        } else {
            format!("{}\n{}", self.partial, self.diagnostic)
        }
    }
}

/// Outcome of one run of user source.
pub type ExecutionResult = Result<Output, Fault>;

/// An embedded or external interpreter that runs user source.
///
/// `run` returns `Err` only for infrastructure failures (missing interpreter,
/// sandbox I/O); anything the user's code does wrong is a [`Fault`].
#[async_trait]
pub trait CodeExecutionEngine: Send + Sync {
    /// Human-readable engine name (e.g. "python3").
    fn name(&self) -> &str;

    /// Load the runtime. Called at most once per session by the runner.
    async fn initialize(&self) -> anyhow::Result<()>;

    /// Execute source with output captured.
    async fn run(&self, source: &str) -> anyhow::Result<ExecutionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_display_joins_partial_output() {
        let fault = Fault {
            partial: "1".into(),
            diagnostic: "Traceback (most recent call last):".into(),
        };
        assert_eq!(fault.display_text(), "1\nTraceback (most recent call last):");

        let bare = Fault {
            partial: String::new(),
            diagnostic: "boom".into(),
        };
        assert_eq!(bare.display_text(), "boom");
    }
}
