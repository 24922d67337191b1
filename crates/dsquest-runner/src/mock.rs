//! Scripted engine for testing front ends without an interpreter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use dsquest_core::traits::{CodeExecutionEngine, ExecutionResult, Fault, Output};

/// An engine that answers from a table keyed by source substrings.
///
/// Source containing `raise` followed by a message produces a fault, and
/// anything unmatched echoes the default output.
pub struct ScriptedEngine {
    /// Map of source substring → printed output.
    responses: HashMap<String, String>,
    default_output: String,
    init_error: Option<String>,
    init_count: AtomicU32,
    run_count: AtomicU32,
    last_source: Mutex<Option<String>>,
}

impl ScriptedEngine {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_output: String::new(),
            init_error: None,
            init_count: AtomicU32::new(0),
            run_count: AtomicU32::new(0),
            last_source: Mutex::new(None),
        }
    }

    /// An engine that prints the same text for every run.
    pub fn with_fixed_output(output: &str) -> Self {
        let mut engine = Self::new(HashMap::new());
        engine.default_output = output.to_string();
        engine
    }

    /// An engine whose initialization always fails.
    pub fn failing_init(message: &str) -> Self {
        let mut engine = Self::new(HashMap::new());
        engine.init_error = Some(message.to_string());
        engine
    }

    pub fn init_count(&self) -> u32 {
        self.init_count.load(Ordering::Relaxed)
    }

    pub fn run_count(&self) -> u32 {
        self.run_count.load(Ordering::Relaxed)
    }

    pub fn last_source(&self) -> Option<String> {
        self.last_source
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CodeExecutionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.init_count.fetch_add(1, Ordering::Relaxed);
        match &self.init_error {
            Some(message) => anyhow::bail!("{message}"),
            None => Ok(()),
        }
    }

    async fn run(&self, source: &str) -> anyhow::Result<ExecutionResult> {
        self.run_count.fetch_add(1, Ordering::Relaxed);
        *self.last_source.lock().unwrap_or_else(|e| e.into_inner()) = Some(source.to_string());

        if let Some(idx) = source.find("raise ") {
            let message = source[idx + "raise ".len()..]
                .lines()
                .next()
                .unwrap_or_default()
                .trim();
            return Ok(Err(Fault {
                partial: String::new(),
                diagnostic: format!(
                    "Traceback (most recent call last):\n  File \"<lesson>\", line 1, in <module>\n{message}\n"
                ),
            }));
        }

        let text = self
            .responses
            .iter()
            .find(|(key, _)| source.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_output.clone());

        Ok(Ok(Output { text }))
    }
}
