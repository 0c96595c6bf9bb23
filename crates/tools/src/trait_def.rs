//! Tool Executor Trait
//!
//! One executor per document type. Each is a closed dispatcher: a tool name
//! and a JSON input are parsed into that executor's own tagged variant, and
//! anything it does not recognize is a declared `Unknown tool` error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use studio_core::{ExecutionContext, JobKind};

use crate::executor::{ToolOutcome, ToolResult};

/// Failure to turn a (name, input) pair into a typed tool call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for {tool}: {reason}")]
    InvalidInput { tool: String, reason: String },
}

impl ToolCallError {
    /// Model-facing outcome for a call that could not be parsed. Never terminal.
    pub fn into_outcome(self) -> ToolOutcome {
        ToolOutcome::intermediate(ToolResult::err(self.to_string()))
    }
}

/// Deserialize a tool's input record. `null` is read as an empty object so
/// tools whose fields all have defaults accept a bare call.
pub fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolCallError> {
    let input = match input {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(input).map_err(|e| ToolCallError::InvalidInput {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Whole number carried by an advisory field, if it holds one.
///
/// Models send counts as `3`, `3.0` or `"3"`; anything else is treated as absent.
pub fn integer_hint(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `deserialize_with` for an optional advisory integer. Never fails on type.
pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(integer_hint(&Value::deserialize(deserializer)?))
}

/// Like `lenient_i64`, with negatives treated as absent.
pub fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(integer_hint(&Value::deserialize(deserializer)?).and_then(|n| u64::try_from(n).ok()))
}

/// Dispatcher for one document type's tools.
#[async_trait]
pub trait DocumentToolExecutor: Send + Sync {
    /// Document type this executor produces.
    fn kind(&self) -> JobKind;

    /// Every tool name this executor recognizes.
    fn tool_names(&self) -> &'static [&'static str];

    /// The tool whose completion ends the agent loop.
    fn termination_tool(&self) -> &'static str;

    /// Perform exactly one tool call. Never panics or returns an error to the
    /// caller: failures are reported in the outcome's result.
    async fn execute(
        &self,
        tool_name: &str,
        tool_input: Value,
        ctx: &mut ExecutionContext,
    ) -> ToolOutcome;
}

/// Executors keyed by document type.
pub struct ExecutorRegistry {
    executors: HashMap<JobKind, Arc<dyn DocumentToolExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
        }
    }

    /// Register an executor. Replaces any executor for the same kind.
    pub fn register(&mut self, executor: Arc<dyn DocumentToolExecutor>) {
        self.executors.insert(executor.kind(), executor);
    }

    pub fn get(&self, kind: JobKind) -> Option<Arc<dyn DocumentToolExecutor>> {
        self.executors.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    /// Dispatch to the executor for `kind`.
    pub async fn execute(
        &self,
        kind: JobKind,
        tool_name: &str,
        tool_input: Value,
        ctx: &mut ExecutionContext,
    ) -> ToolOutcome {
        match self.executors.get(&kind) {
            Some(executor) => executor.execute(tool_name, tool_input, ctx).await,
            None => ToolOutcome::intermediate(ToolResult::err(format!(
                "No executor registered for {} jobs",
                kind
            ))),
        }
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
