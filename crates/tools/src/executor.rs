//! Tool Execution Results
//!
//! Every dispatch returns a `ToolOutcome`: a `ToolResult` paired with the
//! termination flag that tells the orchestrator whether the agent loop ends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Human-readable message for the model (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured payload (terminal tools report artifact URLs and usage here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload: None,
            error: None,
        }
    }

    /// Create a successful result carrying a structured payload
    pub fn ok_payload(payload: Value) -> Self {
        Self {
            success: true,
            message: None,
            payload: Some(payload),
            error: None,
        }
    }

    /// Create an error result
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Attach a structured payload (e.g. usage on a failed finalize).
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Convert to string for LLM consumption
    pub fn to_content(&self) -> String {
        if self.success {
            match (&self.message, &self.payload) {
                (Some(message), _) => message.clone(),
                (None, Some(payload)) => payload.to_string(),
                (None, None) => String::new(),
            }
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }

    /// Flatten into the single JSON object relayed to the orchestrator:
    /// `success`, `message`/`error`, plus every payload key at top level.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("success".to_string(), Value::Bool(self.success));
        if let Some(Value::Object(payload)) = &self.payload {
            for (key, value) in payload {
                out.insert(key.clone(), value.clone());
            }
        }
        if let Some(message) = &self.message {
            out.insert("message".to_string(), Value::String(message.clone()));
        }
        if let Some(error) = &self.error {
            out.insert("error".to_string(), Value::String(error.clone()));
        }
        Value::Object(out)
    }
}

/// A tool result paired with the loop-termination flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub result: ToolResult,
    pub is_termination: bool,
}

impl ToolOutcome {
    /// Outcome of a non-terminal tool. Never ends the loop, whatever the
    /// result says.
    pub fn intermediate(result: ToolResult) -> Self {
        Self {
            result,
            is_termination: false,
        }
    }

    /// Outcome of the terminal tool, successful or not.
    pub fn terminal(result: ToolResult) -> Self {
        Self {
            result,
            is_termination: true,
        }
    }

    pub fn success(&self) -> bool {
        self.result.success
    }
}
