//! Job Records
//!
//! A job is the persistent record of one document-generation run. Its shape
//! varies per document type (a blog has an outline, a website has pages), so
//! the record is held as a JSON object with typed accessors for the fields
//! every document type shares. Updates are partial: a `JobUpdate` only
//! carries the keys it sets and merging it leaves every other key untouched.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Document type a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Blog,
    Prd,
    Website,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Blog => "blog",
            JobKind::Prd => "prd",
            JobKind::Website => "website",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a job: planning -> writing -> ready | error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Planning,
    Writing,
    Ready,
    Error,
}

impl JobStatus {
    /// Whether the job has been finalized (successfully or not).
    pub fn is_final(&self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Planning => write!(f, "planning"),
            JobStatus::Writing => write!(f, "writing"),
            JobStatus::Ready => write!(f, "ready"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// An image produced by an image-generation tool call.
///
/// Entries are append-only: the placeholder token is derived from the
/// 1-based position in the job's image list at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// What the image is for (e.g. "hero", "section")
    pub purpose: String,
    /// Section or heading the image belongs to, when the model gave one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_heading: Option<String>,
    /// Stored filename (relative to the document's asset directory)
    pub filename: String,
    /// Placeholder token issued for this image (`IMAGE_<n>`)
    pub placeholder: String,
    /// Alt text for markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    /// Public URL the placeholder resolves to
    pub url: String,
}

/// Usage counters accumulated by the orchestrator across the agent loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageCounters {
    pub iterations: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageCounters {
    /// The `{input_tokens, output_tokens}` object reported in terminal results.
    pub fn token_usage(&self) -> Value {
        json!({
            "input_tokens": self.input_tokens,
            "output_tokens": self.output_tokens,
        })
    }
}

/// Persistent job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord {
    fields: Map<String, Value>,
}

impl JobRecord {
    /// Create an empty record in the `planning` state.
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(JobStatus::Planning));
        Self { fields }
    }

    /// Build a record from an existing JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Merge a partial update into this record. Keys absent from the update
    /// are left untouched.
    pub fn apply(&mut self, update: JobUpdate) {
        for (key, value) in update.fields {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }

    pub fn status(&self) -> Option<JobStatus> {
        self.fields
            .get("status")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn status_message(&self) -> Option<&str> {
        self.str_field("status_message")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.str_field("error_message")
    }

    /// The persisted image list, in insertion order. Malformed entries are skipped.
    pub fn images(&self) -> Vec<GeneratedImage> {
        self.fields
            .get("images")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The persisted created-file list.
    pub fn files(&self) -> Vec<String> {
        self.fields
            .get("files")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Partial update to a job record (patch semantics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    fields: Map<String, Value>,
}

impl JobUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary field.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set an optional field; `None` leaves the key out of the patch.
    pub fn set_opt(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    pub fn status(self, status: JobStatus) -> Self {
        self.set("status", json!(status))
    }

    pub fn status_message(self, message: impl Into<String>) -> Self {
        self.set("status_message", message.into())
    }

    pub fn error_message(self, message: impl Into<String>) -> Self {
        self.set("error_message", message.into())
    }

    pub fn images(self, images: &[GeneratedImage]) -> Self {
        self.set("images", json!(images))
    }

    pub fn files(self, files: &[String]) -> Self {
        self.set("files", json!(files))
    }

    /// Record iteration and token totals.
    pub fn usage(self, usage: &UsageCounters) -> Self {
        self.set("iterations", usage.iterations)
            .set("input_tokens", usage.input_tokens)
            .set("output_tokens", usage.output_tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}
