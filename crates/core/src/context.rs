//! Execution Context
//!
//! Per-loop state the orchestrator threads through successive tool calls.
//! The orchestrator owns the context's lifetime; executors only read it and
//! append to the running lists (images, created files) and the section tally.

use serde::{Deserialize, Serialize};

use crate::job::{GeneratedImage, UsageCounters};

/// State carried across the tool calls of one agent loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub project_id: String,
    pub job_id: String,
    /// Images generated so far in this loop, in generation order.
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
    /// Files created so far (website jobs), without duplicates.
    #[serde(default)]
    pub created_files: Vec<String>,
    /// Number of section writes that have succeeded so far.
    ///
    /// This is the only source of section numbering; ordinals supplied by
    /// the model are never used for addressing.
    #[serde(default)]
    pub sections_written: u32,
    /// Iteration and token totals, kept current by the orchestrator.
    #[serde(default)]
    pub usage: UsageCounters,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub target_keyword: Option<String>,
    #[serde(default)]
    pub blog_type: Option<String>,
}

impl ExecutionContext {
    pub fn new(project_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            job_id: job_id.into(),
            ..Default::default()
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_target_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.target_keyword = Some(keyword.into());
        self
    }

    pub fn with_blog_type(mut self, blog_type: impl Into<String>) -> Self {
        self.blog_type = Some(blog_type.into());
        self
    }

    /// Index the next generated image will receive (1-based).
    pub fn next_image_index(&self) -> usize {
        self.images.len() + 1
    }

    /// Record a created file; re-creating a known filename is a no-op.
    /// Returns `true` when the filename was new.
    pub fn record_created_file(&mut self, filename: &str) -> bool {
        if self.created_files.iter().any(|f| f == filename) {
            return false;
        }
        self.created_files.push(filename.to_string());
        true
    }

    /// Called by the orchestrator after each model turn.
    pub fn record_iteration(&mut self, input_tokens: u64, output_tokens: u64) {
        self.usage.iterations += 1;
        self.usage.input_tokens += input_tokens;
        self.usage.output_tokens += output_tokens;
    }
}
