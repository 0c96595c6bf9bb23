//! Studio Core
//!
//! Foundational types for the studio agent tool executors. This crate has no
//! dependency on storage backends, image services or the orchestrator.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `job` - Job records, partial updates, generated images, usage counters
//! - `context` - Per-loop `ExecutionContext` threaded by the orchestrator
//! - `traits` - Collaborator interfaces (`JobStore`, `ImageGenerator`, `StudioPaths`, `ContentSampler`)

pub mod context;
pub mod error;
pub mod job;
pub mod traits;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Job Model ──────────────────────────────────────────────────────────
pub use job::{GeneratedImage, JobKind, JobRecord, JobStatus, JobUpdate, UsageCounters};

// ── Execution Context ──────────────────────────────────────────────────
pub use context::ExecutionContext;

// ── Collaborators ──────────────────────────────────────────────────────
pub use traits::{
    ContentSampler, ImageBatch, ImageGenerator, ImageRequest, JobStore, StoredImage, StudioPaths,
};
