//! Studio Agents - Tool Execution Layer
//!
//! Executes the tool calls of the studio content-generation agents. An
//! orchestrator (not part of this crate) asks a language model for the next
//! tool call and hands it to the executor for the job's document type:
//!
//! ```text
//! loop {
//!     (tool, input) = model.next_call()
//!     outcome = registry.execute(kind, tool, input, &mut ctx)
//!     if outcome.is_termination { break }
//! }
//! ```
//!
//! It includes:
//! - Blog, PRD and website executors over injected collaborators
//! - Filesystem and in-memory job stores
//! - Filesystem path resolution and source content sampling
//! - JSON configuration

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::settings::{ConfigUpdate, SamplingConfig, StudioConfig};
pub use services::{
    build_registry, BlogToolExecutor, FsContentSampler, PrdToolExecutor, StudioServices,
    StudioUrls, WebsiteToolExecutor,
};
pub use storage::{ConfigService, FileJobStore, MemoryJobStore};
pub use utils::error::{AppError, AppResult};
pub use utils::paths::{FsStudioPaths, StudioLayout};

pub use studio_core::{
    ContentSampler, CoreError, CoreResult, ExecutionContext, GeneratedImage, ImageBatch,
    ImageGenerator, ImageRequest, JobKind, JobRecord, JobStatus, JobStore, JobUpdate,
    StoredImage, StudioPaths, UsageCounters,
};
pub use studio_tools::{DocumentToolExecutor, ExecutorRegistry, ToolOutcome, ToolResult};
