//! Document Tool Executors
//!
//! One executor per document type, all speaking the dispatch protocol from
//! `studio_tools`:
//! - Blog: plan, generate images, write the post (terminal)
//! - PRD: plan, generate images, write sections (the last one is terminal)
//! - Website: plan, generate images, read/create/edit files, finalize (terminal)
//!
//! Collaborators (job store, image backend, path resolution) are injected
//! through `StudioServices` so every executor can run against fakes.

pub mod impls;
pub mod urls;

use std::sync::Arc;

use serde_json::json;
use tracing::error;

use studio_core::{
    ExecutionContext, ImageGenerator, JobKind, JobRecord, JobStatus, JobStore, JobUpdate,
    StudioPaths,
};
use studio_tools::{ExecutorRegistry, ToolOutcome, ToolResult};

use crate::models::settings::StudioConfig;
use crate::utils::paths::{FsStudioPaths, StudioLayout};

pub use impls::{BlogToolExecutor, PrdToolExecutor, WebsiteToolExecutor};
pub use urls::StudioUrls;

/// Default aspect ratio for generated images.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Collaborators shared by the executors.
#[derive(Clone)]
pub struct StudioServices {
    pub jobs: Arc<dyn JobStore>,
    pub images: Arc<dyn ImageGenerator>,
    pub paths: Arc<dyn StudioPaths>,
    pub urls: StudioUrls,
    pub default_aspect_ratio: String,
}

impl StudioServices {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        images: Arc<dyn ImageGenerator>,
        paths: Arc<dyn StudioPaths>,
    ) -> Self {
        Self {
            jobs,
            images,
            paths,
            urls: StudioUrls::default(),
            default_aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    /// Build services from configuration, resolving paths under `data_dir`.
    pub fn from_config(
        config: &StudioConfig,
        jobs: Arc<dyn JobStore>,
        images: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            jobs,
            images,
            paths: Arc::new(FsStudioPaths::new(config.data_dir.clone())),
            urls: StudioUrls::new(config.api_base.clone()),
            default_aspect_ratio: config.default_aspect_ratio.clone(),
        }
    }

    pub fn with_urls(mut self, urls: StudioUrls) -> Self {
        self.urls = urls;
        self
    }

    /// Studio layout for the context's project.
    pub(crate) fn layout(&self, project_id: &str) -> Result<StudioLayout, String> {
        StudioLayout::resolve(self.paths.as_ref(), project_id).map_err(|e| e.to_string())
    }

    pub(crate) async fn get_job(
        &self,
        kind: JobKind,
        ctx: &ExecutionContext,
    ) -> Result<Option<JobRecord>, String> {
        self.jobs
            .get(kind, &ctx.project_id, &ctx.job_id)
            .await
            .map_err(|e| e.to_string())
    }

    pub(crate) async fn update_job(
        &self,
        kind: JobKind,
        ctx: &ExecutionContext,
        update: JobUpdate,
    ) -> Result<(), String> {
        self.jobs
            .update(kind, &ctx.project_id, &ctx.job_id, update)
            .await
            .map_err(|e| e.to_string())
    }

    /// Terminal failure path shared by every finalize: mark the job `error`
    /// with the message and report usage alongside the error.
    pub(crate) async fn fail_job(
        &self,
        kind: JobKind,
        ctx: &ExecutionContext,
        message: String,
    ) -> ToolOutcome {
        error!(
            project_id = %ctx.project_id,
            job_id = %ctx.job_id,
            kind = %kind,
            "{}",
            message
        );

        let update = JobUpdate::new()
            .status(JobStatus::Error)
            .error_message(message.clone());
        if let Err(e) = self.update_job(kind, ctx, update).await {
            error!(
                job_id = %ctx.job_id,
                "Failed to record job failure: {}",
                e
            );
        }

        ToolOutcome::terminal(ToolResult::err(message).with_payload(usage_payload(ctx)))
    }
}

/// `iterations` and `usage` keys carried by every terminal result.
pub(crate) fn usage_payload(ctx: &ExecutionContext) -> serde_json::Value {
    json!({
        "iterations": ctx.usage.iterations,
        "usage": ctx.usage.token_usage(),
    })
}

/// Registry holding all three executors over the same collaborators.
pub fn build_registry(services: StudioServices) -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();
    registry.register(Arc::new(BlogToolExecutor::new(services.clone())));
    registry.register(Arc::new(PrdToolExecutor::new(services.clone())));
    registry.register(Arc::new(WebsiteToolExecutor::new(services)));
    registry
}
