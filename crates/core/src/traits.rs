//! Collaborator Traits
//!
//! The executors depend on four external collaborators, passed in explicitly
//! so they can be swapped for fakes in tests:
//!
//! - `JobStore` - read and patch persistent job records
//! - `ImageGenerator` - produce image files from a prompt
//! - `StudioPaths` - resolve a project's artifact root on disk
//! - `ContentSampler` - supply (possibly subsampled) source text

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::job::{JobKind, JobRecord, JobUpdate};

/// Persistent job records keyed by (kind, project, job).
///
/// The executors never create or delete jobs; they only read and patch them.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a job, or `None` if it does not exist.
    async fn get(&self, kind: JobKind, project_id: &str, job_id: &str)
        -> CoreResult<Option<JobRecord>>;

    /// Merge `update` into the job. Fields not present in the update are
    /// left untouched.
    async fn update(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
        update: JobUpdate,
    ) -> CoreResult<()>;
}

/// Request for the image-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub output_dir: PathBuf,
    pub count: usize,
    pub filename_prefix: String,
    pub aspect_ratio: String,
}

/// A file written by the image-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub filename: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Response from the image-generation backend.
///
/// `success == false` and an empty `images` list are treated identically by
/// callers: as a recoverable failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBatch {
    pub success: bool,
    #[serde(default)]
    pub images: Vec<StoredImage>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImageBatch {
    /// First image of a successful batch, if any.
    pub fn first(&self) -> Option<&StoredImage> {
        if self.success {
            self.images.first()
        } else {
            None
        }
    }
}

/// Image-generation backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ImageRequest) -> CoreResult<ImageBatch>;
}

/// Resolves where a project's studio artifacts live on disk.
pub trait StudioPaths: Send + Sync {
    /// Root directory for a project's blogs, PRDs and websites.
    fn studio_dir(&self, project_id: &str) -> CoreResult<PathBuf>;
}

/// Supplies source text to tools and prompt builders.
pub trait ContentSampler: Send + Sync {
    /// Full text below `max_chars`, otherwise an evenly spaced sample of at
    /// most `max_chunks` chunks. Failures are reported inline in the text.
    fn get_content(
        &self,
        project_id: &str,
        source_id: &str,
        max_chars: usize,
        max_chunks: usize,
    ) -> String;
}
