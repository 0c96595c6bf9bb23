//! Shared test utilities for executor unit tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use studio_core::{
    CoreResult, ExecutionContext, ImageBatch, ImageGenerator, ImageRequest, JobKind, JobRecord,
    JobStore, StoredImage, StudioPaths,
};

use crate::services::tools::StudioServices;
use crate::storage::job_store::MemoryJobStore;
use crate::utils::paths::FsStudioPaths;

pub(crate) const PROJECT_ID: &str = "proj-1";
pub(crate) const JOB_ID: &str = "job-1";

/// Image backend that writes an empty `<prefix>.png` for every request.
#[derive(Default)]
pub(crate) struct FakeImageGenerator {
    failure: Mutex<Option<String>>,
}

impl FakeImageGenerator {
    /// Make the next request come back unsuccessful with `error`.
    pub fn fail_next(&self, error: &str) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(error.to_string());
        }
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, request: &ImageRequest) -> CoreResult<ImageBatch> {
        let failure = self.failure.lock().ok().and_then(|mut f| f.take());
        if let Some(error) = failure {
            return Ok(ImageBatch {
                success: false,
                images: Vec::new(),
                error: Some(error),
            });
        }

        let filename = format!("{}.png", request.filename_prefix);
        let path = request.output_dir.join(&filename);
        std::fs::write(&path, b"")?;
        Ok(ImageBatch {
            success: true,
            images: vec![StoredImage {
                filename,
                path: Some(path),
            }],
            error: None,
        })
    }
}

/// A temp data dir, an in-memory store with one seeded job, and a fake
/// image backend.
pub(crate) struct TestStudio {
    pub dir: TempDir,
    pub kind: JobKind,
    pub store: Arc<MemoryJobStore>,
    pub images: Arc<FakeImageGenerator>,
}

impl TestStudio {
    pub async fn new(kind: JobKind) -> Self {
        let store = Arc::new(MemoryJobStore::new());
        store.insert(kind, PROJECT_ID, JOB_ID, JobRecord::new()).await;
        Self {
            dir: TempDir::new().unwrap(),
            kind,
            store,
            images: Arc::new(FakeImageGenerator::default()),
        }
    }

    pub fn services(&self) -> StudioServices {
        StudioServices::new(
            self.store.clone(),
            self.images.clone(),
            Arc::new(FsStudioPaths::new(self.dir.path())),
        )
    }

    pub fn ctx(&self) -> ExecutionContext {
        ExecutionContext::new(PROJECT_ID, JOB_ID)
    }

    pub fn studio_dir(&self) -> PathBuf {
        FsStudioPaths::new(self.dir.path())
            .studio_dir(PROJECT_ID)
            .unwrap()
    }

    pub async fn job(&self) -> JobRecord {
        self.store
            .get(self.kind, PROJECT_ID, JOB_ID)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Services whose collaborators are never reached.
pub(crate) fn offline_services() -> StudioServices {
    StudioServices::new(
        Arc::new(MemoryJobStore::new()),
        Arc::new(FakeImageGenerator::default()),
        Arc::new(FsStudioPaths::new("/nonexistent")),
    )
}
