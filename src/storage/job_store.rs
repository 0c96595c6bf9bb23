//! Job Stores
//!
//! Two `JobStore` implementations:
//! - `MemoryJobStore` - in-process map, for tests and embedders that persist elsewhere
//! - `FileJobStore` - one pretty-printed JSON file per job under the studio root
//!
//! Both merge updates into the existing record and refuse to update a job
//! that was never inserted; creating jobs is the orchestrator's business.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use studio_core::{CoreError, CoreResult, JobKind, JobRecord, JobStore, JobUpdate, StudioPaths};

use crate::utils::paths::{ensure_dir, StudioLayout};

type JobKey = (JobKind, String, String);

fn key(kind: JobKind, project_id: &str, job_id: &str) -> JobKey {
    (kind, project_id.to_string(), job_id.to_string())
}

fn missing(kind: JobKind, project_id: &str, job_id: &str) -> CoreError {
    CoreError::not_found(format!("{kind} job {job_id} in project {project_id}"))
}

/// In-memory job store.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobKey, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a job record.
    pub async fn insert(&self, kind: JobKind, project_id: &str, job_id: &str, record: JobRecord) {
        self.jobs
            .write()
            .await
            .insert(key(kind, project_id, job_id), record);
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
    ) -> CoreResult<Option<JobRecord>> {
        Ok(self
            .jobs
            .read()
            .await
            .get(&key(kind, project_id, job_id))
            .cloned())
    }

    async fn update(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
        update: JobUpdate,
    ) -> CoreResult<()> {
        let mut jobs = self.jobs.write().await;
        let record = jobs
            .get_mut(&key(kind, project_id, job_id))
            .ok_or_else(|| missing(kind, project_id, job_id))?;
        record.apply(update);
        Ok(())
    }
}

/// File-backed job store: `<studio>/jobs/<kind>/<job>.json`.
///
/// Updates are read-modify-write under a store-wide lock, so concurrent
/// updates through one store instance do not lose fields.
pub struct FileJobStore {
    paths: Arc<dyn StudioPaths>,
    lock: RwLock<()>,
}

impl FileJobStore {
    pub fn new(paths: Arc<dyn StudioPaths>) -> Self {
        Self {
            paths,
            lock: RwLock::new(()),
        }
    }

    fn job_path(&self, kind: JobKind, project_id: &str, job_id: &str) -> CoreResult<PathBuf> {
        StudioLayout::resolve(self.paths.as_ref(), project_id)?.job_record_path(kind, job_id)
    }

    fn read(&self, path: &Path) -> CoreResult<Option<JobRecord>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write(&self, path: &Path, record: &JobRecord) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Insert or replace a job record.
    pub async fn insert(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
        record: &JobRecord,
    ) -> CoreResult<()> {
        let _guard = self.lock.write().await;
        let path = self.job_path(kind, project_id, job_id)?;
        self.write(&path, record)
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn get(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
    ) -> CoreResult<Option<JobRecord>> {
        let _guard = self.lock.read().await;
        let path = self.job_path(kind, project_id, job_id)?;
        self.read(&path)
    }

    async fn update(
        &self,
        kind: JobKind,
        project_id: &str,
        job_id: &str,
        update: JobUpdate,
    ) -> CoreResult<()> {
        let _guard = self.lock.write().await;
        let path = self.job_path(kind, project_id, job_id)?;
        let mut record = self
            .read(&path)?
            .ok_or_else(|| missing(kind, project_id, job_id))?;
        record.apply(update);
        self.write(&path, &record)
            .map_err(|e| CoreError::storage(format!("{}: {}", path.display(), e)))?;
        debug!(kind = %kind, job_id, "Job updated");
        Ok(())
    }
}
