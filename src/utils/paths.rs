//! Studio Path Utilities
//!
//! On-disk layout for studio artifacts:
//!
//! ```text
//! <data_dir>/projects/<project>/
//!     sources/processed/<source>.txt
//!     sources/chunks/<source>/<source>_NNN.txt
//!     studio/blogs/<job>.md, <job>_image_<n>.png
//!     studio/prds/<job>.md
//!     studio/websites/<job>/..., studio/websites/<job>/assets/
//!     studio/jobs/<kind>/<job>.json
//! ```

use std::path::{Component, Path, PathBuf};

use studio_core::{CoreError, CoreResult, JobKind, StudioPaths};

/// Default data directory (~/.studio-agents), falling back to a relative
/// directory when no home directory can be determined.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".studio-agents"))
        .unwrap_or_else(|| PathBuf::from(".studio-agents"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Reject identifiers that could escape their directory.
fn validate_segment(kind: &str, value: &str) -> CoreResult<()> {
    if value.is_empty() || value == "." || value == ".." || value.contains(&['/', '\\'][..]) {
        return Err(CoreError::validation(format!("Invalid {kind}: '{value}'")));
    }
    Ok(())
}

/// Directory holding a project's files.
pub fn project_dir(data_dir: &Path, project_id: &str) -> CoreResult<PathBuf> {
    validate_segment("project id", project_id)?;
    Ok(data_dir.join("projects").join(project_id))
}

/// Directory holding a project's processed sources.
pub fn sources_dir(data_dir: &Path, project_id: &str) -> CoreResult<PathBuf> {
    Ok(project_dir(data_dir, project_id)?.join("sources"))
}

/// Processed text of one source and the directory of its chunk files.
pub fn source_files(
    data_dir: &Path,
    project_id: &str,
    source_id: &str,
) -> CoreResult<(PathBuf, PathBuf)> {
    validate_segment("source id", source_id)?;
    let sources = sources_dir(data_dir, project_id)?;
    Ok((
        sources.join("processed").join(format!("{source_id}.txt")),
        sources.join("chunks").join(source_id),
    ))
}

/// Filesystem `StudioPaths` rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsStudioPaths {
    data_dir: PathBuf,
}

impl FsStudioPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl StudioPaths for FsStudioPaths {
    fn studio_dir(&self, project_id: &str) -> CoreResult<PathBuf> {
        Ok(project_dir(&self.data_dir, project_id)?.join("studio"))
    }
}

/// Per-document directories under one project's studio root.
#[derive(Debug, Clone)]
pub struct StudioLayout {
    root: PathBuf,
}

impl StudioLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the layout for a project through the path collaborator.
    pub fn resolve(paths: &dyn StudioPaths, project_id: &str) -> CoreResult<Self> {
        Ok(Self::new(paths.studio_dir(project_id)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blogs_dir(&self) -> PathBuf {
        self.root.join("blogs")
    }

    pub fn prds_dir(&self) -> PathBuf {
        self.root.join("prds")
    }

    pub fn website_dir(&self, job_id: &str) -> CoreResult<PathBuf> {
        validate_segment("job id", job_id)?;
        Ok(self.root.join("websites").join(job_id))
    }

    pub fn website_assets_dir(&self, job_id: &str) -> CoreResult<PathBuf> {
        Ok(self.website_dir(job_id)?.join("assets"))
    }

    pub fn jobs_dir(&self, kind: JobKind) -> PathBuf {
        self.root.join("jobs").join(kind.as_str())
    }

    /// Record of a job kept by the file-backed job store.
    pub fn job_record_path(&self, kind: JobKind, job_id: &str) -> CoreResult<PathBuf> {
        validate_segment("job id", job_id)?;
        Ok(self.jobs_dir(kind).join(format!("{job_id}.json")))
    }

    /// Markdown artifact for blog and PRD jobs.
    pub fn markdown_path(&self, kind: JobKind, job_id: &str) -> CoreResult<PathBuf> {
        validate_segment("job id", job_id)?;
        let dir = match kind {
            JobKind::Blog => self.blogs_dir(),
            JobKind::Prd => self.prds_dir(),
            JobKind::Website => {
                return Err(CoreError::validation(
                    "website jobs have no markdown artifact",
                ))
            }
        };
        Ok(dir.join(format!("{job_id}.md")))
    }
}

/// Validate a model-supplied filename relative to a job directory.
///
/// Nested relative paths are allowed; absolute paths and `..` are not.
pub fn resolve_relative_file(base: &Path, filename: &str) -> Result<PathBuf, String> {
    if filename.trim().is_empty() {
        return Err("Filename must not be empty".to_string());
    }
    let relative = Path::new(filename);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(format!(
                    "Invalid filename '{filename}': use a path relative to the website root without '..'"
                ))
            }
        }
    }
    Ok(base.join(relative))
}
