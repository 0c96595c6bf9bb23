//! Public URL derivation for studio artifacts.
//!
//! The files themselves are served by the embedding web layer; this module
//! only builds the strings handed back to the orchestrator.

/// Default prefix for every studio URL.
pub const DEFAULT_API_BASE: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioUrls {
    api_base: String,
}

impl Default for StudioUrls {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl StudioUrls {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn studio(&self, project_id: &str) -> String {
        format!("{}/projects/{}/studio", self.api_base, project_id)
    }

    pub fn blog_file(&self, project_id: &str, filename: &str) -> String {
        format!("{}/blogs/{}", self.studio(project_id), filename)
    }

    pub fn blog_preview(&self, project_id: &str, job_id: &str) -> String {
        format!("{}/blogs/{}/preview", self.studio(project_id), job_id)
    }

    pub fn prd_file(&self, project_id: &str, filename: &str) -> String {
        format!("{}/prds/{}", self.studio(project_id), filename)
    }

    pub fn prd_preview(&self, project_id: &str, job_id: &str) -> String {
        format!("{}/prds/{}/preview", self.studio(project_id), job_id)
    }

    pub fn prd_download(&self, project_id: &str, job_id: &str) -> String {
        format!("{}/prds/{}/download", self.studio(project_id), job_id)
    }

    pub fn website_asset(&self, project_id: &str, job_id: &str, filename: &str) -> String {
        format!(
            "{}/websites/{}/assets/{}",
            self.studio(project_id),
            job_id,
            filename
        )
    }

    pub fn website_preview(&self, project_id: &str, job_id: &str) -> String {
        format!("{}/websites/{}/preview", self.studio(project_id), job_id)
    }

    pub fn website_download(&self, project_id: &str, job_id: &str) -> String {
        format!("{}/websites/{}/download", self.studio(project_id), job_id)
    }
}
