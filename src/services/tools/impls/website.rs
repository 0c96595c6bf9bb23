//! Website Tool Executor
//!
//! Tools: `plan_website`, `generate_website_image`, `read_file`, `create_file`,
//! `update_file_lines`, `insert_code`, `finalize_website` (terminal).
//!
//! Files live under `<studio>/websites/<job>/`. Every write resolves image
//! placeholders in markup form against the job's persisted image list, so an
//! image generated in an earlier call resolves even if this context has not
//! seen it.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use studio_core::{ExecutionContext, GeneratedImage, JobKind, JobStatus, JobUpdate};
use studio_tools::{
    parse_input, unresolved_placeholders, DocumentToolExecutor, ImageReferences, ToolCallError,
    ToolOutcome, ToolResult,
};

use super::blog::merge_into;
use super::images::{generate_image, GenerateImageInput, ImageTarget};
use super::text_utils::{insert_lines, render_file_view, replace_lines, split_lines};
use crate::services::tools::{usage_payload, StudioServices};
use crate::utils::paths::{ensure_dir, resolve_relative_file};

pub const PLAN_WEBSITE: &str = "plan_website";
pub const GENERATE_WEBSITE_IMAGE: &str = "generate_website_image";
pub const READ_FILE: &str = "read_file";
pub const CREATE_FILE: &str = "create_file";
pub const UPDATE_FILE_LINES: &str = "update_file_lines";
pub const INSERT_CODE: &str = "insert_code";
pub const FINALIZE_WEBSITE: &str = "finalize_website";

const TOOL_NAMES: &[&str] = &[
    PLAN_WEBSITE,
    GENERATE_WEBSITE_IMAGE,
    READ_FILE,
    CREATE_FILE,
    UPDATE_FILE_LINES,
    INSERT_CODE,
    FINALIZE_WEBSITE,
];

fn default_site_name() -> String {
    "Unnamed Website".to_string()
}

#[derive(Debug, Deserialize)]
struct PlanWebsiteInput {
    #[serde(default)]
    site_type: Option<String>,
    #[serde(default = "default_site_name")]
    site_name: String,
    #[serde(default)]
    pages: Vec<Value>,
    #[serde(default)]
    features: Vec<Value>,
    #[serde(default)]
    design_system: Option<Value>,
    #[serde(default)]
    navigation_style: Option<String>,
    #[serde(default)]
    images_needed: Vec<Value>,
    #[serde(default)]
    layout_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadFileInput {
    filename: String,
    #[serde(default)]
    start_line: Option<i64>,
    #[serde(default)]
    end_line: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateFileInput {
    filename: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpdateFileLinesInput {
    filename: String,
    start_line: i64,
    end_line: i64,
    #[serde(default)]
    new_content: String,
}

#[derive(Debug, Deserialize)]
struct InsertCodeInput {
    filename: String,
    after_line: i64,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct FinalizeWebsiteInput {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    pages_created: Vec<Value>,
    #[serde(default)]
    features_implemented: Vec<Value>,
    #[serde(default)]
    cdn_libraries_used: Vec<Value>,
}

#[derive(Debug)]
enum WebsiteToolCall {
    Plan(PlanWebsiteInput),
    GenerateImage(GenerateImageInput),
    ReadFile(ReadFileInput),
    CreateFile(CreateFileInput),
    UpdateFileLines(UpdateFileLinesInput),
    InsertCode(InsertCodeInput),
    Finalize(FinalizeWebsiteInput),
}

impl WebsiteToolCall {
    fn parse(name: &str, input: Value) -> Result<Self, ToolCallError> {
        match name {
            PLAN_WEBSITE => parse_input(name, input).map(Self::Plan),
            GENERATE_WEBSITE_IMAGE => parse_input(name, input).map(Self::GenerateImage),
            READ_FILE => parse_input(name, input).map(Self::ReadFile),
            CREATE_FILE => parse_input(name, input).map(Self::CreateFile),
            UPDATE_FILE_LINES => parse_input(name, input).map(Self::UpdateFileLines),
            INSERT_CODE => parse_input(name, input).map(Self::InsertCode),
            FINALIZE_WEBSITE => parse_input(name, input).map(Self::Finalize),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }
}

/// Executes website agent tools.
pub struct WebsiteToolExecutor {
    services: StudioServices,
}

impl WebsiteToolExecutor {
    pub fn new(services: StudioServices) -> Self {
        Self { services }
    }

    /// The job's website directory, created if absent.
    fn site_dir(&self, ctx: &ExecutionContext) -> Result<PathBuf, String> {
        let dir = self
            .services
            .layout(&ctx.project_id)?
            .website_dir(&ctx.job_id)
            .map_err(|e| e.to_string())?;
        ensure_dir(&dir).map_err(|e| e.to_string())?;
        Ok(dir)
    }

    fn site_file(&self, ctx: &ExecutionContext, filename: &str) -> Result<PathBuf, String> {
        resolve_relative_file(&self.site_dir(ctx)?, filename)
    }

    /// The job's image list as persisted, which may be ahead of `ctx.images`.
    async fn persisted_images(&self, ctx: &ExecutionContext) -> Result<Vec<GeneratedImage>, String> {
        match self.services.get_job(JobKind::Website, ctx).await? {
            Some(job) => Ok(job.images()),
            None => {
                warn!(job_id = %ctx.job_id, "Website job not found; leaving placeholders unresolved");
                Ok(Vec::new())
            }
        }
    }

    async fn resolve_markup(&self, ctx: &ExecutionContext, content: &str) -> Result<String, String> {
        let images = self.persisted_images(ctx).await?;
        Ok(ImageReferences::new(&images).resolve_markup_attributes(content))
    }

    async fn plan(&self, ctx: &ExecutionContext, input: PlanWebsiteInput) -> ToolResult {
        let pages = input.pages.len();
        let features = input.features.len();
        info!(job_id = %ctx.job_id, site = %input.site_name, pages, "Planning website");

        let update = JobUpdate::new()
            .set_opt("site_type", input.site_type.clone())
            .set("site_name", input.site_name.clone())
            .set("pages", input.pages)
            .set("features", input.features)
            .set_opt("design_system", input.design_system)
            .set_opt("navigation_style", input.navigation_style)
            .set("images_needed", input.images_needed)
            .set_opt("layout_notes", input.layout_notes)
            .status_message(format!("Planned {pages}-page website, generating images..."));

        match self.services.update_job(JobKind::Website, ctx, update).await {
            Ok(()) => ToolResult::ok(format!(
                "Website plan saved successfully. Site: '{}', Type: {}, Pages: {}, Features: {}",
                input.site_name,
                input.site_type.as_deref().unwrap_or("unspecified"),
                pages,
                features
            )),
            Err(e) => ToolResult::err(format!("Error saving website plan: {e}")),
        }
    }

    async fn generate_image(
        &self,
        ctx: &mut ExecutionContext,
        input: GenerateImageInput,
    ) -> ToolResult {
        let assets_dir = match self
            .services
            .layout(&ctx.project_id)
            .and_then(|layout| layout.website_assets_dir(&ctx.job_id).map_err(|e| e.to_string()))
        {
            Ok(dir) => dir,
            Err(e) => return ToolResult::err(e),
        };
        let urls = self.services.urls.clone();
        let project_id = ctx.project_id.clone();
        let job_id = ctx.job_id.clone();
        let url_for = move |filename: &str| urls.website_asset(&project_id, &job_id, filename);
        let target = ImageTarget {
            kind: JobKind::Website,
            output_dir: assets_dir,
            default_alt: None,
            url_for: &url_for,
        };

        match generate_image(&self.services, ctx, target, input).await {
            Ok(saved) => ToolResult::ok(format!(
                "Image generated successfully for '{}'{}. Use placeholder '{}' in your HTML code for this image.",
                saved.image.purpose,
                saved.status_note(),
                saved.image.placeholder
            )),
            Err(e) => {
                warn!(job_id = %ctx.job_id, "{}", e);
                ToolResult::err(e)
            }
        }
    }

    fn read_file(&self, ctx: &ExecutionContext, input: ReadFileInput) -> ToolResult {
        info!(
            job_id = %ctx.job_id,
            file = %input.filename,
            start = ?input.start_line,
            end = ?input.end_line,
            "Reading website file"
        );

        let path = match self.site_file(ctx, &input.filename) {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        if !path.is_file() {
            return ToolResult::err(format!(
                "File '{}' does not exist yet. Use create_file to create it first.",
                input.filename
            ));
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                return ToolResult::err(format!("Error reading file '{}': {}", input.filename, e))
            }
        };
        match render_file_view(
            &input.filename,
            &split_lines(&content),
            input.start_line,
            input.end_line,
        ) {
            Ok(view) => ToolResult::ok(view),
            Err(e) => ToolResult::err(e),
        }
    }

    async fn create_file(&self, ctx: &mut ExecutionContext, input: CreateFileInput) -> ToolResult {
        info!(
            job_id = %ctx.job_id,
            file = %input.filename,
            chars = input.content.len(),
            "Creating website file"
        );

        let path = match self.site_file(ctx, &input.filename) {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let content = match self.resolve_markup(ctx, &input.content).await {
            Ok(content) => content,
            Err(e) => {
                return ToolResult::err(format!("Error creating file '{}': {}", input.filename, e))
            }
        };

        let written = path
            .parent()
            .map_or(Ok(()), ensure_dir)
            .and_then(|_| std::fs::write(&path, &content));
        if let Err(e) = written {
            return ToolResult::err(format!("Error creating file '{}': {}", input.filename, e));
        }

        ctx.record_created_file(&input.filename);
        let update = JobUpdate::new().files(&ctx.created_files).status_message(format!(
            "Created {} ({} files so far)",
            input.filename,
            ctx.created_files.len()
        ));
        if let Err(e) = self.services.update_job(JobKind::Website, ctx, update).await {
            return ToolResult::err(format!(
                "File '{}' was written but the file list could not be saved: {}",
                input.filename, e
            ));
        }

        let mut message = format!(
            "File '{}' created successfully ({} lines, {} characters)",
            input.filename,
            content.split('\n').count(),
            content.chars().count()
        );
        let unresolved = unresolved_placeholders(&content);
        if !unresolved.is_empty() {
            message.push_str(&format!(
                ". Unresolved image placeholders: {}. Generate those images first or fix the references.",
                unresolved.join(", ")
            ));
        }
        ToolResult::ok(message)
    }

    /// Read an existing file as lines, apply `edit`, write it back.
    /// Returns the number of lines the edit spliced in.
    async fn edit_lines<F>(
        &self,
        ctx: &ExecutionContext,
        filename: &str,
        content: &str,
        edit: F,
    ) -> Result<usize, String>
    where
        F: FnOnce(&mut Vec<String>, &str) -> Result<usize, String>,
    {
        let path = self.site_file(ctx, filename)?;
        if !path.is_file() {
            return Err(format!(
                "File '{filename}' does not exist. Use create_file first."
            ));
        }

        let existing = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        let content = self.resolve_markup(ctx, content).await?;

        let mut lines = split_lines(&existing);
        let spliced = edit(&mut lines, &content)?;
        std::fs::write(&path, lines.concat()).map_err(|e| e.to_string())?;
        Ok(spliced)
    }

    async fn update_file_lines(
        &self,
        ctx: &ExecutionContext,
        input: UpdateFileLinesInput,
    ) -> ToolResult {
        info!(
            job_id = %ctx.job_id,
            file = %input.filename,
            start = input.start_line,
            end = input.end_line,
            "Updating website file lines"
        );

        let (start, end) = (input.start_line, input.end_line);
        let result = self
            .edit_lines(ctx, &input.filename, &input.new_content, |lines, content| {
                replace_lines(lines, start, end, content)
            })
            .await;
        match result {
            Ok(_) => ToolResult::ok(format!(
                "Updated lines {}-{} in '{}'",
                start, end, input.filename
            )),
            Err(e) => ToolResult::err(e),
        }
    }

    async fn insert_code(&self, ctx: &ExecutionContext, input: InsertCodeInput) -> ToolResult {
        info!(
            job_id = %ctx.job_id,
            file = %input.filename,
            after_line = input.after_line,
            "Inserting into website file"
        );

        let after_line = input.after_line;
        let result = self
            .edit_lines(ctx, &input.filename, &input.content, |lines, content| {
                insert_lines(lines, after_line, content)
            })
            .await;
        match result {
            Ok(inserted) => ToolResult::ok(format!(
                "Inserted {} lines after line {} in '{}'",
                inserted, after_line, input.filename
            )),
            Err(e) => ToolResult::err(e),
        }
    }

    async fn finalize(&self, ctx: &ExecutionContext, input: FinalizeWebsiteInput) -> ToolOutcome {
        info!(
            job_id = %ctx.job_id,
            pages = input.pages_created.len(),
            files = ctx.created_files.len(),
            "Finalizing website"
        );

        match self.complete_site(ctx, input).await {
            Ok(mut payload) => {
                merge_into(&mut payload, usage_payload(ctx));
                ToolOutcome::terminal(ToolResult::ok_payload(payload))
            }
            Err(e) => {
                self.services
                    .fail_job(JobKind::Website, ctx, format!("Error finalizing website: {e}"))
                    .await
            }
        }
    }

    async fn complete_site(
        &self,
        ctx: &ExecutionContext,
        input: FinalizeWebsiteInput,
    ) -> Result<Value, String> {
        let job = self.services.get_job(JobKind::Website, ctx).await?;
        let images = job.as_ref().map(|j| j.images()).unwrap_or_default();
        let site_name = job
            .as_ref()
            .and_then(|j| j.str_field("site_name"))
            .unwrap_or("Website")
            .to_string();

        // Catch placeholders written before their image existed.
        let references = ImageReferences::new(&images);
        for filename in &ctx.created_files {
            let path = self.site_file(ctx, filename)?;
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(job_id = %ctx.job_id, file = %filename, "Skipping unreadable file: {}", e);
                    continue;
                }
            };
            let resolved = references.resolve_markup_attributes(&content);
            if resolved != content {
                std::fs::write(&path, resolved)
                    .map_err(|e| format!("could not rewrite '{filename}': {e}"))?;
            }
        }

        let urls = &self.services.urls;
        let preview_url = urls.website_preview(&ctx.project_id, &ctx.job_id);
        let download_url = urls.website_download(&ctx.project_id, &ctx.job_id);

        let update = JobUpdate::new()
            .status(JobStatus::Ready)
            .status_message("Website generated successfully!")
            .files(&ctx.created_files)
            .set("pages_created", input.pages_created.clone())
            .set("features_implemented", input.features_implemented.clone())
            .set("cdn_libraries_used", input.cdn_libraries_used.clone())
            .set("summary", input.summary.clone())
            .set("preview_url", preview_url.clone())
            .set("download_url", download_url.clone())
            .usage(&ctx.usage)
            .set("completed_at", chrono::Utc::now().to_rfc3339());
        self.services.update_job(JobKind::Website, ctx, update).await?;

        Ok(json!({
            "job_id": ctx.job_id,
            "site_name": site_name,
            "pages_created": input.pages_created,
            "files": ctx.created_files,
            "images": images,
            "features": input.features_implemented,
            "cdn_libraries": input.cdn_libraries_used,
            "summary": input.summary,
            "preview_url": preview_url,
            "download_url": download_url,
        }))
    }
}

#[async_trait]
impl DocumentToolExecutor for WebsiteToolExecutor {
    fn kind(&self) -> JobKind {
        JobKind::Website
    }

    fn tool_names(&self) -> &'static [&'static str] {
        TOOL_NAMES
    }

    fn termination_tool(&self) -> &'static str {
        FINALIZE_WEBSITE
    }

    async fn execute(
        &self,
        tool_name: &str,
        tool_input: Value,
        ctx: &mut ExecutionContext,
    ) -> ToolOutcome {
        let call = match WebsiteToolCall::parse(tool_name, tool_input) {
            Ok(call) => call,
            Err(e) => {
                warn!(job_id = %ctx.job_id, tool = tool_name, "{}", e);
                return e.into_outcome();
            }
        };

        let result = match call {
            WebsiteToolCall::Plan(input) => self.plan(ctx, input).await,
            WebsiteToolCall::GenerateImage(input) => self.generate_image(ctx, input).await,
            WebsiteToolCall::ReadFile(input) => self.read_file(ctx, input),
            WebsiteToolCall::CreateFile(input) => self.create_file(ctx, input).await,
            WebsiteToolCall::UpdateFileLines(input) => self.update_file_lines(ctx, input).await,
            WebsiteToolCall::InsertCode(input) => self.insert_code(ctx, input).await,
            WebsiteToolCall::Finalize(input) => return self.finalize(ctx, input).await,
        };
        if !result.success {
            warn!(job_id = %ctx.job_id, tool = tool_name, "{}", result.to_content());
        }
        ToolOutcome::intermediate(result)
    }
}
