//! PRD Tool Executor
//!
//! Tools: `plan_prd`, `generate_prd_image`, `write_prd_section`.
//!
//! There is no separate finalize tool: a `write_prd_section` call with
//! `is_last_section = true` writes its section and finalizes the document in
//! the same dispatch. Section numbers come from `ctx.sections_written`, never
//! from the model.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use studio_core::{ExecutionContext, JobKind, JobStatus, JobUpdate};
use studio_tools::{
    lenient_i64, parse_input, progress_message, resolve_inline_links, DocumentToolExecutor,
    SectionAssignment, SectionCounter, ToolCallError, ToolOutcome, ToolResult, WriteMode,
};

use super::blog::merge_into;
use super::images::{generate_image, GenerateImageInput, ImageTarget};
use crate::services::tools::{usage_payload, StudioServices};
use crate::utils::paths::ensure_dir;

pub const PLAN_PRD: &str = "plan_prd";
pub const GENERATE_PRD_IMAGE: &str = "generate_prd_image";
pub const WRITE_PRD_SECTION: &str = "write_prd_section";

const TOOL_NAMES: &[&str] = &[PLAN_PRD, GENERATE_PRD_IMAGE, WRITE_PRD_SECTION];

const DEFAULT_DOCUMENT_TITLE: &str = "Product Requirements Document";

fn default_document_title() -> String {
    DEFAULT_DOCUMENT_TITLE.to_string()
}

fn default_product_name() -> String {
    "Unknown Product".to_string()
}

#[derive(Debug, Deserialize)]
struct PlanPrdInput {
    #[serde(default = "default_document_title")]
    document_title: String,
    #[serde(default = "default_product_name")]
    product_name: String,
    #[serde(default)]
    target_audience: Option<String>,
    #[serde(default)]
    sections: Vec<Value>,
    #[serde(default)]
    planning_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteSectionInput {
    /// Logged when it disagrees with the tally; never used for addressing.
    #[serde(default, deserialize_with = "lenient_i64")]
    section_number: Option<i64>,
    #[serde(default)]
    section_title: String,
    #[serde(default)]
    markdown_content: String,
    #[serde(default)]
    is_last_section: bool,
    /// "write" or "append"; a hint only, the tally decides.
    #[serde(default)]
    operation: Option<String>,
}

#[derive(Debug)]
enum PrdToolCall {
    Plan(PlanPrdInput),
    GenerateImage(GenerateImageInput),
    WriteSection(WriteSectionInput),
}

impl PrdToolCall {
    fn parse(name: &str, input: Value) -> Result<Self, ToolCallError> {
        match name {
            PLAN_PRD => parse_input(name, input).map(Self::Plan),
            GENERATE_PRD_IMAGE => parse_input(name, input).map(Self::GenerateImage),
            WRITE_PRD_SECTION => parse_input(name, input).map(Self::WriteSection),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }
}

/// Executes PRD agent tools.
pub struct PrdToolExecutor {
    services: StudioServices,
}

impl PrdToolExecutor {
    pub fn new(services: StudioServices) -> Self {
        Self { services }
    }

    async fn plan(&self, ctx: &ExecutionContext, input: PlanPrdInput) -> ToolResult {
        let total = input.sections.len();
        info!(
            job_id = %ctx.job_id,
            title = %input.document_title,
            sections = total,
            "Planning PRD"
        );

        let update = JobUpdate::new()
            .set("document_title", input.document_title.clone())
            .set("product_name", input.product_name.clone())
            .set_opt("target_audience", input.target_audience)
            .set("planned_sections", input.sections)
            .set_opt("planning_notes", input.planning_notes)
            .set("total_sections", total)
            .status_message(format!("Planned {total} sections, starting to write..."));

        match self.services.update_job(JobKind::Prd, ctx, update).await {
            Ok(()) => ToolResult::ok(format!(
                "PRD plan saved successfully. Document: '{}', Product: '{}', Sections planned: {}. \
                 Now proceed to write each section using the {} tool.",
                input.document_title, input.product_name, total, WRITE_PRD_SECTION
            )),
            Err(e) => ToolResult::err(format!("Error saving PRD plan: {e}")),
        }
    }

    async fn generate_image(
        &self,
        ctx: &mut ExecutionContext,
        input: GenerateImageInput,
    ) -> ToolResult {
        let layout = match self.services.layout(&ctx.project_id) {
            Ok(layout) => layout,
            Err(e) => return ToolResult::err(e),
        };
        let urls = self.services.urls.clone();
        let project_id = ctx.project_id.clone();
        let url_for = move |filename: &str| urls.prd_file(&project_id, filename);
        let target = ImageTarget {
            kind: JobKind::Prd,
            output_dir: layout.prds_dir(),
            default_alt: Some("PRD image"),
            url_for: &url_for,
        };

        match generate_image(&self.services, ctx, target, input).await {
            Ok(saved) => ToolResult::ok(format!(
                "Image generated successfully for '{}'{}. Use placeholder '{}' in your markdown: ![{}]({})",
                saved.image.purpose,
                saved.status_note(),
                saved.image.placeholder,
                saved.image.alt_text.as_deref().unwrap_or("PRD image"),
                saved.image.placeholder
            )),
            Err(e) => {
                warn!(job_id = %ctx.job_id, "{}", e);
                ToolResult::err(e)
            }
        }
    }

    async fn write_section(
        &self,
        ctx: &mut ExecutionContext,
        input: WriteSectionInput,
    ) -> ToolOutcome {
        let mut counter = SectionCounter::new(ctx.sections_written);
        let assignment = counter.assign(input.section_number, input.is_last_section);
        if let Some(operation) = input.operation.as_deref() {
            let expected = match assignment.mode {
                WriteMode::Create => "write",
                WriteMode::Append => "append",
            };
            if operation != expected {
                debug!(
                    job_id = %ctx.job_id,
                    operation,
                    expected,
                    "Ignoring model-supplied operation"
                );
            }
        }
        info!(
            job_id = %ctx.job_id,
            section = assignment.number,
            title = %input.section_title,
            is_last = assignment.is_last(),
            "Writing PRD section"
        );

        let written = self
            .append_section(ctx, &input, &assignment)
            .await
            .and_then(|message| counter.commit(&assignment).map(|n| (n, message)));

        match written {
            Ok((sections_written, message)) => {
                ctx.sections_written = sections_written;
                if assignment.is_last() {
                    self.finalize(ctx, message).await
                } else {
                    ToolOutcome::intermediate(ToolResult::ok(message))
                }
            }
            Err(e) => {
                let message = format!("Error writing section {}: {}", assignment.number, e);
                if assignment.is_last() {
                    self.services.fail_job(JobKind::Prd, ctx, message).await
                } else {
                    warn!(job_id = %ctx.job_id, "{}", message);
                    ToolOutcome::intermediate(ToolResult::err(message))
                }
            }
        }
    }

    /// Write one section to `<job>.md` and record progress on the job.
    /// Returns the confirmation for the model.
    async fn append_section(
        &self,
        ctx: &ExecutionContext,
        input: &WriteSectionInput,
        assignment: &SectionAssignment,
    ) -> Result<String, String> {
        let content = resolve_inline_links(&input.markdown_content, &ctx.images);

        let layout = self.services.layout(&ctx.project_id)?;
        ensure_dir(&layout.prds_dir()).map_err(|e| e.to_string())?;
        let path = layout
            .markdown_path(JobKind::Prd, &ctx.job_id)
            .map_err(|e| e.to_string())?;

        let job = self.services.get_job(JobKind::Prd, ctx).await?;
        let document_title = job
            .as_ref()
            .and_then(|j| j.str_field("document_title"))
            .unwrap_or(DEFAULT_DOCUMENT_TITLE)
            .to_string();
        let total = job
            .as_ref()
            .and_then(|j| j.u64_field("total_sections"))
            .unwrap_or(0) as u32;
        let mut ledger = job
            .as_ref()
            .and_then(|j| j.get("sections"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        write_section_file(&path, assignment.mode, &document_title, &content)
            .map_err(|e| e.to_string())?;

        let number = assignment.number;
        ledger.push(json!({"number": number, "title": input.section_title}));
        let update = JobUpdate::new()
            .status(JobStatus::Writing)
            .set("sections_written", number)
            .set("current_section", input.section_title.clone())
            .set("markdown_file", format!("{}.md", ctx.job_id))
            .set("sections", ledger)
            .status_message(format!(
                "Writing section {}/{}: {}...",
                number, total, input.section_title
            ));
        // The section is on disk and stays counted; the model is told the
        // job record fell behind.
        let mut message = format!("Section {} '{}' written successfully", number, input.section_title);
        if let Err(e) = self.services.update_job(JobKind::Prd, ctx, update).await {
            warn!(job_id = %ctx.job_id, section = number, "Failed to record section progress: {}", e);
            message.push_str(&format!(" (progress not recorded: {e})"));
        }
        message.push('.');
        if assignment.is_last() {
            message.push_str(" PRD document is now complete.");
        } else if let Some(progress) = progress_message(number, total) {
            message.push(' ');
            message.push_str(&progress);
        }
        Ok(message)
    }

    async fn finalize(&self, ctx: &ExecutionContext, message: String) -> ToolOutcome {
        match self.complete_document(ctx).await {
            Ok(mut payload) => {
                info!(
                    job_id = %ctx.job_id,
                    sections = ctx.sections_written,
                    "PRD finalized"
                );
                merge_into(&mut payload, usage_payload(ctx));
                ToolOutcome::terminal(ToolResult::ok(message).with_payload(payload))
            }
            Err(e) => {
                self.services
                    .fail_job(JobKind::Prd, ctx, format!("Error finalizing PRD: {e}"))
                    .await
            }
        }
    }

    async fn complete_document(&self, ctx: &ExecutionContext) -> Result<Value, String> {
        let layout = self.services.layout(&ctx.project_id)?;
        let path = layout
            .markdown_path(JobKind::Prd, &ctx.job_id)
            .map_err(|e| e.to_string())?;
        if !path.is_file() {
            return Err(format!("markdown file {} is missing", path.display()));
        }

        let document_title = self
            .services
            .get_job(JobKind::Prd, ctx)
            .await?
            .and_then(|job| job.str_field("document_title").map(String::from))
            .unwrap_or_else(|| "PRD".to_string());

        let markdown_file = format!("{}.md", ctx.job_id);
        let urls = &self.services.urls;
        let preview_url = urls.prd_preview(&ctx.project_id, &ctx.job_id);
        let download_url = urls.prd_download(&ctx.project_id, &ctx.job_id);

        let update = JobUpdate::new()
            .status(JobStatus::Ready)
            .status_message("PRD generated successfully!")
            .set("markdown_file", markdown_file.clone())
            .set("markdown_filename", markdown_file.clone())
            .set("preview_url", preview_url.clone())
            .set("download_url", download_url.clone())
            .usage(&ctx.usage)
            .set("completed_at", chrono::Utc::now().to_rfc3339());
        self.services.update_job(JobKind::Prd, ctx, update).await?;

        Ok(json!({
            "job_id": ctx.job_id,
            "document_title": document_title,
            "markdown_file": markdown_file,
            "preview_url": preview_url,
            "download_url": download_url,
            "sections_written": ctx.sections_written,
        }))
    }
}

/// Create the document (header, timestamp, separator) or append to it.
fn write_section_file(
    path: &Path,
    mode: WriteMode,
    document_title: &str,
    content: &str,
) -> std::io::Result<()> {
    let mut file = match mode {
        WriteMode::Create => {
            let mut file = std::fs::File::create(path)?;
            write!(
                file,
                "# {}\n\n*Generated on {}*\n\n---\n\n",
                document_title,
                chrono::Local::now().format("%Y-%m-%d %H:%M")
            )?;
            file
        }
        WriteMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
    };
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n\n")?;
    Ok(())
}

#[async_trait]
impl DocumentToolExecutor for PrdToolExecutor {
    fn kind(&self) -> JobKind {
        JobKind::Prd
    }

    fn tool_names(&self) -> &'static [&'static str] {
        TOOL_NAMES
    }

    fn termination_tool(&self) -> &'static str {
        WRITE_PRD_SECTION
    }

    async fn execute(
        &self,
        tool_name: &str,
        tool_input: Value,
        ctx: &mut ExecutionContext,
    ) -> ToolOutcome {
        let call = match PrdToolCall::parse(tool_name, tool_input) {
            Ok(call) => call,
            Err(e) => {
                warn!(job_id = %ctx.job_id, tool = tool_name, "{}", e);
                return e.into_outcome();
            }
        };

        match call {
            PrdToolCall::Plan(input) => ToolOutcome::intermediate(self.plan(ctx, input).await),
            PrdToolCall::GenerateImage(input) => {
                ToolOutcome::intermediate(self.generate_image(ctx, input).await)
            }
            PrdToolCall::WriteSection(input) => self.write_section(ctx, input).await,
        }
    }
}
