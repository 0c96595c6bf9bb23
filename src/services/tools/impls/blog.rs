//! Blog Tool Executor
//!
//! Tools: `plan_blog_post`, `generate_blog_image`, `write_blog_post` (terminal).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use studio_core::{ExecutionContext, JobKind, JobStatus, JobUpdate};
use studio_tools::{
    lenient_u64, parse_input, resolve_inline_links, DocumentToolExecutor, ToolCallError,
    ToolOutcome, ToolResult,
};

use super::images::{generate_image, GenerateImageInput, ImageTarget};
use crate::services::tools::{usage_payload, StudioServices};
use crate::utils::paths::ensure_dir;

pub const PLAN_BLOG_POST: &str = "plan_blog_post";
pub const GENERATE_BLOG_IMAGE: &str = "generate_blog_image";
pub const WRITE_BLOG_POST: &str = "write_blog_post";

const TOOL_NAMES: &[&str] = &[PLAN_BLOG_POST, GENERATE_BLOG_IMAGE, WRITE_BLOG_POST];

fn default_title() -> String {
    "Untitled Blog Post".to_string()
}

const DEFAULT_TARGET_WORD_COUNT: u64 = 3000;

#[derive(Debug, Deserialize)]
struct PlanBlogInput {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    outline: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_u64")]
    estimated_word_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WriteBlogInput {
    #[serde(default)]
    markdown_content: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    word_count: Option<u64>,
    #[serde(default)]
    seo_notes: String,
}

/// A parsed blog tool call.
#[derive(Debug)]
enum BlogToolCall {
    Plan(PlanBlogInput),
    GenerateImage(GenerateImageInput),
    Write(WriteBlogInput),
}

impl BlogToolCall {
    fn parse(name: &str, input: Value) -> Result<Self, ToolCallError> {
        match name {
            PLAN_BLOG_POST => parse_input(name, input).map(Self::Plan),
            GENERATE_BLOG_IMAGE => parse_input(name, input).map(Self::GenerateImage),
            WRITE_BLOG_POST => parse_input(name, input).map(Self::Write),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }
}

/// Executes blog agent tools.
pub struct BlogToolExecutor {
    services: StudioServices,
}

impl BlogToolExecutor {
    pub fn new(services: StudioServices) -> Self {
        Self { services }
    }

    async fn plan(&self, ctx: &ExecutionContext, input: PlanBlogInput) -> ToolResult {
        info!(job_id = %ctx.job_id, title = %input.title, "Planning blog post");

        let sections = input.outline.len();
        let target_words = input
            .estimated_word_count
            .unwrap_or(DEFAULT_TARGET_WORD_COUNT);
        let update = JobUpdate::new()
            .set("title", input.title.clone())
            .set_opt("meta_description", input.meta_description)
            .set_opt("tone", input.tone)
            .set("outline", input.outline)
            .set("target_word_count", target_words)
            .status_message("Blog planned, generating images...");

        match self.services.update_job(JobKind::Blog, ctx, update).await {
            Ok(()) => ToolResult::ok(format!(
                "Blog plan saved successfully. Title: '{}', Sections: {}, Target word count: {}",
                input.title, sections, target_words
            )),
            Err(e) => ToolResult::err(format!("Error saving blog plan: {e}")),
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
        let url_for = move |filename: &str| urls.blog_file(&project_id, filename);
        let target = ImageTarget {
            kind: JobKind::Blog,
            output_dir: layout.blogs_dir(),
            default_alt: Some("Blog image"),
            url_for: &url_for,
        };

        match generate_image(&self.services, ctx, target, input).await {
            Ok(saved) => ToolResult::ok(format!(
                "Image generated successfully for '{}'{}. Use placeholder '{}' in your markdown: ![{}]({})",
                saved.image.purpose,
                saved.status_note(),
                saved.image.placeholder,
                saved.image.alt_text.as_deref().unwrap_or("Blog image"),
                saved.image.placeholder
            )),
            Err(e) => {
                warn!(job_id = %ctx.job_id, "{}", e);
                ToolResult::err(e)
            }
        }
    }

    /// Resolve placeholders, save `<job>.md` and mark the job ready.
    async fn write_post(&self, ctx: &ExecutionContext, input: WriteBlogInput) -> ToolOutcome {
        info!(
            job_id = %ctx.job_id,
            chars = input.markdown_content.len(),
            "Writing blog post"
        );

        match self.save_post(ctx, input).await {
            Ok(payload) => ToolOutcome::terminal(ToolResult::ok_payload(payload)),
            Err(e) => {
                self.services
                    .fail_job(JobKind::Blog, ctx, format!("Error saving blog post: {e}"))
                    .await
            }
        }
    }

    async fn save_post(&self, ctx: &ExecutionContext, input: WriteBlogInput) -> Result<Value, String> {
        let markdown = resolve_inline_links(&input.markdown_content, &ctx.images);

        let layout = self.services.layout(&ctx.project_id)?;
        ensure_dir(&layout.blogs_dir()).map_err(|e| e.to_string())?;
        let path = layout
            .markdown_path(JobKind::Blog, &ctx.job_id)
            .map_err(|e| e.to_string())?;
        std::fs::write(&path, &markdown).map_err(|e| e.to_string())?;

        let markdown_file = format!("{}.md", ctx.job_id);
        info!(job_id = %ctx.job_id, file = %markdown_file, "Saved blog markdown");

        let title = self
            .services
            .get_job(JobKind::Blog, ctx)
            .await?
            .and_then(|job| job.str_field("title").map(String::from))
            .unwrap_or_else(|| "Blog Post".to_string());

        let word_count = input
            .word_count
            .filter(|&n| n > 0)
            .unwrap_or_else(|| markdown.split_whitespace().count() as u64);
        let urls = &self.services.urls;
        let markdown_url = urls.blog_file(&ctx.project_id, &markdown_file);
        let preview_url = urls.blog_preview(&ctx.project_id, &ctx.job_id);

        let update = JobUpdate::new()
            .status(JobStatus::Ready)
            .status_message("Blog post generated successfully!")
            .set("markdown_file", markdown_file.clone())
            .set("markdown_url", markdown_url.clone())
            .set("preview_url", preview_url.clone())
            .set("word_count", word_count)
            .usage(&ctx.usage)
            .set("completed_at", chrono::Utc::now().to_rfc3339());
        self.services.update_job(JobKind::Blog, ctx, update).await?;

        let mut payload = json!({
            "job_id": ctx.job_id,
            "title": title,
            "markdown_file": markdown_file,
            "markdown_url": markdown_url,
            "preview_url": preview_url,
            "images": ctx.images,
            "word_count": word_count,
            "target_keyword": ctx.target_keyword.clone().unwrap_or_default(),
            "blog_type": ctx.blog_type.clone().unwrap_or_default(),
            "seo_notes": input.seo_notes,
        });
        merge_into(&mut payload, usage_payload(ctx));
        Ok(payload)
    }
}

/// Copy every key of `extra` into `target` (both objects).
pub(crate) fn merge_into(target: &mut Value, extra: Value) {
    if let (Value::Object(target), Value::Object(extra)) = (target, extra) {
        target.extend(extra);
    }
}

#[async_trait]
impl DocumentToolExecutor for BlogToolExecutor {
    fn kind(&self) -> JobKind {
        JobKind::Blog
    }

    fn tool_names(&self) -> &'static [&'static str] {
        TOOL_NAMES
    }

    fn termination_tool(&self) -> &'static str {
        WRITE_BLOG_POST
    }

    async fn execute(
        &self,
        tool_name: &str,
        tool_input: Value,
        ctx: &mut ExecutionContext,
    ) -> ToolOutcome {
        let call = match BlogToolCall::parse(tool_name, tool_input) {
            Ok(call) => call,
            Err(e) => {
                warn!(job_id = %ctx.job_id, tool = tool_name, "{}", e);
                return e.into_outcome();
            }
        };

        match call {
            BlogToolCall::Plan(input) => ToolOutcome::intermediate(self.plan(ctx, input).await),
            BlogToolCall::GenerateImage(input) => {
                ToolOutcome::intermediate(self.generate_image(ctx, input).await)
            }
            BlogToolCall::Write(input) => self.write_post(ctx, input).await,
        }
    }
}
