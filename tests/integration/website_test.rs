//! Website Executor Integration Tests

use serde_json::{json, Value};
use studio_agents::{ExecutionContext, JobKind, JobStatus, ToolOutcome};

use super::support::Studio;

const HERO_URL: &str = "/api/v1/projects/proj-42/studio/websites/job-7/assets/job-7_image_1.png";

async fn call(studio: &Studio, ctx: &mut ExecutionContext, tool: &str, input: Value) -> ToolOutcome {
    studio
        .registry
        .execute(JobKind::Website, tool, input, ctx)
        .await
}

fn read(studio: &Studio, filename: &str) -> String {
    std::fs::read_to_string(studio.studio_dir().join("websites/job-7").join(filename)).unwrap()
}

async fn three_line_file(studio: &Studio, ctx: &mut ExecutionContext) {
    let outcome = call(
        studio,
        ctx,
        "create_file",
        json!({"filename": "index.html", "content": "<header>\n<main>\n<footer>\n"}),
    )
    .await;
    assert!(outcome.success());
}

#[tokio::test]
async fn test_plan_image_create_resolves_src() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();

    let plan = call(
        &studio,
        &mut ctx,
        "plan_website",
        json!({"site_name": "Harbor Lights", "site_type": "landing", "pages": ["index"], "features": ["gallery"]}),
    )
    .await;
    assert_eq!(
        plan.result.message.as_deref(),
        Some("Website plan saved successfully. Site: 'Harbor Lights', Type: landing, Pages: 1, Features: 1")
    );

    let image = call(
        &studio,
        &mut ctx,
        "generate_website_image",
        json!({"purpose": "hero", "image_prompt": "harbor at dusk", "aspect_ratio": "21:9"}),
    )
    .await;
    assert_eq!(
        image.result.message.as_deref(),
        Some("Image generated successfully for 'hero'. Use placeholder 'IMAGE_1' in your HTML code for this image.")
    );
    assert!(studio.studio_dir().join("websites/job-7/assets/job-7_image_1.png").is_file());

    let created = call(
        &studio,
        &mut ctx,
        "create_file",
        json!({"filename": "index.html", "content": "<img src=IMAGE_1 alt=\"Harbor\">"}),
    )
    .await;
    assert!(created.success());
    assert!(!created.is_termination);

    assert_eq!(
        read(&studio, "index.html"),
        format!("<img src=\"{HERO_URL}\" alt=\"Harbor\">")
    );
    assert_eq!(ctx.created_files, vec!["index.html"]);
    assert_eq!(studio.job(JobKind::Website).await.files(), vec!["index.html"]);
}

#[tokio::test]
async fn test_update_file_lines_full_replace_and_errors() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();
    three_line_file(&studio, &mut ctx).await;

    let outcome = call(
        &studio,
        &mut ctx,
        "update_file_lines",
        json!({"filename": "index.html", "start_line": 1, "end_line": 3, "new_content": "<body>\n</body>"}),
    )
    .await;
    assert!(outcome.success());
    assert_eq!(read(&studio, "index.html"), "<body>\n</body>\n");

    for (start, end) in [(2, 1), (1, 3)] {
        let outcome = call(
            &studio,
            &mut ctx,
            "update_file_lines",
            json!({"filename": "index.html", "start_line": start, "end_line": end, "new_content": "x"}),
        )
        .await;
        assert!(!outcome.success());
        assert!(!outcome.is_termination);
    }
    assert_eq!(read(&studio, "index.html"), "<body>\n</body>\n");
}

#[tokio::test]
async fn test_insert_code_boundaries() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();
    three_line_file(&studio, &mut ctx).await;

    call(&studio, &mut ctx, "insert_code", json!({"filename": "index.html", "after_line": 0, "content": "<!DOCTYPE html>"})).await;
    assert_eq!(read(&studio, "index.html"), "<!DOCTYPE html>\n<header>\n<main>\n<footer>\n");

    three_line_file(&studio, &mut ctx).await;
    call(&studio, &mut ctx, "insert_code", json!({"filename": "index.html", "after_line": 3, "content": "<script></script>"})).await;
    assert_eq!(read(&studio, "index.html"), "<header>\n<main>\n<footer>\n<script></script>\n");

    three_line_file(&studio, &mut ctx).await;
    let outcome = call(
        &studio,
        &mut ctx,
        "insert_code",
        json!({"filename": "index.html", "after_line": 5, "content": "x"}),
    )
    .await;
    assert!(!outcome.success());
    assert_eq!(
        outcome.result.error.as_deref(),
        Some("Invalid line number. File has 3 lines, you requested to insert after line 5.")
    );
    assert_eq!(read(&studio, "index.html"), "<header>\n<main>\n<footer>\n");
}

#[tokio::test]
async fn test_edits_resolve_placeholders() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();
    three_line_file(&studio, &mut ctx).await;
    call(&studio, &mut ctx, "generate_website_image", json!({"purpose": "hero"})).await;

    call(
        &studio,
        &mut ctx,
        "update_file_lines",
        json!({"filename": "index.html", "start_line": 2, "end_line": 2, "new_content": "<main style='background: url(\"IMAGE_1\")'>"}),
    )
    .await;
    call(
        &studio,
        &mut ctx,
        "insert_code",
        json!({"filename": "index.html", "after_line": 3, "content": "<img src='IMAGE_1'>"}),
    )
    .await;

    let html = read(&studio, "index.html");
    assert_eq!(html.matches(HERO_URL).count(), 2);
    assert!(!html.contains("IMAGE_1"));
}

#[tokio::test]
async fn test_read_file_windows() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();
    let content: String = (1..=200).map(|i| format!("<p>{i}</p>\n")).collect();
    call(&studio, &mut ctx, "create_file", json!({"filename": "long.html", "content": content})).await;

    let overview = call(&studio, &mut ctx, "read_file", json!({"filename": "long.html"})).await;
    let text = overview.result.message.unwrap();
    assert!(text.contains("... [100 lines omitted] ..."));
    assert!(text.contains("[Lines 151-200]"));

    let window = call(
        &studio,
        &mut ctx,
        "read_file",
        json!({"filename": "long.html", "start_line": 100, "end_line": 101}),
    )
    .await;
    let text = window.result.message.unwrap();
    assert!(text.starts_with("File: long.html (lines 95-106 of 200)\n\n<p>95</p>\n"));
    assert!(text.ends_with("<p>106</p>\n"));
}

#[tokio::test]
async fn test_finalize_marks_ready_with_usage() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();
    three_line_file(&studio, &mut ctx).await;
    ctx.record_iteration(10, 20);
    ctx.record_iteration(30, 40);

    let outcome = call(
        &studio,
        &mut ctx,
        "finalize_website",
        json!({"summary": "Landing page", "pages_created": ["index.html"], "features_implemented": ["nav"]}),
    )
    .await;
    assert!(outcome.is_termination);
    assert!(outcome.success());

    let payload = outcome.result.to_json();
    assert_eq!(payload["site_name"], "Website");
    assert_eq!(payload["iterations"], 2);
    assert_eq!(payload["usage"], json!({"input_tokens": 40, "output_tokens": 60}));
    assert_eq!(payload["features"], json!(["nav"]));

    let job = studio.job(JobKind::Website).await;
    assert_eq!(job.status(), Some(JobStatus::Ready));
    assert_eq!(job.str_field("summary"), Some("Landing page"));
    assert_eq!(job.u64_field("output_tokens"), Some(60));
}

#[tokio::test]
async fn test_finalize_storage_fault() {
    let studio = Studio::read_only(JobKind::Website).await;
    let mut ctx = studio.ctx();

    let outcome = call(&studio, &mut ctx, "finalize_website", json!({})).await;
    assert!(outcome.is_termination);
    assert!(!outcome.success());

    let error = outcome.result.error.clone().unwrap();
    assert_eq!(error, "Error finalizing website: Storage error: database is read-only");
    let job = studio.job(JobKind::Website).await;
    assert_eq!(job.status(), Some(JobStatus::Error));
    assert_eq!(job.error_message(), Some(error.as_str()));
}

#[tokio::test]
async fn test_malformed_finalize_is_not_terminal() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();

    let outcome = call(&studio, &mut ctx, "finalize_website", json!({"pages_created": "index.html"})).await;
    assert!(!outcome.is_termination);
    assert!(!outcome.success());
    assert_eq!(studio.job(JobKind::Website).await.status(), Some(JobStatus::Planning));
}
