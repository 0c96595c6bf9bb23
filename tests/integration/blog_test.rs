//! Blog Executor Integration Tests

use serde_json::json;
use studio_agents::{JobKind, JobStatus};

use super::support::{Studio, JOB_ID};

#[tokio::test]
async fn test_blog_end_to_end() {
    let studio = Studio::new(JobKind::Blog).await;
    let mut ctx = studio.ctx().with_blog_type("how-to");

    let plan = studio
        .registry
        .execute(
            JobKind::Blog,
            "plan_blog_post",
            json!({
                "title": "Keeping Lighthouses Lit",
                "outline": ["History", "Maintenance"],
                "estimated_word_count": 1500,
                "tone": "friendly",
            }),
            &mut ctx,
        )
        .await;
    assert!(plan.success());
    assert!(!plan.is_termination);

    for purpose in ["hero", "diagram"] {
        let outcome = studio
            .registry
            .execute(
                JobKind::Blog,
                "generate_blog_image",
                json!({"purpose": purpose, "image_prompt": format!("{purpose} of a lighthouse")}),
                &mut ctx,
            )
            .await;
        assert!(outcome.success());
        assert!(!outcome.is_termination);
    }
    ctx.record_iteration(1000, 400);

    let outcome = studio
        .registry
        .execute(
            JobKind::Blog,
            "write_blog_post",
            json!({
                "markdown_content": "# Lit\n\n![Hero](IMAGE_1)\n\nSee IMAGE_2 and IMAGE_3.",
                "seo_notes": "lighthouse maintenance",
            }),
            &mut ctx,
        )
        .await;
    assert!(outcome.is_termination);
    assert!(outcome.success(), "{:?}", outcome.result);

    let markdown = std::fs::read_to_string(studio.studio_dir().join(format!("blogs/{JOB_ID}.md"))).unwrap();
    assert_eq!(
        markdown,
        "# Lit\n\n![Hero](/api/v1/projects/proj-42/studio/blogs/job-7_image_1.png)\n\n\
         See /api/v1/projects/proj-42/studio/blogs/job-7_image_2.png and IMAGE_3."
    );

    let payload = outcome.result.to_json();
    assert_eq!(payload["success"], true);
    assert_eq!(payload["title"], "Keeping Lighthouses Lit");
    assert_eq!(payload["blog_type"], "how-to");
    assert_eq!(payload["images"].as_array().unwrap().len(), 2);
    assert_eq!(payload["markdown_file"], "job-7.md");
    assert_eq!(
        payload["preview_url"],
        "/api/v1/projects/proj-42/studio/blogs/job-7/preview"
    );
    assert_eq!(payload["usage"]["output_tokens"], 400);

    let job = studio.job(JobKind::Blog).await;
    assert_eq!(job.status(), Some(JobStatus::Ready));
    assert_eq!(job.u64_field("target_word_count"), Some(1500));
    assert_eq!(job.u64_field("iterations"), Some(1));
    assert_eq!(job.u64_field("input_tokens"), Some(1000));
}

#[tokio::test]
async fn test_image_indices_follow_insertion_order() {
    let studio = Studio::new(JobKind::Blog).await;
    let mut ctx = studio.ctx();

    for _ in 0..4 {
        studio
            .registry
            .execute(JobKind::Blog, "generate_blog_image", json!({}), &mut ctx)
            .await;
    }

    let images = studio.job(JobKind::Blog).await.images();
    assert_eq!(images.len(), 4);
    let placeholders: Vec<&str> = images.iter().map(|i| i.placeholder.as_str()).collect();
    assert_eq!(placeholders, vec!["IMAGE_1", "IMAGE_2", "IMAGE_3", "IMAGE_4"]);
    assert!(images.iter().all(|i| i.purpose == "unknown"));
    assert_eq!(images[3].filename, "job-7_image_4.png");
}

#[tokio::test]
async fn test_finalize_storage_fault_marks_job_error() {
    let studio = Studio::new(JobKind::Blog).await;
    let mut ctx = studio.ctx();

    // An unwritable destination: `blogs` is a regular file.
    std::fs::create_dir_all(studio.studio_dir()).unwrap();
    std::fs::write(studio.studio_dir().join("blogs"), "in the way").unwrap();

    let outcome = studio
        .registry
        .execute(
            JobKind::Blog,
            "write_blog_post",
            json!({"markdown_content": "# Never saved"}),
            &mut ctx,
        )
        .await;
    assert!(outcome.is_termination);
    assert!(!outcome.success());

    let error = outcome.result.error.clone().unwrap();
    assert!(error.starts_with("Error saving blog post:"), "{error}");
    assert_eq!(outcome.result.to_json()["iterations"], 0);

    let job = studio.job(JobKind::Blog).await;
    assert_eq!(job.status(), Some(JobStatus::Error));
    assert_eq!(job.error_message(), Some(error.as_str()));
}

#[tokio::test]
async fn test_store_fault_on_finalize_is_terminal() {
    let studio = Studio::read_only(JobKind::Blog).await;
    let mut ctx = studio.ctx();

    let outcome = studio
        .registry
        .execute(
            JobKind::Blog,
            "write_blog_post",
            json!({"markdown_content": "# Saved but not recorded"}),
            &mut ctx,
        )
        .await;
    assert!(outcome.is_termination);
    assert!(outcome
        .result
        .error
        .as_deref()
        .unwrap()
        .contains("database is read-only"));
    assert_eq!(studio.job(JobKind::Blog).await.status(), Some(JobStatus::Error));
}
