//! Registry and Configuration Integration Tests

use std::sync::Arc;

use serde_json::json;
use studio_agents::{
    build_registry, ConfigService, ConfigUpdate, ExecutorRegistry, FileJobStore, FsStudioPaths,
    JobKind, JobRecord, JobStatus, JobStore, StudioServices,
};

use super::support::{RecordingImageGenerator, Studio, JOB_ID, PROJECT_ID};

#[tokio::test]
async fn test_registry_holds_all_document_types() {
    let studio = Studio::new(JobKind::Blog).await;
    assert_eq!(studio.registry.len(), 3);

    for (kind, terminal) in [
        (JobKind::Blog, "write_blog_post"),
        (JobKind::Prd, "write_prd_section"),
        (JobKind::Website, "finalize_website"),
    ] {
        let executor = studio.registry.get(kind).unwrap();
        assert_eq!(executor.kind(), kind);
        assert_eq!(executor.termination_tool(), terminal);
        assert!(executor.tool_names().contains(&terminal));
    }
}

#[tokio::test]
async fn test_unknown_tool_for_every_executor() {
    let studio = Studio::new(JobKind::Website).await;
    let mut ctx = studio.ctx();

    for kind in [JobKind::Blog, JobKind::Prd, JobKind::Website] {
        let outcome = studio
            .registry
            .execute(kind, "delete_everything", json!({}), &mut ctx)
            .await;
        assert!(!outcome.is_termination);
        assert_eq!(
            outcome.result.to_content(),
            "Error: Unknown tool: delete_everything"
        );
    }
}

#[tokio::test]
async fn test_empty_registry_reports_missing_executor() {
    let registry = ExecutorRegistry::new();
    let mut ctx = studio_agents::ExecutionContext::new(PROJECT_ID, JOB_ID);
    let outcome = registry
        .execute(JobKind::Prd, "plan_prd", json!({}), &mut ctx)
        .await;
    assert!(!outcome.is_termination);
    assert_eq!(
        outcome.result.error.as_deref(),
        Some("No executor registered for prd jobs")
    );
}

#[tokio::test]
async fn test_configured_services_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut config_service = ConfigService::open(dir.path().join("config.json")).unwrap();
    let config = config_service
        .update_config(ConfigUpdate {
            data_dir: Some(dir.path().join("data")),
            api_base: Some("https://studio.example.com/api/v2".to_string()),
            default_aspect_ratio: Some("4:3".to_string()),
            ..Default::default()
        })
        .unwrap();

    let paths = Arc::new(FsStudioPaths::new(config.data_dir.clone()));
    let store = Arc::new(FileJobStore::new(paths));
    store
        .insert(JobKind::Blog, PROJECT_ID, JOB_ID, &JobRecord::new())
        .await
        .unwrap();

    let services = StudioServices::from_config(
        &config,
        store.clone(),
        Arc::new(RecordingImageGenerator::default()),
    );
    let registry = build_registry(services);
    let mut ctx = studio_agents::ExecutionContext::new(PROJECT_ID, JOB_ID);

    registry
        .execute(JobKind::Blog, "generate_blog_image", json!({"purpose": "hero"}), &mut ctx)
        .await;
    assert_eq!(
        ctx.images[0].url,
        "https://studio.example.com/api/v2/projects/proj-42/studio/blogs/job-7_image_1.png"
    );

    let outcome = registry
        .execute(
            JobKind::Blog,
            "write_blog_post",
            json!({"markdown_content": "![Hero](IMAGE_1)"}),
            &mut ctx,
        )
        .await;
    assert!(outcome.success());

    let job = store
        .get(JobKind::Blog, PROJECT_ID, JOB_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status(), Some(JobStatus::Ready));
    assert_eq!(job.images().len(), 1);
    assert!(dir
        .path()
        .join("data/projects/proj-42/studio/jobs/blog/job-7.json")
        .is_file());
}
