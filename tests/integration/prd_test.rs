//! PRD Executor Integration Tests

use serde_json::{json, Value};
use studio_agents::{JobKind, JobStatus};

use super::support::{Studio, JOB_ID};

fn section(number: i64, title: &str, is_last: bool) -> Value {
    json!({
        "section_number": number,
        "section_title": title,
        "markdown_content": format!("## {title}\n\n{title} content."),
        "is_last_section": is_last,
        "operation": if number == 1 { "write" } else { "append" },
    })
}

#[tokio::test]
async fn test_duplicate_section_numbers_produce_three_sections() {
    let studio = Studio::new(JobKind::Prd).await;
    let mut ctx = studio.ctx();

    studio
        .registry
        .execute(
            JobKind::Prd,
            "plan_prd",
            json!({"document_title": "Beacon PRD", "sections": ["Overview", "Users", "Scope"]}),
            &mut ctx,
        )
        .await;

    let mut outcomes = Vec::new();
    for (claimed, title, last) in [(1, "Overview", false), (1, "Users", false), (3, "Scope", true)] {
        outcomes.push(
            studio
                .registry
                .execute(JobKind::Prd, "write_prd_section", section(claimed, title, last), &mut ctx)
                .await,
        );
    }

    assert_eq!(
        outcomes.iter().map(|o| o.is_termination).collect::<Vec<_>>(),
        vec![false, false, true]
    );
    assert!(outcomes.iter().all(|o| o.success()));
    assert_eq!(
        outcomes[1].result.message.as_deref(),
        Some("Section 2 'Users' written successfully. Progress: 2/3 sections complete. 1 section(s) remaining.")
    );
    assert_eq!(
        outcomes[2].result.message.as_deref(),
        Some("Section 3 'Scope' written successfully. PRD document is now complete.")
    );
    assert_eq!(ctx.sections_written, 3);

    let doc = std::fs::read_to_string(studio.studio_dir().join(format!("prds/{JOB_ID}.md"))).unwrap();
    assert_eq!(doc.matches("# Beacon PRD").count(), 1);
    let overview = doc.find("## Overview").unwrap();
    let users = doc.find("## Users").unwrap();
    let scope = doc.find("## Scope").unwrap();
    assert!(overview < users && users < scope);
    assert_eq!(doc.matches("content.").count(), 3);
    assert!(doc.ends_with("## Scope\n\nScope content.\n\n"));

    let job = studio.job(JobKind::Prd).await;
    assert_eq!(job.status(), Some(JobStatus::Ready));
    let numbers: Vec<u64> = job.get("sections").unwrap().as_array().unwrap()
        .iter()
        .map(|s| s["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let payload = outcomes[2].result.payload.as_ref().unwrap();
    assert_eq!(payload["document_title"], "Beacon PRD");
    assert_eq!(
        payload["preview_url"],
        "/api/v1/projects/proj-42/studio/prds/job-7/preview"
    );
}

#[tokio::test]
async fn test_out_of_order_numbers_never_skip() {
    let studio = Studio::new(JobKind::Prd).await;
    let mut ctx = studio.ctx();

    for claimed in [5, 2, 9, 1] {
        studio
            .registry
            .execute(JobKind::Prd, "write_prd_section", section(claimed, "S", false), &mut ctx)
            .await;
    }
    assert_eq!(ctx.sections_written, 4);
    assert_eq!(studio.job(JobKind::Prd).await.u64_field("sections_written"), Some(4));
}

#[tokio::test]
async fn test_store_fault_on_last_section() {
    let studio = Studio::read_only(JobKind::Prd).await;
    let mut ctx = studio.ctx();

    let outcome = studio
        .registry
        .execute(JobKind::Prd, "write_prd_section", section(1, "Only", true), &mut ctx)
        .await;
    assert!(outcome.is_termination);
    assert!(!outcome.success());
    // The section itself was written before finalize failed.
    assert_eq!(ctx.sections_written, 1);

    let error = outcome.result.error.clone().unwrap();
    assert!(error.starts_with("Error finalizing PRD:"), "{error}");
    let job = studio.job(JobKind::Prd).await;
    assert_eq!(job.status(), Some(JobStatus::Error));
    assert_eq!(job.error_message(), Some(error.as_str()));
}

#[tokio::test]
async fn test_unrecorded_progress_is_reported() {
    let studio = Studio::rejecting(JobKind::Prd, JobStatus::Writing).await;
    let mut ctx = studio.ctx();

    let first = studio
        .registry
        .execute(JobKind::Prd, "write_prd_section", section(1, "Overview", false), &mut ctx)
        .await;
    assert!(first.success());
    assert_eq!(
        first.result.message.as_deref(),
        Some(
            "Section 1 'Overview' written successfully \
             (progress not recorded: Storage error: database is read-only)."
        )
    );
    // Still counted, so the next write appends rather than re-creating.
    assert_eq!(ctx.sections_written, 1);

    let last = studio
        .registry
        .execute(JobKind::Prd, "write_prd_section", section(2, "Scope", true), &mut ctx)
        .await;
    assert!(last.is_termination);
    assert!(last.success());
    assert!(last
        .result
        .message
        .as_deref()
        .unwrap()
        .ends_with("(progress not recorded: Storage error: database is read-only). PRD document is now complete."));

    let doc = std::fs::read_to_string(studio.studio_dir().join(format!("prds/{JOB_ID}.md"))).unwrap();
    assert!(doc.contains("## Overview") && doc.contains("## Scope"));
    let job = studio.job(JobKind::Prd).await;
    assert_eq!(job.status(), Some(JobStatus::Ready));
    assert_eq!(job.get("sections_written"), None);
}
