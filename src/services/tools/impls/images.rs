//! Image generation shared by the three `generate_*_image` tools.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{info, warn};

use studio_core::{ExecutionContext, GeneratedImage, ImageRequest, JobKind, JobUpdate};
use studio_tools::ImageSlot;

use crate::services::tools::StudioServices;
use crate::utils::paths::ensure_dir;

fn default_purpose() -> String {
    "unknown".to_string()
}

/// Input record of every image-generation tool.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateImageInput {
    #[serde(default = "default_purpose")]
    pub purpose: String,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub section_heading: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

/// Where a document type keeps its images.
pub(crate) struct ImageTarget<'a> {
    pub kind: JobKind,
    pub output_dir: PathBuf,
    pub default_alt: Option<&'a str>,
    pub url_for: &'a (dyn Fn(&str) -> String + Send + Sync),
}

/// A generated image plus any job-record failure the model should hear about.
#[derive(Debug)]
pub(crate) struct SavedImage {
    pub image: GeneratedImage,
    pub unrecorded_status: Option<String>,
}

impl SavedImage {
    /// Suffix for the confirmation message; empty when everything was recorded.
    pub fn status_note(&self) -> String {
        match &self.unrecorded_status {
            Some(e) => format!(" (status not recorded: {e})"),
            None => String::new(),
        }
    }
}

/// Generate one image and register it under the next placeholder.
///
/// The image is appended to `ctx.images` only after the extended list has
/// been persisted, so any failure leaves the next call on the same index.
pub(crate) async fn generate_image(
    services: &StudioServices,
    ctx: &mut ExecutionContext,
    target: ImageTarget<'_>,
    input: GenerateImageInput,
) -> Result<SavedImage, String> {
    let purpose = input.purpose.clone();
    let failed = |reason: String| format!("Error generating image for {purpose}: {reason}");

    info!(job_id = %ctx.job_id, purpose = %purpose, "Generating image");

    let status = JobUpdate::new().status_message(format!("Generating image for {purpose}..."));
    let unrecorded_status = match services.update_job(target.kind, ctx, status).await {
        Ok(()) => None,
        Err(e) => {
            warn!(job_id = %ctx.job_id, "Failed to update status message: {}", e);
            Some(e)
        }
    };

    ensure_dir(&target.output_dir).map_err(|e| failed(e.to_string()))?;

    let slot = ImageSlot::next(&ctx.images, &ctx.job_id);
    let request = ImageRequest {
        prompt: input.image_prompt,
        output_dir: target.output_dir,
        count: 1,
        filename_prefix: slot.filename_prefix.clone(),
        aspect_ratio: input
            .aspect_ratio
            .unwrap_or_else(|| services.default_aspect_ratio.clone()),
    };

    let batch = services
        .images
        .generate(&request)
        .await
        .map_err(|e| failed(e.to_string()))?;
    let filename = match batch.first() {
        Some(stored) => stored.filename.clone(),
        None => {
            return Err(failed(
                batch.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    };

    let url = (target.url_for)(&filename);
    let alt_text = input
        .alt_text
        .or_else(|| target.default_alt.map(String::from));
    let image = slot.into_image(purpose.clone(), input.section_heading, alt_text, filename, url);

    let mut images = ctx.images.clone();
    images.push(image.clone());
    services
        .update_job(target.kind, ctx, JobUpdate::new().images(&images))
        .await
        .map_err(|e| failed(format!("could not record image: {e}")))?;
    ctx.images = images;

    info!(
        job_id = %ctx.job_id,
        placeholder = %image.placeholder,
        filename = %image.filename,
        "Image saved"
    );
    Ok(SavedImage {
        image,
        unrecorded_status,
    })
}
