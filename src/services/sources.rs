//! Source Content Sampling
//!
//! Supplies processed source text to planning prompts. Small sources are
//! returned whole; large ones are represented by an evenly spaced sample of
//! their precomputed chunks so the beginning, middle and end all appear.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use studio_core::ContentSampler;

use crate::models::settings::SamplingConfig;
use crate::utils::paths::source_files;

const TRUNCATION_NOTICE: &str = "\n\n[Content truncated...]";

/// `ContentSampler` over `<data_dir>/projects/<p>/sources/`.
#[derive(Debug, Clone)]
pub struct FsContentSampler {
    data_dir: PathBuf,
}

impl FsContentSampler {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Sample with the configured thresholds.
    pub fn get_content_with(&self, project_id: &str, source_id: &str, config: &SamplingConfig) -> String {
        self.get_content(project_id, source_id, config.max_chars, config.max_chunks)
    }

    /// Chunk files for a source, sorted by name.
    fn chunk_files(chunks_dir: &Path, source_id: &str) -> Vec<PathBuf> {
        let entries = match fs::read_dir(chunks_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(source_id) && name.ends_with(".txt"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }
}

/// Indices of at most `max_chunks` evenly spaced items out of `count`.
pub(crate) fn sample_indices(count: usize, max_chunks: usize) -> Vec<usize> {
    if max_chunks == 0 || count == 0 {
        return Vec::new();
    }
    if count <= max_chunks {
        return (0..count).collect();
    }
    let step = count as f64 / max_chunks as f64;
    (0..max_chunks)
        .map(|i| ((i as f64 * step) as usize).min(count - 1))
        .collect()
}

/// First `max_chars` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl ContentSampler for FsContentSampler {
    fn get_content(
        &self,
        project_id: &str,
        source_id: &str,
        max_chars: usize,
        max_chunks: usize,
    ) -> String {
        let (processed, chunks_dir) = match source_files(&self.data_dir, project_id, source_id) {
            Ok(files) => files,
            Err(e) => return format!("Source: {source_id}\n(Error loading content: {e})"),
        };

        let full_text = match fs::read_to_string(&processed) {
            Ok(text) => text,
            Err(_) => return format!("Source: {source_id}\n(Content not yet processed)"),
        };

        if full_text.chars().count() < max_chars {
            return full_text;
        }

        let chunks = Self::chunk_files(&chunks_dir, source_id);
        if chunks.is_empty() {
            debug!(source_id, "No chunks found; truncating source");
            return format!("{}{}", truncate_chars(&full_text, max_chars), TRUNCATION_NOTICE);
        }

        let sampled: Vec<String> = sample_indices(chunks.len(), max_chunks)
            .into_iter()
            .filter_map(|i| match fs::read_to_string(&chunks[i]) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(chunk = %chunks[i].display(), "Skipping unreadable chunk: {}", e);
                    None
                }
            })
            .collect();

        if sampled.is_empty() {
            return format!("{}{}", truncate_chars(&full_text, max_chars), TRUNCATION_NOTICE);
        }
        debug!(
            source_id,
            total = chunks.len(),
            sampled = sampled.len(),
            "Sampled source chunks"
        );
        sampled.join("\n\n")
    }
}
