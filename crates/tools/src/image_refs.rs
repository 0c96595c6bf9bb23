//! Image References
//!
//! Images are generated before the content that shows them is written, and
//! their URLs are only durable once generation has succeeded. The model is
//! therefore handed an opaque token (`IMAGE_<n>`, 1-based position in the
//! job's image list) and every write boundary substitutes tokens for URLs.
//!
//! Two substitution styles exist:
//!
//! - **inline links** (markdown documents): `(IMAGE_n)` first, then any bare
//!   `IMAGE_n`, both becoming the bare URL.
//! - **markup attributes** (website files): `"IMAGE_n"`, `'IMAGE_n'` and
//!   unquoted `src=IMAGE_n`, each becoming a quoted URL.
//!
//! Tokens whose index has no image are left verbatim so an authoring mistake
//! stays visible in the artifact. Token matching is whole-token: `IMAGE_1`
//! never matches inside `IMAGE_12`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use studio_core::GeneratedImage;

/// Prefix shared by every placeholder token.
pub const PLACEHOLDER_PREFIX: &str = "IMAGE_";

/// Token for the image at 1-based `index`.
pub fn placeholder_token(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}")
}

struct PlaceholderPatterns {
    bare: Regex,
    inline_link: Regex,
    double_quoted: Regex,
    single_quoted: Regex,
    unquoted_src: Regex,
}

fn patterns() -> Option<&'static PlaceholderPatterns> {
    static PATTERNS: OnceLock<Option<PlaceholderPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(PlaceholderPatterns {
                bare: Regex::new(r"\bIMAGE_(\d+)\b").ok()?,
                inline_link: Regex::new(r"\(IMAGE_(\d+)\)").ok()?,
                double_quoted: Regex::new(r#""IMAGE_(\d+)""#).ok()?,
                single_quoted: Regex::new(r"'IMAGE_(\d+)'").ok()?,
                unquoted_src: Regex::new(r"src=IMAGE_(\d+)\b").ok()?,
            })
        })
        .as_ref()
}

/// The slot the next generated image will occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    /// 1-based position in the image list
    pub index: usize,
    pub placeholder: String,
    /// Filename prefix handed to the image backend
    pub filename_prefix: String,
}

impl ImageSlot {
    /// Reserve the slot after `images`. Nothing is recorded until the image
    /// is actually registered, so a failed generation leaves the next call
    /// with the same index.
    pub fn next(images: &[GeneratedImage], job_id: &str) -> Self {
        let index = images.len() + 1;
        Self {
            index,
            placeholder: placeholder_token(index),
            filename_prefix: format!("{job_id}_image_{index}"),
        }
    }

    /// Build the image record for this slot.
    pub fn into_image(
        self,
        purpose: impl Into<String>,
        section_heading: Option<String>,
        alt_text: Option<String>,
        filename: impl Into<String>,
        url: impl Into<String>,
    ) -> GeneratedImage {
        GeneratedImage {
            purpose: purpose.into(),
            section_heading,
            filename: filename.into(),
            placeholder: self.placeholder,
            alt_text,
            url: url.into(),
        }
    }
}

/// Placeholder-to-URL lookup over an image list.
pub struct ImageReferences<'a> {
    urls: HashMap<&'a str, &'a str>,
}

impl<'a> ImageReferences<'a> {
    pub fn new(images: &'a [GeneratedImage]) -> Self {
        Self {
            urls: images
                .iter()
                .map(|img| (img.placeholder.as_str(), img.url.as_str()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn url_for(&self, caps: &Captures) -> Option<&'a str> {
        let token = placeholder_token_from(caps)?;
        self.urls.get(token.as_str()).copied()
    }

    /// Markdown style: `(IMAGE_n)` -> `(url)`, then bare `IMAGE_n` -> `url`.
    pub fn resolve_inline_links(&self, content: &str) -> String {
        let Some(p) = patterns() else {
            return content.to_string();
        };
        if self.is_empty() {
            return content.to_string();
        }

        let linked = p.inline_link.replace_all(content, |caps: &Captures| {
            match self.url_for(caps) {
                Some(url) => format!("({url})"),
                None => caps[0].to_string(),
            }
        });
        p.bare
            .replace_all(&linked, |caps: &Captures| match self.url_for(caps) {
                Some(url) => url.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Markup style: quoted attribute values keep their quote character,
    /// unquoted `src=` values gain double quotes.
    pub fn resolve_markup_attributes(&self, content: &str) -> String {
        let Some(p) = patterns() else {
            return content.to_string();
        };
        if self.is_empty() {
            return content.to_string();
        }

        let double = p.double_quoted.replace_all(content, |caps: &Captures| {
            match self.url_for(caps) {
                Some(url) => format!("\"{url}\""),
                None => caps[0].to_string(),
            }
        });
        let single = p.single_quoted.replace_all(&double, |caps: &Captures| {
            match self.url_for(caps) {
                Some(url) => format!("'{url}'"),
                None => caps[0].to_string(),
            }
        });
        p.unquoted_src
            .replace_all(&single, |caps: &Captures| match self.url_for(caps) {
                Some(url) => format!("src=\"{url}\""),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

fn placeholder_token_from(caps: &Captures) -> Option<String> {
    caps.get(1).map(|m| format!("{PLACEHOLDER_PREFIX}{}", m.as_str()))
}

/// Tokens still present in `content`, in order of first appearance.
pub fn unresolved_placeholders(content: &str) -> Vec<String> {
    let Some(p) = patterns() else {
        return Vec::new();
    };
    let mut found: Vec<String> = Vec::new();
    for m in p.bare.find_iter(content) {
        if !found.iter().any(|t| t == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

/// Convenience wrapper for the markdown style.
pub fn resolve_inline_links(content: &str, images: &[GeneratedImage]) -> String {
    ImageReferences::new(images).resolve_inline_links(content)
}

/// Convenience wrapper for the markup style.
pub fn resolve_markup_attributes(content: &str, images: &[GeneratedImage]) -> String {
    ImageReferences::new(images).resolve_markup_attributes(content)
}
