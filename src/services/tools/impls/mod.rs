//! Executor Implementations
//!
//! One executor per document type plus the helpers they share:
//! - `images` - the common image-generation flow
//! - `text_utils` - line splitting, splicing and windowed reads

pub mod blog;
pub mod prd;
pub mod website;

pub(crate) mod images;
pub(crate) mod text_utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use blog::BlogToolExecutor;
pub use prd::PrdToolExecutor;
pub use website::WebsiteToolExecutor;
