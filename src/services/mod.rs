//! Services
//!
//! - `tools` - the blog, PRD and website tool executors
//! - `sources` - filesystem content sampling for planning prompts

pub mod sources;
pub mod tools;

pub use sources::FsContentSampler;
pub use tools::{
    build_registry, BlogToolExecutor, PrdToolExecutor, StudioServices, StudioUrls,
    WebsiteToolExecutor,
};
