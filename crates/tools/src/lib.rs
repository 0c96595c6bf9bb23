//! Studio Tools
//!
//! The dispatch protocol shared by the blog, PRD and website executors:
//! - `ToolResult` / `ToolOutcome` - result plus loop-termination flag
//! - `DocumentToolExecutor` - one closed dispatcher per document type
//! - `ExecutorRegistry` - executors keyed by job kind
//! - `image_refs` - placeholder issue and resolution for deferred image URLs
//! - `counter` - executor-owned section numbering
//!
//! The concrete executors live in the main crate's `services::tools` module.

pub mod counter;
pub mod executor;
pub mod image_refs;
pub mod trait_def;

pub use counter::{progress_message, SectionAssignment, SectionCounter, SectionStep, WriteMode};
pub use executor::{ToolOutcome, ToolResult};
pub use image_refs::{
    placeholder_token, resolve_inline_links, resolve_markup_attributes, unresolved_placeholders,
    ImageReferences, ImageSlot, PLACEHOLDER_PREFIX,
};
pub use trait_def::{
    integer_hint, lenient_i64, lenient_u64, parse_input, DocumentToolExecutor, ExecutorRegistry,
    ToolCallError,
};
