//! Storage Layer
//!
//! Handles persistence: job records (in memory or JSON files) and the JSON config.

pub mod config;
pub mod job_store;

pub use config::*;
pub use job_store::*;
