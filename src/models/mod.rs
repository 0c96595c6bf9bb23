//! Data Models
//!
//! Configuration structures for the studio executors. Job records and the
//! execution context live in `studio_core`.

pub mod settings;

pub use settings::*;
