//! Integration Tests Module
//!
//! Drives the three executors end to end through the registry, with an
//! in-memory job store, a fake image backend and a temp data directory.


// Blog: plan, images, write_blog_post
mod blog_test;

// PRD: section numbering, fused last-section finalize
mod prd_test;

// Website: file tools, placeholder resolution, finalize
mod website_test;

// Registry dispatch and configuration wiring
mod registry_test;
