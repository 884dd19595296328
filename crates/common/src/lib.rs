//! Shared building blocks for the article service crates.
//!
//! - `utils::logging`: tracing subscriber setup shared by the binary and tests
//! - `types`: small HTTP payloads that are not tied to a single domain

pub mod types;
pub mod utils;
