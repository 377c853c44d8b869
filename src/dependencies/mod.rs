//! This module defines traits for external dependencies (the Atlas Admin API) to make them
//! easier to mock and substitute in tests. Commands depend on these traits instead of on the
//! HTTP client directly.
pub mod atlas;

pub use atlas::*;
