//! Application services: compilation, caching, invalidation and section writes.

pub mod compiler;
pub mod content;
pub mod error;
pub mod invalidation;
pub mod repos;
pub mod sections;
