//! Domain layer types and invariants.

pub mod content;
pub mod defaults;
pub mod entities;
pub mod error;
pub mod format;
pub mod legacy;
pub mod types;
pub mod validate;
