//! holocron-core: shared types, IDs, errors, and configuration.
//!
//! This crate is the foundational dependency for the other holocron crates,
//! providing type-safe record identifiers, a unified error type, the
//! timestamp convention used by every external representation, and
//! application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod timestamp;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
