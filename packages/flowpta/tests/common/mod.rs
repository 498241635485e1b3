//! Common test utilities for flowpta
//!
//! Shared fixtures, program builders and assertions for the integration
//! tests.

#![allow(dead_code)]

mod fixtures;
mod assertions;
mod builders;

// Re-export all utilities
pub use fixtures::*;
pub use assertions::*;
pub use builders::*;
