/*
 * flowpta - Flow-Sensitive Points-To Analysis Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : IR input models (Program, Method, Stmt) and builders
 * - features/    : points_to (domain → infrastructure → application, ports)
 * - config/      : PtaConfig + versioned YAML
 * - errors.rs    : PtaError
 *
 * Pipeline:
 * - call-inlining global CFG construction (bounded depth)
 * - per-block copy edges with field co-propagation
 * - worklist fixpoint, one fact map per block
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Lowering helpers thread the whole run state
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models (IR input contract)
pub mod shared;
/// Feature modules
pub mod features;
/// Configuration system
pub mod config;
/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{OutputFormat, PtaConfig, SeedPolicy};
pub use errors::{PtaError, Result};
pub use features::points_to::{
    AnalysisContext, AnalysisOutcome, AnalysisStats, PointerAnalysis, PointsToResult,
};
pub use shared::models::{MethodBuilder, Program, ProgramBuilder};
