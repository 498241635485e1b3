//! # Flow-Sensitive Points-to Analysis
//!
//! Whole-program, call-inlining points-to analysis for resolved method IR:
//! - **Inlining**: every call site gets its own copy of the callee's blocks,
//!   up to a depth bound, giving call-site context without context tables
//! - **Flow sensitivity**: one fact map per block, strong updates inside
//!   blocks, union at joins
//! - **Field handling**: instance fields keyed by base variable, with implied
//!   field edges along variable copies
//!
//! ## References
//! - Lhoták & Chung "Points-to Analysis with Efficient Strong Updates" (POPL 2011)
//! - Hardekopf & Lin "Flow-Sensitive Pointer Analysis for Millions of Lines of Code" (CGO 2011)
//!
//! ## Usage
//! ```text
//! use flowpta::features::points_to::{PointerAnalysis, PtaConfig};
//!
//! let outcome = PointerAnalysis::new(&program, PtaConfig::default()).run()?;
//! for (test_id, sites) in outcome.result.iter() {
//!     println!("{}: {:?}", test_id, sites);
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for public API
pub use crate::config::PtaConfig;
pub use application::{AnalysisContext, AnalysisOutcome, AnalysisStats, PointerAnalysis};
pub use domain::{AbstractLocation, CopyEdge, FlowState, GlobalCfg, PointerSite, PointsToResult};
pub use ports::{IntrinsicRecognizer, MethodResolver, ResultSink};
// Re-export infrastructure (internal use - prefer application layer)
#[doc(hidden)]
pub use infrastructure::flow_sensitive_solver::FlowSensitiveSolver;
#[doc(hidden)]
pub use infrastructure::pointer_table::PointerTable;
