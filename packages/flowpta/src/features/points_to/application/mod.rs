//! Application layer for Points-to Analysis
//!
//! - **PointerAnalysis**: the end-to-end run over one program
//! - **result_collector**: test points → reported site labels

pub mod analyzer;
pub mod result_collector;

pub use analyzer::{AnalysisContext, AnalysisOutcome, AnalysisStats, PointerAnalysis};
pub use result_collector::{collect, CollectedResult};
