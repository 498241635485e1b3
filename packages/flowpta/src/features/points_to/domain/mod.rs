//! Domain models for Points-to Analysis
//!
//! Core abstractions independent of the construction algorithms:
//! - PointerSite: variable / static field / instance field identities
//! - AbstractLocation: heap allocation site abstraction
//! - CopyEdge: block-scoped `target := source` facts
//! - FlowState: pointer → sites map, the dataflow value
//! - BasicBlock / GlobalCfg: the inlined whole-program CFG
//! - PointsToResult: test id → reported site ids

pub mod abstract_location;
pub mod basic_block;
pub mod constraint;
pub mod flow_state;
pub mod global_cfg;
pub mod pointer;
pub mod points_to_result;

pub use abstract_location::{AbstractLocation, LocationId};
pub use basic_block::{BasicBlock, BlockId, BlockKind, TestMark};
pub use constraint::{CopyEdge, EdgeOrigin};
pub use flow_state::{FlowState, LocationSet};
pub use global_cfg::{GlobalCfg, GlobalCfgBuilder};
pub use pointer::{PointerId, PointerSite};
pub use points_to_result::PointsToResult;
