//! Infrastructure layer for Points-to Analysis
//!
//! Construction and solving, in pipeline order:
//! - **PointerTable**: structural pointer identities → dense ids
//! - **BlockBuilder**: method body → basic blocks of copy edges
//! - **CallGraphInliner**: bounded-depth inlining into one global CFG
//! - **AllocationRegistry**: `new` statements → sites and seed facts
//! - **field_copropagation**: implied instance-field edges for variable copies
//! - **FlowSensitiveSolver**: worklist fixpoint over the global CFG

pub mod allocation_registry;
pub mod block_builder;
pub mod field_copropagation;
pub mod flow_sensitive_solver;
pub mod inliner;
pub mod pointer_table;
pub mod union_find;

pub use allocation_registry::AllocationRegistry;
pub use block_builder::{BlockBuilder, LocalBlock, MethodBlocks};
pub use flow_sensitive_solver::{FlowSensitiveResult, FlowSensitiveSolver, SolverStats};
pub use inliner::{CallGraphInliner, InlineStats, InlinedProgram};
pub use pointer_table::PointerTable;
pub use union_find::UnionFind;
