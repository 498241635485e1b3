//! Ports (Interfaces) for Points-to Analysis
//!
//! The engine's external collaborators sit behind these traits:
//! - **MethodResolver**: call site → callee method
//! - **IntrinsicRecognizer**: allocation/test hook detection
//! - **ResultSink**: persistence of the final result
//!
//! Default implementations cover the benchmark setting; embedders can swap
//! any of them through `PointerAnalysis::with_*`.

pub mod intrinsics;
pub mod resolver;
pub mod sink;

pub use intrinsics::{BenchmarkIntrinsics, Intrinsic, IntrinsicRecognizer, DEFAULT_INTRINSIC_CLASS};
pub use resolver::{HierarchyResolver, MethodResolver};
pub use sink::{file_sink, JsonFileSink, MemorySink, ResultSink, TextFileSink};
