//! Configuration system
//!
//! `PtaConfig` carries every knob of one analysis run. It can be built in
//! code through its builder setters or loaded from a versioned YAML file:
//!
//! ```yaml
//! version: 1
//! pta:
//!   max_inline_depth: 10
//!   output:
//!     path: result.txt
//!     format: text
//! ```

pub mod error;
pub mod io;
pub mod pta_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use pta_config::{OutputConfig, OutputFormat, PtaConfig, SeedPolicy, MAX_INLINE_DEPTH_LIMIT};
