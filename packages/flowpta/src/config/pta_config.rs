//! Points-to analysis configuration

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigExportV1;
use crate::features::points_to::ports::intrinsics::DEFAULT_INTRINSIC_CLASS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Upper bound accepted for `max_inline_depth`
pub const MAX_INLINE_DEPTH_LIMIT: usize = 64;

/// Result file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<test id>: <site> <site> ...` per line
    #[default]
    Text,
    /// JSON object keyed by test id
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Where allocation facts enter the dataflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Every allocation fact is joined into every block
    #[default]
    Everywhere,
    /// An allocation fact is generated only by the block holding the `new`
    AtAllocation,
}

impl FromStr for SeedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "everywhere" => Ok(SeedPolicy::Everywhere),
            "at_allocation" => Ok(SeedPolicy::AtAllocation),
            other => Err(ConfigError::Validation(format!("unknown seed policy '{}'", other))),
        }
    }
}

/// Where results go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("result.txt"),
            format: OutputFormat::Text,
        }
    }
}

/// Points-to analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PtaConfig {
    /// Calls inside a method instance at depth `d` are inlined iff `d < max_inline_depth`
    pub max_inline_depth: usize,

    /// Solver block-evaluation budget (None = unlimited)
    pub max_iterations: Option<usize>,

    /// Emit implied instance-field edges for variable copies
    pub field_copropagation: bool,

    pub seed_policy: SeedPolicy,

    /// Declaring class of the intrinsic hooks
    pub intrinsic_class: String,

    /// Method name of the allocation hook
    pub alloc_hook: String,

    /// Method name of the test hook
    pub test_hook: String,

    /// Entry method override as `Class.method`
    pub entry: Option<String>,

    pub output: OutputConfig,
}

impl Default for PtaConfig {
    fn default() -> Self {
        Self {
            max_inline_depth: 10,
            max_iterations: Some(1_000_000),
            field_copropagation: true,
            seed_policy: SeedPolicy::Everywhere,
            intrinsic_class: DEFAULT_INTRINSIC_CLASS.to_string(),
            alloc_hook: "alloc".to_string(),
            test_hook: "test".to_string(),
            entry: None,
            output: OutputConfig::default(),
        }
    }
}

impl PtaConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_inline_depth > MAX_INLINE_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_inline_depth",
                self.max_inline_depth,
                0,
                MAX_INLINE_DEPTH_LIMIT,
                "Inlining is exponential in the depth of fan-out call chains",
            ));
        }

        if self.max_iterations == Some(0) {
            return Err(ConfigError::Validation(
                "max_iterations must be at least 1 or None for unlimited".to_string(),
            ));
        }

        if self.intrinsic_class.is_empty() || self.alloc_hook.is_empty() || self.test_hook.is_empty() {
            return Err(ConfigError::Validation(
                "intrinsic_class, alloc_hook and test_hook must be non-empty".to_string(),
            ));
        }

        if self.alloc_hook == self.test_hook {
            return Err(ConfigError::Validation(format!(
                "alloc_hook and test_hook must differ (both are '{}')",
                self.alloc_hook
            )));
        }

        if let Some(entry) = &self.entry {
            if !entry.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "entry '{}' must be written as Class.method",
                    entry
                )));
            }
        }

        Ok(())
    }

    /// Builder: Set max_inline_depth
    pub fn max_inline_depth(mut self, v: usize) -> Self {
        self.max_inline_depth = v;
        self
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: Option<usize>) -> Self {
        self.max_iterations = v;
        self
    }

    /// Builder: Set field_copropagation
    pub fn field_copropagation(mut self, v: bool) -> Self {
        self.field_copropagation = v;
        self
    }

    /// Builder: Set seed_policy
    pub fn seed_policy(mut self, v: SeedPolicy) -> Self {
        self.seed_policy = v;
        self
    }

    /// Builder: Set intrinsic_class
    pub fn intrinsic_class(mut self, v: impl Into<String>) -> Self {
        self.intrinsic_class = v.into();
        self
    }

    /// Builder: Set entry
    pub fn entry(mut self, v: impl Into<String>) -> Self {
        self.entry = Some(v.into());
        self
    }

    /// Builder: Set output path
    pub fn output_path(mut self, v: impl Into<PathBuf>) -> Self {
        self.output.path = v.into();
        self
    }

    /// Builder: Set output format
    pub fn output_format(mut self, v: OutputFormat) -> Self {
        self.output.format = v;
        self
    }

    /// Parse and validate a YAML document (schema v1)
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(yaml)?;

        if export.version != 1 {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: vec![1],
            });
        }

        let config = export.pta;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file (schema v1)
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Export as a YAML v1 document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            pta: self.clone(),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}
