//! Configuration I/O (YAML schema types)
//!
//! Loading and export live on `PtaConfig`; this module only defines the
//! versioned document shape.

use super::pta_config::PtaConfig;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Analysis settings; omitted keys keep their defaults
    #[serde(default)]
    pub pta: PtaConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_file_loading() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "version: 1\npta:\n  max_inline_depth: 4\n  entry: Main.main\n"
        )
        .unwrap();

        let config = PtaConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.max_inline_depth, 4);
        assert_eq!(config.entry.as_deref(), Some("Main.main"));
    }

    #[test]
    fn test_missing_file() {
        let result = PtaConfig::from_yaml_file("/nonexistent/flowpta.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_missing_version_rejected() {
        let result = PtaConfig::from_yaml_str("pta:\n  max_inline_depth: 4\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
