//! Result sinks
//!
//! Where the final test id → site ids mapping is persisted.

use crate::config::{OutputConfig, OutputFormat};
use crate::errors::{PtaError, Result};
use crate::features::points_to::domain::PointsToResult;
use std::path::{Path, PathBuf};

/// Consumer of a finished analysis result
pub trait ResultSink {
    fn write(&mut self, result: &PointsToResult) -> Result<()>;
}

/// Writes `<test id>: <site> ...` lines to a file
#[derive(Debug, Clone)]
pub struct TextFileSink {
    path: PathBuf,
}

impl TextFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for TextFileSink {
    fn write(&mut self, result: &PointsToResult) -> Result<()> {
        write_file(&self.path, result.to_text())?;
        tracing::debug!("wrote {} test results to {}", result.len(), self.path.display());
        Ok(())
    }
}

/// Writes the result as a JSON object keyed by test id
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonFileSink {
    fn write(&mut self, result: &PointsToResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result)?;
        write_file(&self.path, json)?;
        tracing::debug!("wrote {} test results to {}", result.len(), self.path.display());
        Ok(())
    }
}

/// Keeps every written result in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub written: Vec<PointsToResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&PointsToResult> {
        self.written.last()
    }
}

impl ResultSink for MemorySink {
    fn write(&mut self, result: &PointsToResult) -> Result<()> {
        self.written.push(result.clone());
        Ok(())
    }
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| PtaError::sink(format!("{}: {}", path.display(), e)))
}

/// File sink matching an output configuration
pub fn file_sink(output: &OutputConfig) -> Box<dyn ResultSink> {
    match output.format {
        OutputFormat::Text => Box::new(TextFileSink::new(output.path.clone())),
        OutputFormat::Json => Box::new(JsonFileSink::new(output.path.clone())),
    }
}
