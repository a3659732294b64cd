//! Configuration handling for reportflow

use std::path::PathBuf;

use crate::transform::DEFAULT_MIN_DISTINCT;

/// Environment variable naming the blob store root directory
pub const STORAGE_ROOT_ENV: &str = "REPORTFLOW_STORAGE_ROOT";

/// Output format for run summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for pipeline runs
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the filesystem blob store
    pub storage_root: PathBuf,
    /// Rows need more than this many distinct values to survive sanitizing
    pub min_distinct_values: usize,
    /// Run summary format
    pub output_format: OutputFormat,
    /// Print the produced table after each run
    pub preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("storage"),
            min_distinct_values: DEFAULT_MIN_DISTINCT,
            output_format: OutputFormat::default(),
            preview: false,
        }
    }
}

impl Config {
    /// Create a new Config with a storage root
    pub fn new(storage_root: PathBuf) -> Self {
        Self {
            storage_root,
            ..Default::default()
        }
    }

    /// Set the degenerate-row threshold
    pub fn with_min_distinct_values(mut self, min: usize) -> Self {
        self.min_distinct_values = min;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable table previews
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_builder() {
        let config = Config::new(PathBuf::from("/data"))
            .with_min_distinct_values(2)
            .with_preview(true);
        assert_eq!(config.storage_root, PathBuf::from("/data"));
        assert_eq!(config.min_distinct_values, 2);
        assert!(config.preview);
        assert_eq!(config.output_format, OutputFormat::Text);
    }
}
