//! Configuration for file inspection.
//!
//! Provides centralized configuration for all inspection components with
//! sensible defaults, loadable from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::IOLimits;

/// Master configuration for an inspection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// I/O configuration for file reading.
    pub io: IOConfig,
    /// Section name resolution configuration.
    pub names: NameConfig,
    /// Process input files on a thread pool instead of one after another.
    pub parallel: bool,
}

impl InspectConfig {
    /// Load a configuration from a JSON file; missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would make every file fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.names.max_name_len > 0,
            "names.max_name_len must be at least 1 (the NUL terminator)"
        );
        Ok(())
    }
}

/// I/O configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOConfig {
    /// Maximum file size to open (bytes).
    pub max_file_size: u64,
    /// Maximum total bytes read from one file (bytes).
    pub max_read_bytes: u64,
}

impl Default for IOConfig {
    fn default() -> Self {
        let limits = IOLimits::default();
        Self {
            max_file_size: limits.max_file_size,
            max_read_bytes: limits.max_read_bytes,
        }
    }
}

impl IOConfig {
    pub fn limits(&self) -> IOLimits {
        IOLimits {
            max_file_size: self.max_file_size,
            max_read_bytes: self.max_read_bytes,
        }
    }
}

/// Which section holds the section names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringTableSource {
    /// The section at `e_shstrndx`.
    #[default]
    HeaderIndex,
    /// The last section in the table, whatever `e_shstrndx` says.
    LastSection,
}

/// Section name resolution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    /// Longest name scan, NUL terminator included (bytes).
    pub max_name_len: usize,
    pub string_table: StringTableSource,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            max_name_len: 128,
            string_table: StringTableSource::HeaderIndex,
        }
    }
}
