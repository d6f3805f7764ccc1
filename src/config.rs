//! Configuration for the viewer engine.
//!
//! Groups the knobs that byte access and formatting read, with defaults
//! matching what the engine uses when no configuration is supplied.

use crate::error::Result;
use crate::interpret::Locale;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Byte access configuration.
    pub io: IoConfig,
    /// Formatting configuration.
    pub format: FormatConfig,
}

impl ViewerConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(crate::io::error::IoError::from)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Byte access configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Bytes loaded per refill by file-backed cursors.
    pub file_buffer_size: usize,
    /// Largest file `ByteSource::open` accepts.
    pub max_file_size: u64,
    /// Memory-map files instead of reading through a handle.
    pub prefer_mmap: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            file_buffer_size: crate::io::DEFAULT_BUFFER_SIZE,
            max_file_size: 100 * 1024 * 1024, // 100MB
            prefer_mmap: true,
        }
    }
}

/// Formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Locale passed to every interpretation.
    pub locale: Locale,
    /// How many node references may be followed while formatting a single
    /// value before giving up. Guards against reference cycles.
    pub max_reference_depth: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            max_reference_depth: 16,
        }
    }
}
