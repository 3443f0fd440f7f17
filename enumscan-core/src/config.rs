//! Configuration loading from enumscan.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Name of the configuration file looked up in the scanned root.
pub const CONFIG_FILE_NAME: &str = "enumscan.toml";

/// Main configuration structure for enumscan.toml.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnumscanConfig {
    /// File whose presence redirects analysis to the parent directory.
    pub marker_file: Option<String>,
    /// Parse `*_test.go` files too.
    pub include_test_files: Option<bool>,
    /// Skip preview API versions.
    pub skip_preview: Option<bool>,
    /// Regexes over relative directory paths to leave out of the walk.
    pub ignore: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Indented JSON (default true).
    pub pretty: Option<bool>,
}

impl EnumscanConfig {
    pub fn pretty(&self) -> bool {
        self.output.as_ref().and_then(|o| o.pretty).unwrap_or(true)
    }
}

/// Loads configuration from enumscan.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<EnumscanConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit file.
pub fn load_config_file(path: &Path) -> Result<EnumscanConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .with_context(|| format!("Invalid {}", path.display()))?;
    Ok(cfg)
}
