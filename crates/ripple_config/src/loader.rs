//! Configuration file discovery, loading and validation.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::RippleConfig;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "ripple.toml";

/// Walks up from `start` looking for the nearest `ripple.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Loads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<RippleConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<RippleConfig, ConfigError> {
    let config: RippleConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &RippleConfig) -> Result<(), ConfigError> {
    if config.bazel.path.trim().is_empty() {
        return Err(ConfigError::EmptyPath { key: "bazel.path" });
    }
    let options = [
        ("bazel.startup_options", &config.bazel.startup_options),
        ("bazel.command_options", &config.bazel.command_options),
    ];
    for (key, values) in options {
        if let Some(option) = values.iter().find(|o| !o.starts_with('-')) {
            return Err(ConfigError::BareBazelOption {
                key,
                option: option.clone(),
            });
        }
    }
    if matches!(config.workspace.path.as_deref(), Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::EmptyPath {
            key: "workspace.path",
        });
    }
    Ok(())
}
