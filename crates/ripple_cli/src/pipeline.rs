//! Shared helpers for CLI commands: configuration resolution, seed lists and
//! snapshot files.

use std::path::{Path, PathBuf};

use ripple_config::{find_config, load_config, RippleConfig};
use ripple_hash::Snapshot;

use crate::GlobalArgs;

/// A loaded configuration plus the directory its relative paths are based on.
pub struct Settings {
    /// The parsed configuration (defaults when no file was found).
    pub config: RippleConfig,
    /// Directory containing the config file, or the current directory.
    pub base_dir: PathBuf,
}

/// Loads `--config` if given, otherwise the nearest `ripple.toml` above the
/// current directory, otherwise defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config_path = match &global.config {
        Some(path) => Some(resolve_path(&cwd, path)),
        None => find_config(&cwd),
    };

    match config_path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading configuration");
            let config = load_config(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            Ok(Settings { config, base_dir })
        }
        None => Ok(Settings {
            config: RippleConfig::default(),
            base_dir: cwd,
        }),
    }
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Reads a newline-separated list of seed paths. Blank lines are ignored and
/// relative entries are resolved against `workspace`.
pub fn read_seed_list(
    list: &Path,
    workspace: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(list)
        .map_err(|e| format!("failed to read seed list {}: {e}", list.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| resolve_path(workspace, line))
        .collect())
}

/// Reads a snapshot written by `generate-hashes`.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {e}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .map_err(|e| format!("invalid snapshot {}: {e}", path.display()))?;
    Ok(snapshot)
}

/// Writes a snapshot as pretty-printed JSON sorted by target name.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json + "\n")
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(())
}
