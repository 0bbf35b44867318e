//! Configuration types deserialized from `ripple.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `ripple.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct RippleConfig {
    /// Workspace location.
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// How to query the build graph.
    #[serde(default)]
    pub bazel: BazelConfig,
    /// Digest computation settings.
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// `[workspace]` section.
#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// Workspace root. Relative paths are taken relative to the config file.
    /// Defaults to the directory containing the config file.
    #[serde(default)]
    pub path: Option<String>,
}

/// `[bazel]` section.
#[derive(Debug, Deserialize)]
pub struct BazelConfig {
    /// The bazel (or bazelisk) executable.
    #[serde(default = "default_bazel_path")]
    pub path: String,
    /// Options placed before the `query` command.
    #[serde(default)]
    pub startup_options: Vec<String>,
    /// Options placed after the `query` command.
    #[serde(default)]
    pub command_options: Vec<String>,
    /// Read targets from a captured `streamed_jsonproto` dump instead of
    /// running bazel.
    #[serde(default)]
    pub query_file: Option<String>,
}

impl Default for BazelConfig {
    fn default() -> Self {
        Self {
            path: default_bazel_path(),
            startup_options: Vec::new(),
            command_options: Vec::new(),
            query_file: None,
        }
    }
}

fn default_bazel_path() -> String {
    "bazel".to_string()
}

/// `[hashing]` section.
#[derive(Debug, Deserialize)]
pub struct HashingConfig {
    /// Fold on-disk source-file content into source digests.
    #[serde(default = "default_true")]
    pub content_hashing: bool,
    /// File listing seed paths, one per line.
    #[serde(default)]
    pub seed_filepaths: Option<String>,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            content_hashing: true,
            seed_filepaths: None,
        }
    }
}

fn default_true() -> bool {
    true
}
