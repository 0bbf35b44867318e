//! Errors raised while loading `ripple.toml`.

use std::path::PathBuf;

/// Why a `ripple.toml` could not be turned into a [`RippleConfig`](crate::RippleConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The content is not TOML, or a key has the wrong type.
    #[error("malformed ripple.toml: {0}")]
    Malformed(#[from] toml::de::Error),

    /// A path-valued key is present but blank.
    #[error("`{key}` is set but empty")]
    EmptyPath {
        /// Dotted key, e.g. `bazel.path`.
        key: &'static str,
    },

    /// A bazel option that would be passed as a positional argument.
    #[error("`{key}` entry {option:?} is not a flag; bazel options must start with '-'")]
    BareBazelOption {
        /// Either `bazel.startup_options` or `bazel.command_options`.
        key: &'static str,
        /// The offending entry.
        option: String,
    },
}
