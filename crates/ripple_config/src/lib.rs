//! Parsing and validation of `ripple.toml` configuration files.
//!
//! Every section is optional; a missing file behaves like an empty one.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
