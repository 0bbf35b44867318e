//! Error types for snapshot computation.

use std::path::PathBuf;

use ripple_query::QueryError;

/// Errors that abort a snapshot computation.
///
/// There is no partial result: any of these means the whole snapshot is
/// discarded. Names that simply cannot be resolved are not errors; they
/// contribute nothing to the digest.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// A source or seed file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The query service failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The rule-input graph contains a cycle.
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    Cycle {
        /// Rule names along the cycle, starting and ending with the same rule.
        path: Vec<String>,
    },
}
