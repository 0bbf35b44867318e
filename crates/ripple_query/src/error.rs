//! Error types for build-graph queries.

use std::path::PathBuf;

/// Errors that can occur while querying or decoding the build graph.
///
/// All of these are fatal for a snapshot computation: a partial graph would
/// silently produce wrong digests.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A captured query result could not be read from disk.
    #[error("failed to read query output {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading from an in-flight query stream failed.
    #[error("failed to read query stream: {0}")]
    Stream(#[source] std::io::Error),

    /// The build tool could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The build tool ran but reported failure.
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// The exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A line of query output was not a valid target record.
    #[error("malformed query output at line {line}: {reason}")]
    Decode {
        /// 1-based line number in the stream.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A rule's attributes could not be serialized for digesting.
    #[error("failed to encode attributes of {rule}: {reason}")]
    Encode {
        /// The rule whose attributes failed to encode.
        rule: String,
        /// Description of the failure.
        reason: String,
    },
}
