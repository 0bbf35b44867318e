//! Query service backed by the `bazel` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::QueryError;
use crate::service::{source_files, QueryService};
use crate::stream::decode_streamed_targets;
use crate::target::{SourceFileRecord, Target};

/// Every target in the main repository plus the `//external` package.
const ALL_TARGETS_QUERY: &str = "'//external:all-targets' + '//...:all-targets'";

/// Every source file in the main repository.
const SOURCE_FILES_QUERY: &str = "kind('source file', //...:all-targets)";

/// Runs `bazel query` in a workspace and decodes its streamed JSON output.
#[derive(Debug, Clone)]
pub struct BazelQueryService {
    bazel_path: PathBuf,
    workspace: PathBuf,
    startup_options: Vec<String>,
    command_options: Vec<String>,
}

impl BazelQueryService {
    /// Creates a service that runs `bazel` from `PATH` inside `workspace`.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            bazel_path: PathBuf::from("bazel"),
            workspace: workspace.into(),
            startup_options: Vec::new(),
            command_options: Vec::new(),
        }
    }

    /// Uses a specific `bazel` (or `bazelisk`) binary.
    pub fn with_bazel_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bazel_path = path.into();
        self
    }

    /// Options placed before the `query` command, e.g. `--output_base=...`.
    pub fn with_startup_options(mut self, options: Vec<String>) -> Self {
        self.startup_options = options;
        self
    }

    /// Extra options placed after the `query` command.
    pub fn with_command_options(mut self, options: Vec<String>) -> Self {
        self.command_options = options;
        self
    }

    /// The workspace the query runs in.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Full argument list passed to the bazel binary for `expression`.
    pub fn query_args(&self, expression: &str) -> Vec<String> {
        let mut args = self.startup_options.clone();
        args.push("query".to_string());
        args.extend(self.command_options.iter().cloned());
        args.push("--output=streamed_jsonproto".to_string());
        args.push("--order_output=no".to_string());
        args.push(expression.to_string());
        args
    }

    fn query(&self, expression: &str) -> Result<Vec<Target>, QueryError> {
        let args = self.query_args(expression);
        let command_line = format!("{} {}", self.bazel_path.display(), args.join(" "));
        tracing::debug!(command = %command_line, workspace = %self.workspace.display(), "running query");

        let output = Command::new(&self.bazel_path)
            .args(&args)
            .current_dir(&self.workspace)
            .output()
            .map_err(|e| QueryError::Spawn {
                program: self.bazel_path.display().to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(QueryError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let targets = decode_streamed_targets(output.stdout.as_slice())?;
        tracing::info!(count = targets.len(), expression, "query finished");
        Ok(targets)
    }
}

impl QueryService for BazelQueryService {
    fn query_all_targets(&self) -> Result<Vec<Target>, QueryError> {
        self.query(ALL_TARGETS_QUERY)
    }

    fn query_all_source_file_targets(&self) -> Result<Vec<SourceFileRecord>, QueryError> {
        Ok(source_files(self.query(SOURCE_FILES_QUERY)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_args_layout() {
        let service = BazelQueryService::new("/ws")
            .with_startup_options(vec!["--output_base=/tmp/ob".to_string()])
            .with_command_options(vec!["--keep_going".to_string()]);
        assert_eq!(
            service.query_args("//...:all-targets"),
            vec![
                "--output_base=/tmp/ob",
                "query",
                "--keep_going",
                "--output=streamed_jsonproto",
                "--order_output=no",
                "//...:all-targets",
            ]
        );
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = BazelQueryService::new(dir.path())
            .with_bazel_path(dir.path().join("definitely-not-bazel"));
        assert!(matches!(
            service.query_all_targets().unwrap_err(),
            QueryError::Spawn { .. }
        ));
    }

    #[test]
    fn defaults() {
        let service = BazelQueryService::new("/ws");
        assert_eq!(service.workspace(), Path::new("/ws"));
        assert_eq!(service.query_args("x")[0], "query");
    }
}
