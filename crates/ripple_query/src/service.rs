//! The query-service seam consumed by the hashing engine.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::QueryError;
use crate::stream::decode_streamed_targets;
use crate::target::{Rule, RuleRecord, SourceFileRecord, Target};

/// Source of the build graph.
///
/// Every error returned here is fatal for the snapshot being computed.
pub trait QueryService {
    /// Returns every target in the workspace, in the order the build tool
    /// reported them.
    fn query_all_targets(&self) -> Result<Vec<Target>, QueryError>;

    /// Returns every source-file target in the workspace.
    fn query_all_source_file_targets(&self) -> Result<Vec<SourceFileRecord>, QueryError>;

    /// Resolves a rule record into its declared digest and ordered inputs.
    fn materialize_rule(&self, rule: &RuleRecord) -> Result<Rule, QueryError> {
        rule.materialize()
    }
}

/// Extracts the source-file records from a target list.
pub fn source_files(targets: Vec<Target>) -> Vec<SourceFileRecord> {
    targets
        .into_iter()
        .filter_map(|target| match target {
            Target::SourceFile(source) => Some(source),
            _ => None,
        })
        .collect()
}

/// A query result already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticQueryService {
    targets: Vec<Target>,
}

impl StaticQueryService {
    /// Wraps a target list.
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

impl QueryService for StaticQueryService {
    fn query_all_targets(&self) -> Result<Vec<Target>, QueryError> {
        Ok(self.targets.clone())
    }

    fn query_all_source_file_targets(&self) -> Result<Vec<SourceFileRecord>, QueryError> {
        Ok(source_files(self.targets.clone()))
    }
}

/// Replays a `streamed_jsonproto` dump captured earlier with `bazel query`.
#[derive(Debug, Clone)]
pub struct FileQueryService {
    path: PathBuf,
}

impl FileQueryService {
    /// Reads targets from the dump at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The dump being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QueryService for FileQueryService {
    fn query_all_targets(&self) -> Result<Vec<Target>, QueryError> {
        let file = File::open(&self.path).map_err(|e| QueryError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        decode_streamed_targets(BufReader::new(file))
    }

    fn query_all_source_file_targets(&self) -> Result<Vec<SourceFileRecord>, QueryError> {
        Ok(source_files(self.query_all_targets()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::GeneratedFileRecord;

    fn sample() -> Vec<Target> {
        vec![
            Target::SourceFile(SourceFileRecord::new("//a:a.txt")),
            Target::GeneratedFile(GeneratedFileRecord {
                name: "//a:out".to_string(),
                generating_rule: "//a:gen".to_string(),
            }),
            Target::SourceFile(SourceFileRecord::new("//b:b.txt")),
        ]
    }

    #[test]
    fn static_service_filters_source_files() {
        let service = StaticQueryService::new(sample());
        assert_eq!(service.query_all_targets().unwrap().len(), 3);
        let sources = service.query_all_source_file_targets().unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["//a:a.txt", "//b:b.txt"]);
    }

    #[test]
    fn default_materialize_uses_record() {
        let record = RuleRecord {
            name: "//a:gen".to_string(),
            rule_class: "genrule".to_string(),
            attributes: Vec::new(),
            rule_inputs: vec!["//a:a.txt".to_string()],
        };
        let rule = StaticQueryService::default()
            .materialize_rule(&record)
            .unwrap();
        assert_eq!(rule, record.materialize().unwrap());
    }

    #[test]
    fn file_service_reads_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"type\":\"SOURCE_FILE\",\"sourceFile\":{\"name\":\"//a:a.txt\"}}\n",
                "{\"type\":\"RULE\",\"rule\":{\"name\":\"//a:lib\",\"ruleInput\":[\"//a:a.txt\"]}}\n",
            ),
        )
        .unwrap();

        let service = FileQueryService::new(&path);
        assert_eq!(service.query_all_targets().unwrap().len(), 2);
        assert_eq!(service.query_all_source_file_targets().unwrap().len(), 1);
    }

    #[test]
    fn file_service_missing_dump() {
        let dir = tempfile::tempdir().unwrap();
        let service = FileQueryService::new(dir.path().join("missing.jsonl"));
        assert!(matches!(
            service.query_all_targets().unwrap_err(),
            QueryError::Io { .. }
        ));
    }
}
