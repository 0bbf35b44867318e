//! End-to-end snapshot computation over a query service.

use std::path::{Path, PathBuf};

use ripple_common::FileSystem;
use ripple_query::QueryService;

use crate::engine::{DigestCache, DigestEngine};
use crate::error::HashError;
use crate::index::GraphIndex;
use crate::seed::SeedDigestBuilder;
use crate::snapshot::Snapshot;
use crate::source::SourceDigestResolver;

/// Computes a full [`Snapshot`] from the build graph.
///
/// Each call queries the graph afresh and uses its own [`DigestCache`], so
/// one client can produce independent snapshots.
pub struct TargetHashingClient<'a> {
    query: &'a dyn QueryService,
    fs: &'a dyn FileSystem,
    workspace: Option<PathBuf>,
}

impl<'a> TargetHashingClient<'a> {
    /// Creates a client that hashes declared digests only.
    pub fn new(query: &'a dyn QueryService, fs: &'a dyn FileSystem) -> Self {
        Self {
            query,
            fs,
            workspace: None,
        }
    }

    /// Sets the workspace root: source-file content under it is hashed, and
    /// relative seed paths are resolved against it.
    pub fn with_workspace(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace = Some(root.into());
        self
    }

    /// Hashes every target in the graph, folding the given seed files into
    /// every digest.
    pub fn hash_all_targets<I, P>(&self, seed_paths: I) -> Result<Snapshot, HashError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let source_records = self.query.query_all_source_file_targets()?;
        let mut resolver = SourceDigestResolver::new(self.fs);
        if let Some(root) = &self.workspace {
            resolver = resolver.with_workspace(root);
        }
        let sources = resolver.resolve_all(&source_records)?;

        let seed_paths: Vec<PathBuf> = seed_paths
            .into_iter()
            .map(|p| match &self.workspace {
                Some(root) => root.join(p),
                None => p.as_ref().to_path_buf(),
            })
            .collect();
        let seed = SeedDigestBuilder::new(self.fs).build(&seed_paths)?;

        let targets = self.query.query_all_targets()?;
        let index = GraphIndex::build(&targets, self.query)?;

        let engine = DigestEngine::new(&index, &sources, seed);
        let mut cache = DigestCache::new();
        let snapshot = engine.digest_all_targets(&targets, &mut cache)?;

        tracing::info!(
            targets = snapshot.len(),
            rules = cache.len(),
            source_files = sources.len(),
            seeded = seed.is_some(),
            "hashed all targets"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_common::MemoryFileSystem;
    use ripple_query::{RuleRecord, SourceFileRecord, StaticQueryService, Target};

    fn graph() -> StaticQueryService {
        StaticQueryService::new(vec![
            Target::SourceFile(SourceFileRecord::new("//app:main.cc")),
            Target::Rule(RuleRecord {
                name: "//app:bin".to_string(),
                rule_class: "cc_binary".to_string(),
                attributes: Vec::new(),
                rule_inputs: vec!["//app:main.cc".to_string()],
            }),
        ])
    }

    #[test]
    fn hashes_every_target() {
        let query = graph();
        let fs = MemoryFileSystem::new();
        let snapshot = TargetHashingClient::new(&query, &fs)
            .hash_all_targets(Vec::<PathBuf>::new())
            .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|(_, d)| d.len() == 64));
    }

    #[test]
    fn seed_paths_resolve_against_workspace() {
        let query = graph();
        let fs = MemoryFileSystem::new().with_file("/ws/seed.txt", "v1");
        let client = TargetHashingClient::new(&query, &fs).with_workspace("/ws");
        let seeded = client.hash_all_targets(["seed.txt"]).unwrap();
        let plain = client.hash_all_targets(Vec::<PathBuf>::new()).unwrap();
        assert_ne!(seeded, plain);
    }

    #[test]
    fn content_hashing_follows_workspace() {
        let query = graph();
        let v1 = MemoryFileSystem::new().with_file("/ws/app/main.cc", "int main() {}");
        let v2 = MemoryFileSystem::new().with_file("/ws/app/main.cc", "int main() { return 1; }");

        let before = TargetHashingClient::new(&query, &v1)
            .with_workspace("/ws")
            .hash_all_targets(Vec::<PathBuf>::new())
            .unwrap();
        let after = TargetHashingClient::new(&query, &v2)
            .with_workspace("/ws")
            .hash_all_targets(Vec::<PathBuf>::new())
            .unwrap();
        assert_ne!(before.get("//app:bin"), after.get("//app:bin"));

        let blind_before = TargetHashingClient::new(&query, &v1)
            .hash_all_targets(Vec::<PathBuf>::new())
            .unwrap();
        let blind_after = TargetHashingClient::new(&query, &v2)
            .hash_all_targets(Vec::<PathBuf>::new())
            .unwrap();
        assert_eq!(blind_before, blind_after);
    }
}
