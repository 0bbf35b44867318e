//! Digests for individual source-file targets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use ripple_common::{Digest, DigestBuilder, FileSystem, Label};
use ripple_query::SourceFileRecord;

use crate::error::HashError;

/// Resolved source-file digests keyed by label.
pub type SourceDigests = HashMap<String, Digest>;

/// Computes the digest of a single source-file target.
///
/// The digest covers the declared digest reported by the query service and
/// the label itself. When a workspace root is configured, the file's on-disk
/// content is folded in first, so editing a file changes its digest even
/// though the build tool reports nothing new about it.
pub struct SourceDigestResolver<'a> {
    fs: &'a dyn FileSystem,
    workspace: Option<PathBuf>,
}

impl<'a> SourceDigestResolver<'a> {
    /// Creates a resolver that ignores on-disk content.
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            workspace: None,
        }
    }

    /// Enables content hashing relative to `root`.
    pub fn with_workspace(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace = Some(root.into());
        self
    }

    /// The workspace root used for content hashing, if any.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    /// Digests one source file from its label and declared digest.
    ///
    /// A label that does not map onto the workspace, or a file that does not
    /// exist, silently falls back to declared digest plus name. A file that
    /// cannot be inspected or read is an error.
    pub fn resolve(&self, name: &str, declared: &[u8]) -> Result<Digest, HashError> {
        let mut builder = DigestBuilder::new();
        if let Some(path) = self.content_path(name) {
            let io_error = |source| HashError::Io {
                path: path.clone(),
                source,
            };
            if self.fs.exists(&path).map_err(io_error)? {
                let contents = self.fs.read(&path).map_err(io_error)?;
                builder.update(contents);
            }
        }
        builder.update(declared).update(name);
        Ok(builder.finish())
    }

    /// Resolves every record in parallel.
    ///
    /// Records with an empty name are skipped. The first read failure aborts
    /// the whole table.
    pub fn resolve_all(&self, records: &[SourceFileRecord]) -> Result<SourceDigests, HashError> {
        let digests = records
            .par_iter()
            .filter(|record| !record.name.is_empty())
            .map(|record| {
                let digest = self.resolve(&record.name, record.declared_digest().as_bytes())?;
                Ok((record.name.clone(), digest))
            })
            .collect::<Result<SourceDigests, HashError>>()?;
        tracing::debug!(count = digests.len(), "resolved source file digests");
        Ok(digests)
    }

    fn content_path(&self, name: &str) -> Option<PathBuf> {
        let root = self.workspace.as_ref()?;
        let label = Label::parse(name)?;
        Some(root.join(label.relative_path()))
    }
}
