//! Seed digests from externally supplied files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ripple_common::{Digest, DigestBuilder, FileSystem};

use crate::error::HashError;

/// Folds a set of seed files into one digest that perturbs every target.
pub struct SeedDigestBuilder<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> SeedDigestBuilder<'a> {
    /// Creates a builder reading through `fs`.
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Reads every file and hashes their concatenated contents.
    ///
    /// Paths are de-duplicated and read in lexicographic order, so the result
    /// does not depend on how the caller ordered them. An empty set yields
    /// `None`, which contributes nothing to any target digest.
    pub fn build<I, P>(&self, paths: I) -> Result<Option<Digest>, HashError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let ordered: BTreeSet<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        if ordered.is_empty() {
            return Ok(None);
        }

        let mut builder = DigestBuilder::new();
        for path in &ordered {
            let contents = self.fs.read(path).map_err(|e| HashError::Io {
                path: path.clone(),
                source: e,
            })?;
            builder.update(contents);
        }
        let digest = builder.finish();
        tracing::debug!(files = ordered.len(), seed = %digest, "computed seed digest");
        Ok(Some(digest))
    }
}
