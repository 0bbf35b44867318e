//! Target-name to digest snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete mapping from target name to lowercase-hex digest, taken at one
/// point in time.
///
/// Snapshots are built once and not modified afterwards. They serialize as a
/// plain JSON object sorted by target name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    digests: BTreeMap<String, String>,
}

impl Snapshot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, digest: String) {
        self.digests.insert(name, digest);
    }

    /// Returns the digest recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.digests.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` has a recorded digest.
    pub fn contains(&self, name: &str) -> bool {
        self.digests.contains_key(name)
    }

    /// Number of targets in the snapshot.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Returns `true` if the snapshot has no targets.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Iterates `(name, digest)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.digests.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            digests: iter.into_iter().collect(),
        }
    }
}
