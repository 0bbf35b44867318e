//! Impacted-target detection between two snapshots.

use std::collections::BTreeSet;

use crate::snapshot::Snapshot;

/// Returns the targets in `end` that are new or whose digest changed since
/// `start`.
///
/// The comparison is one-directional: targets that exist only in `start`
/// (removed targets) are never reported.
pub fn diff_snapshots(start: &Snapshot, end: &Snapshot) -> BTreeSet<String> {
    end.iter()
        .filter(|(name, digest)| start.get(name) != Some(*digest))
        .map(|(name, _)| name.to_string())
        .collect()
}
