//! Content-addressed target hashing and impacted-target detection.
//!
//! Every target in the build graph gets a SHA-256 digest that covers its own
//! declared configuration, the digests of everything it depends on (in
//! declared order), and an optional seed built from externally supplied
//! files. Two [`Snapshot`]s taken before and after a change are then diffed
//! to find the targets that need rebuilding.
//!
//! The pieces, leaves first:
//!
//! - [`SourceDigestResolver`] digests individual source files, optionally
//!   mixing in their on-disk content.
//! - [`SeedDigestBuilder`] folds a set of seed files into a single digest.
//! - [`GraphIndex`] maps target names to the rule that owns their digest.
//! - [`DigestEngine`] propagates digests through the rule graph with a
//!   per-snapshot [`DigestCache`].
//! - [`diff_snapshots`] reports impacted targets.
//!
//! [`TargetHashingClient`] wires all of it to a query service.

#![warn(missing_docs)]

pub mod client;
pub mod engine;
pub mod error;
pub mod impact;
pub mod index;
pub mod seed;
pub mod snapshot;
pub mod source;

pub use client::TargetHashingClient;
pub use engine::{DigestCache, DigestEngine};
pub use error::HashError;
pub use impact::diff_snapshots;
pub use index::GraphIndex;
pub use seed::SeedDigestBuilder;
pub use snapshot::Snapshot;
pub use source::{SourceDigestResolver, SourceDigests};
