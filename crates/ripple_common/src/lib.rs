//! Shared foundational types used across the ripple workspace.
//!
//! This crate provides the SHA-256 [`Digest`] value and its incremental
//! [`DigestBuilder`], build-label parsing, and the thin [`FileSystem`]
//! abstraction used by the hashing engine to read source and seed files.

#![warn(missing_docs)]

pub mod digest;
pub mod fs;
pub mod label;

pub use digest::{Digest, DigestBuilder};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use label::Label;
