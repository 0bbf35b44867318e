//! Build-graph query layer.
//!
//! Defines the target data model returned by the build tool, decodes the
//! line-delimited JSON stream produced by `bazel query --output=streamed_jsonproto`,
//! and provides the [`QueryService`] implementations the hashing engine
//! consumes: [`BazelQueryService`] (runs the build tool) and
//! [`FileQueryService`] / [`StaticQueryService`] (captured results).

#![warn(missing_docs)]

pub mod bazel;
pub mod error;
pub mod service;
pub mod stream;
pub mod target;

pub use bazel::BazelQueryService;
pub use error::QueryError;
pub use service::{FileQueryService, QueryService, StaticQueryService};
pub use stream::decode_streamed_targets;
pub use target::{Attribute, GeneratedFileRecord, Rule, RuleRecord, SourceFileRecord, Target};
