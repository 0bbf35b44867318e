//! Target records as returned by the build tool.
//!
//! Field names follow the JSON form of Bazel's `build.proto` so records can
//! be deserialized straight from `streamed_jsonproto` output. Unknown fields
//! are ignored.

use ripple_common::{Digest, DigestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryError;

/// Attributes that embed machine-specific absolute paths and therefore never
/// contribute to a rule's declared digest.
const IGNORED_ATTRIBUTES: &[&str] = &["generator_location"];

/// A named node in the build graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A build rule with declared attributes and ordered inputs.
    Rule(RuleRecord),
    /// A checked-in source file.
    SourceFile(SourceFileRecord),
    /// A file produced by a rule.
    GeneratedFile(GeneratedFileRecord),
}

impl Target {
    /// The target's label. May be empty for malformed records.
    pub fn name(&self) -> &str {
        match self {
            Target::Rule(rule) => &rule.name,
            Target::SourceFile(source) => &source.name,
            Target::GeneratedFile(generated) => &generated.name,
        }
    }
}

/// A rule exactly as the query service reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    /// The rule's label.
    pub name: String,
    /// Rule kind, e.g. `cc_library`.
    #[serde(default)]
    pub rule_class: String,
    /// Declared attributes in query order.
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<Attribute>,
    /// Labels this rule depends on, in query order.
    #[serde(default, rename = "ruleInput")]
    pub rule_inputs: Vec<String>,
}

/// A single declared rule attribute.
///
/// Only the name is interpreted; every other field of the attribute record is
/// kept verbatim and folded into the rule digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, e.g. `srcs`.
    pub name: String,
    /// Remaining attribute fields (type, value, explicitly-specified flag...).
    #[serde(flatten)]
    pub value: Map<String, Value>,
}

impl RuleRecord {
    /// Computes the digest of this rule's own declared configuration.
    ///
    /// Covers rule class, name and every attribute in query order. The rule
    /// inputs are not part of it; the hashing engine folds those separately.
    pub fn declared_digest(&self) -> Result<Digest, QueryError> {
        let mut builder = DigestBuilder::new();
        builder.update(&self.rule_class).update(&self.name);
        for attribute in &self.attributes {
            if IGNORED_ATTRIBUTES.contains(&attribute.name.as_str()) {
                continue;
            }
            let encoded = serde_json::to_vec(&attribute.value).map_err(|e| QueryError::Encode {
                rule: self.name.clone(),
                reason: e.to_string(),
            })?;
            builder.update(&attribute.name).update(encoded);
        }
        Ok(builder.finish())
    }

    /// Resolves this record into the [`Rule`] the hashing engine works with.
    pub fn materialize(&self) -> Result<Rule, QueryError> {
        Ok(Rule {
            name: self.name.clone(),
            digest: self.declared_digest()?.as_bytes().to_vec(),
            inputs: self.rule_inputs.clone(),
        })
    }
}

/// A checked-in source file target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileRecord {
    /// The file's label.
    pub name: String,
    /// Labels of `.bzl` files this BUILD file loads (only set for BUILD files).
    #[serde(default, rename = "subinclude")]
    pub subincludes: Vec<String>,
}

impl SourceFileRecord {
    /// Creates a record with no subincludes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subincludes: Vec::new(),
        }
    }

    /// Digest of what the build tool declares about this file: its label and
    /// the files it loads. On-disk content is layered on later.
    pub fn declared_digest(&self) -> Digest {
        let mut builder = DigestBuilder::new();
        builder.update(&self.name);
        for subinclude in &self.subincludes {
            builder.update(subinclude);
        }
        builder.finish()
    }
}

/// A file produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFileRecord {
    /// The file's label.
    pub name: String,
    /// Label of the rule that produces it.
    pub generating_rule: String,
}

/// A materialized rule: its declared digest and ordered input labels.
///
/// `digest` is opaque to the hashing engine; only its bytes matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The rule's label.
    pub name: String,
    /// Digest of the rule's declared configuration.
    pub digest: Vec<u8>,
    /// Input labels in declared order.
    pub inputs: Vec<String>,
}

impl Rule {
    /// Creates a rule from its parts.
    pub fn new(name: impl Into<String>, digest: impl Into<Vec<u8>>, inputs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            digest: digest.into(),
            inputs,
        }
    }
}
