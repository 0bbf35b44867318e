//! Decoding of line-delimited JSON target streams.

use std::io::BufRead;

use serde::Deserialize;

use crate::error::QueryError;
use crate::target::{GeneratedFileRecord, RuleRecord, SourceFileRecord, Target};

/// One line of `streamed_jsonproto` output.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamedTarget {
    #[serde(rename = "type")]
    kind: String,
    rule: Option<RuleRecord>,
    source_file: Option<SourceFileRecord>,
    generated_file: Option<GeneratedFileRecord>,
}

/// Decodes a stream of one-JSON-object-per-line target records.
///
/// Blank lines are ignored. Target kinds other than rules, source files and
/// generated files (package groups, environment groups) are skipped. Target
/// order is preserved.
pub fn decode_streamed_targets<R: BufRead>(reader: R) -> Result<Vec<Target>, QueryError> {
    let mut targets = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(QueryError::Stream)?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: StreamedTarget =
            serde_json::from_str(&line).map_err(|e| QueryError::Decode {
                line: line_no,
                reason: e.to_string(),
            })?;
        if let Some(target) = into_target(record, line_no)? {
            targets.push(target);
        }
    }
    Ok(targets)
}

fn into_target(record: StreamedTarget, line: usize) -> Result<Option<Target>, QueryError> {
    let missing = |field: &str| QueryError::Decode {
        line,
        reason: format!("{} record without `{field}` payload", record.kind),
    };
    let target = match record.kind.as_str() {
        "RULE" => Target::Rule(record.rule.ok_or_else(|| missing("rule"))?),
        "SOURCE_FILE" => {
            Target::SourceFile(record.source_file.ok_or_else(|| missing("sourceFile"))?)
        }
        "GENERATED_FILE" => Target::GeneratedFile(
            record
                .generated_file
                .ok_or_else(|| missing("generatedFile"))?,
        ),
        other => {
            tracing::trace!(kind = other, line, "skipping non-file target");
            return Ok(None);
        }
    };
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = r#"{"type":"SOURCE_FILE","sourceFile":{"name":"//lib:core.cc","location":"/ws/lib/BUILD:1:1"}}
{"type":"RULE","rule":{"name":"//lib:core","ruleClass":"cc_library","attribute":[{"name":"srcs","type":"LABEL_LIST"}],"ruleInput":["//lib:core.cc"]}}

{"type":"GENERATED_FILE","generatedFile":{"name":"//lib:libcore.a","generatingRule":"//lib:core"}}
{"type":"PACKAGE_GROUP","packageGroup":{"name":"//visibility:friends"}}
"#;

    #[test]
    fn decodes_all_supported_kinds_in_order() {
        let targets = decode_streamed_targets(STREAM.as_bytes()).unwrap();
        assert_eq!(targets.len(), 3);
        assert!(matches!(&targets[0], Target::SourceFile(s) if s.name == "//lib:core.cc"));
        match &targets[1] {
            Target::Rule(rule) => {
                assert_eq!(rule.rule_class, "cc_library");
                assert_eq!(rule.rule_inputs, vec!["//lib:core.cc"]);
            }
            other => panic!("expected rule, got {other:?}"),
        }
        match &targets[2] {
            Target::GeneratedFile(g) => assert_eq!(g.generating_rule, "//lib:core"),
            other => panic!("expected generated file, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream() {
        assert!(decode_streamed_targets("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "{\"type\":\"RULE\",\"rule\":{\"name\":\"//a:b\"}}\nnot json\n";
        match decode_streamed_targets(input.as_bytes()).unwrap_err() {
            QueryError::Decode { line, .. } => assert_eq!(line, 2),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_is_an_error() {
        let input = "{\"type\":\"GENERATED_FILE\"}\n";
        let err = decode_streamed_targets(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("generatedFile"));
    }
}
