//! Name to owning-rule index over a query result.

use std::collections::HashMap;
use std::sync::Arc;

use ripple_query::{QueryError, QueryService, Rule, Target};

/// Maps target names to the rule whose digest they take.
///
/// Rules map to themselves and generated files map to their generating
/// rule. Source files are not indexed. The index is read-only once built.
#[derive(Debug, Default)]
pub struct GraphIndex {
    owners: HashMap<String, Arc<Rule>>,
    rule_count: usize,
}

impl GraphIndex {
    /// Builds the index, materializing every rule through `query`.
    ///
    /// All rules are indexed before any generated file, so the order of
    /// `targets` does not matter. A generated file whose generating rule is
    /// not part of the result is left out of the index.
    pub fn build(targets: &[Target], query: &dyn QueryService) -> Result<Self, QueryError> {
        let mut owners = HashMap::with_capacity(targets.len());
        for target in targets {
            if let Target::Rule(record) = target {
                if record.name.is_empty() {
                    continue;
                }
                let rule = query.materialize_rule(record)?;
                owners.insert(record.name.clone(), Arc::new(rule));
            }
        }
        let rule_count = owners.len();

        for target in targets {
            if let Target::GeneratedFile(generated) = target {
                if generated.name.is_empty() {
                    continue;
                }
                match owners.get(&generated.generating_rule).cloned() {
                    Some(rule) => {
                        owners.insert(generated.name.clone(), rule);
                    }
                    None => tracing::warn!(
                        file = %generated.name,
                        rule = %generated.generating_rule,
                        "generating rule not found in query result"
                    ),
                }
            }
        }

        tracing::debug!(rules = rule_count, entries = owners.len(), "built graph index");
        Ok(Self { owners, rule_count })
    }

    /// Returns the rule that owns `name`'s digest, if any.
    pub fn owner(&self, name: &str) -> Option<&Rule> {
        self.owners.get(name).map(Arc::as_ref)
    }

    /// Number of rules in the index.
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Number of indexed names (rules plus generated files).
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_query::{GeneratedFileRecord, RuleRecord, SourceFileRecord, StaticQueryService};

    fn rule(name: &str) -> Target {
        Target::Rule(RuleRecord {
            name: name.to_string(),
            rule_class: "genrule".to_string(),
            attributes: Vec::new(),
            rule_inputs: Vec::new(),
        })
    }

    fn generated(name: &str, by: &str) -> Target {
        Target::GeneratedFile(GeneratedFileRecord {
            name: name.to_string(),
            generating_rule: by.to_string(),
        })
    }

    fn build(targets: &[Target]) -> GraphIndex {
        GraphIndex::build(targets, &StaticQueryService::default()).unwrap()
    }

    #[test]
    fn rules_map_to_themselves() {
        let index = build(&[rule("//a:gen")]);
        assert_eq!(index.owner("//a:gen").unwrap().name, "//a:gen");
        assert_eq!(index.rule_count(), 1);
    }

    #[test]
    fn generated_files_map_to_generating_rule() {
        let index = build(&[rule("//a:gen"), generated("//a:out.txt", "//a:gen")]);
        assert_eq!(index.owner("//a:out.txt").unwrap().name, "//a:gen");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn generated_file_before_its_rule() {
        let index = build(&[generated("//a:out.txt", "//a:gen"), rule("//a:gen")]);
        assert_eq!(index.owner("//a:out.txt").unwrap().name, "//a:gen");
    }

    #[test]
    fn dangling_generated_file_is_unindexed() {
        let index = build(&[generated("//a:out.txt", "//a:missing")]);
        assert!(index.owner("//a:out.txt").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn source_files_and_empty_names_are_skipped() {
        let index = build(&[
            Target::SourceFile(SourceFileRecord::new("//a:a.txt")),
            rule(""),
        ]);
        assert!(index.is_empty());
    }

    #[test]
    fn materialize_failure_propagates() {
        struct Failing;
        impl QueryService for Failing {
            fn query_all_targets(&self) -> Result<Vec<Target>, QueryError> {
                Ok(Vec::new())
            }
            fn query_all_source_file_targets(
                &self,
            ) -> Result<Vec<SourceFileRecord>, QueryError> {
                Ok(Vec::new())
            }
            fn materialize_rule(&self, rule: &RuleRecord) -> Result<Rule, QueryError> {
                Err(QueryError::Encode {
                    rule: rule.name.clone(),
                    reason: "boom".to_string(),
                })
            }
        }
        let err = GraphIndex::build(&[rule("//a:gen")], &Failing).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
