//! Digest propagation through the rule graph.
//!
//! A rule's digest covers, in order: its declared digest, the seed digest (if
//! any), then for every input in declared order the input's name followed by
//! the input's own digest. Rule inputs recurse; source-file inputs use the
//! resolved source digest; anything else contributes only its name.

use std::collections::{HashMap, HashSet};

use ripple_common::{Digest, DigestBuilder};
use ripple_query::{Rule, Target};

use crate::error::HashError;
use crate::index::GraphIndex;
use crate::snapshot::Snapshot;
use crate::source::SourceDigests;

/// Per-snapshot memo of computed rule digests.
///
/// Each rule is digested at most once per cache. A cache must not be reused
/// across snapshots with different seeds or graphs.
#[derive(Debug, Default)]
pub struct DigestCache {
    digests: HashMap<String, Digest>,
    active: HashSet<String>,
    stack: Vec<String>,
    computed: usize,
}

impl DigestCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized digest for `rule`, if already computed.
    pub fn get(&self, rule: &str) -> Option<Digest> {
        self.digests.get(rule).copied()
    }

    /// Number of rules digested so far.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Returns `true` if no rule has been digested yet.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Number of rule digest computations performed through this cache.
    pub fn computed(&self) -> usize {
        self.computed
    }

    fn enter(&mut self, rule: &str) -> Result<(), HashError> {
        if !self.active.insert(rule.to_string()) {
            let start = self.stack.iter().position(|r| r == rule).unwrap_or(0);
            let mut path = self.stack[start..].to_vec();
            path.push(rule.to_string());
            return Err(HashError::Cycle { path });
        }
        self.stack.push(rule.to_string());
        Ok(())
    }

    fn leave(&mut self, rule: &str) {
        self.stack.pop();
        self.active.remove(rule);
    }

    fn store(&mut self, rule: &str, digest: Digest) {
        self.digests.insert(rule.to_string(), digest);
        self.computed += 1;
    }

    /// Drops an interrupted traversal, keeping completed digests.
    fn abandon(&mut self) {
        self.active.clear();
        self.stack.clear();
    }
}

/// A rule whose digest is partway through its inputs.
struct Frame<'r> {
    rule: &'r Rule,
    next: usize,
    builder: DigestBuilder,
}

enum Step<'r> {
    /// The pending input is a rule without a digest yet.
    Descend(&'r Rule),
    Finished,
}

/// Computes target digests for one snapshot.
pub struct DigestEngine<'a> {
    index: &'a GraphIndex,
    sources: &'a SourceDigests,
    seed: Option<Digest>,
}

impl<'a> DigestEngine<'a> {
    /// Creates an engine over a built index and resolved source digests.
    pub fn new(index: &'a GraphIndex, sources: &'a SourceDigests, seed: Option<Digest>) -> Self {
        Self {
            index,
            sources,
            seed,
        }
    }

    /// Digests every target and collects the results into a snapshot.
    ///
    /// Targets with empty names are skipped, as are generated files whose
    /// generating rule is unknown. Any error aborts the whole snapshot.
    pub fn digest_all_targets(
        &self,
        targets: &[Target],
        cache: &mut DigestCache,
    ) -> Result<Snapshot, HashError> {
        let mut snapshot = Snapshot::new();
        for target in targets {
            let name = target.name();
            if name.is_empty() {
                continue;
            }
            if let Some(digest) = self.digest_target(target, cache)? {
                snapshot.insert(name.to_string(), digest.to_hex());
            }
        }
        Ok(snapshot)
    }

    /// Digests a single target.
    ///
    /// Returns `None` when the target has no owning rule in the index.
    pub fn digest_target(
        &self,
        target: &Target,
        cache: &mut DigestCache,
    ) -> Result<Option<Digest>, HashError> {
        match target {
            Target::SourceFile(source) => Ok(Some(self.source_file_digest(&source.name))),
            Target::GeneratedFile(generated) => {
                match self.index.owner(&generated.generating_rule) {
                    Some(rule) => self.rule_digest(rule, cache).map(Some),
                    None => {
                        tracing::debug!(
                            file = %generated.name,
                            rule = %generated.generating_rule,
                            "no digest for generated file"
                        );
                        Ok(None)
                    }
                }
            }
            Target::Rule(record) => match self.index.owner(&record.name) {
                Some(rule) => self.rule_digest(rule, cache).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Digest of a source-file target: its resolved digest (if known)
    /// followed by the seed.
    pub fn source_file_digest(&self, name: &str) -> Digest {
        let mut builder = DigestBuilder::new();
        if let Some(digest) = self.sources.get(name) {
            builder.update(digest);
        }
        if let Some(seed) = &self.seed {
            builder.update(seed);
        }
        builder.finish()
    }

    /// Digest of a rule, computed on first request and memoized in `cache`.
    ///
    /// Dependencies are walked with an explicit stack, so chain depth is
    /// bounded by memory rather than by the thread stack.
    pub fn rule_digest(&self, rule: &Rule, cache: &mut DigestCache) -> Result<Digest, HashError> {
        if let Some(digest) = cache.get(&rule.name) {
            return Ok(digest);
        }
        let result = self.walk(rule, cache);
        if result.is_err() {
            cache.abandon();
        }
        result
    }

    fn walk<'r>(&self, root: &'r Rule, cache: &mut DigestCache) -> Result<Digest, HashError>
    where
        'a: 'r,
    {
        let mut current = self.open(root, cache)?;
        let mut parents: Vec<Frame<'r>> = Vec::new();
        loop {
            match self.advance(&mut current, cache) {
                Step::Descend(dep) => {
                    let child = self.open(dep, cache)?;
                    parents.push(std::mem::replace(&mut current, child));
                }
                Step::Finished => {
                    let Frame { rule, builder, .. } = current;
                    let digest = builder.finish();
                    cache.leave(&rule.name);
                    cache.store(&rule.name, digest);
                    match parents.pop() {
                        Some(parent) => current = parent,
                        None => return Ok(digest),
                    }
                }
            }
        }
    }

    fn open<'r>(&self, rule: &'r Rule, cache: &mut DigestCache) -> Result<Frame<'r>, HashError> {
        cache.enter(&rule.name)?;
        let mut builder = DigestBuilder::new();
        builder.update(&rule.digest);
        if let Some(seed) = &self.seed {
            builder.update(seed);
        }
        Ok(Frame {
            rule,
            next: 0,
            builder,
        })
    }

    /// Folds inputs into `frame` until one needs a rule digest that is not
    /// cached yet. That input is left pending and folded on the next call.
    fn advance<'r>(&self, frame: &mut Frame<'r>, cache: &DigestCache) -> Step<'r>
    where
        'a: 'r,
    {
        let rule = frame.rule;
        while let Some(input) = rule.inputs.get(frame.next) {
            let owner = self.index.owner(input);
            // A rule listing itself (or one of its own outputs) adds nothing.
            if owner.is_some_and(|o| o.name == rule.name) {
                frame.next += 1;
                continue;
            }
            match owner {
                Some(dep) => match cache.get(&dep.name) {
                    Some(digest) => {
                        frame.builder.update(input).update(digest);
                    }
                    None => return Step::Descend(dep),
                },
                None => {
                    frame.builder.update(input);
                    match self.sources.get(input) {
                        Some(digest) => {
                            frame.builder.update(digest);
                        }
                        None => {
                            tracing::trace!(rule = %rule.name, input = %input, "unresolved rule input");
                        }
                    }
                }
            }
            frame.next += 1;
        }
        Step::Finished
    }
}
