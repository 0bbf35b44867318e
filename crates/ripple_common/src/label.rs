//! Build label parsing.
//!
//! Labels in the main repository look like `//package/path:target`. External
//! labels (`@repo//...`) and bare names are not mapped onto the workspace.

use std::path::PathBuf;

/// A borrowed view of a `//package:target` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label<'a> {
    package: &'a str,
    target: Option<&'a str>,
}

impl<'a> Label<'a> {
    /// Parses a main-repository label, returning `None` for anything that
    /// does not start with `//` or has nothing after it.
    pub fn parse(name: &'a str) -> Option<Self> {
        let rest = name.strip_prefix("//")?;
        if rest.is_empty() {
            return None;
        }
        let (package, target) = match rest.split_once(':') {
            Some((package, target)) => (package, Some(target)),
            None => (rest, None),
        };
        Some(Self { package, target })
    }

    /// The package part (may be empty for the root package).
    pub fn package(&self) -> &'a str {
        self.package
    }

    /// The target part after `:`, if present.
    pub fn target(&self) -> Option<&'a str> {
        self.target
    }

    /// Path of the file this label names, relative to the workspace root.
    ///
    /// The first `:` becomes a path separator: `//foo/bar:baz.txt` maps to
    /// `foo/bar/baz.txt` and `//:BUILD` maps to `BUILD`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        if !self.package.is_empty() {
            path.push(self.package);
        }
        if let Some(target) = self.target {
            path.push(target);
        }
        path
    }
}
