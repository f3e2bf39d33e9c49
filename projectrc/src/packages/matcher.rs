//! Matching workspace globs against a git tree.

use super::PackageError;
use crate::github::GitTree;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::collections::HashSet;
use std::path::Path;

const MANIFEST: &str = "package.json";

/// Selects workspace package directories.
///
/// A directory is a package when it matches at least one include pattern,
/// no `!` pattern, no `workspace.ignores` entry (gitignore rules, parents
/// included) and contains a `package.json` blob.
///
/// Wildcards never match path segments starting with `.`; such a segment
/// is only selected by a pattern segment that starts with `.` itself.
#[derive(Debug, Clone)]
pub struct WorkspaceMatcher {
    include: GlobSet,
    exclude: GlobSet,
    dot_segments: GlobSet,
    ignores: Gitignore,
}

impl WorkspaceMatcher {
    /// Compiles workspace patterns and ignore entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern or ignore entry is malformed.
    pub fn new(patterns: &[String], ignores: &[String]) -> Result<Self, PackageError> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut dot_segments = GlobSetBuilder::new();

        for pattern in patterns {
            let (negated, raw) = match pattern.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, pattern.as_str()),
            };
            let normalized = normalize(raw);
            if normalized.is_empty() {
                continue;
            }

            let glob = compile(normalized, pattern)?;
            if negated {
                exclude.add(glob);
            } else {
                include.add(glob);
                for segment in normalized.split('/').filter(|s| s.starts_with('.')) {
                    dot_segments.add(compile(segment, pattern)?);
                }
            }
        }

        let mut gitignore = GitignoreBuilder::new(".");
        for entry in ignores {
            gitignore
                .add_line(None, entry)
                .map_err(|source| PackageError::InvalidIgnore {
                    pattern: entry.clone(),
                    source,
                })?;
        }

        Ok(Self {
            include: build(include, patterns)?,
            exclude: build(exclude, patterns)?,
            dot_segments: build(dot_segments, patterns)?,
            ignores: gitignore.build().map_err(|source| PackageError::InvalidIgnore {
                pattern: ignores.join(", "),
                source,
            })?,
        })
    }

    /// Returns true if `directory` is selected by the workspace patterns and
    /// not ignored.
    #[must_use]
    pub fn is_match(&self, directory: &str) -> bool {
        self.include.is_match(directory)
            && !self.has_hidden_segment(directory)
            && !self.exclude.is_match(directory)
            && !self.is_ignored(directory)
    }

    fn has_hidden_segment(&self, directory: &str) -> bool {
        directory
            .split('/')
            .any(|segment| segment.starts_with('.') && !self.dot_segments.is_match(segment))
    }

    /// Returns true if `directory` or one of its parents is ignored.
    #[must_use]
    pub fn is_ignored(&self, directory: &str) -> bool {
        self.ignores
            .matched_path_or_any_parents(Path::new(directory), true)
            .is_ignore()
    }

    /// Package directories in tree order.
    #[must_use]
    pub fn package_directories(&self, tree: &GitTree) -> Vec<String> {
        let manifests: HashSet<&str> = tree
            .tree
            .iter()
            .filter(|entry| entry.is_blob())
            .map(|entry| entry.path.as_str())
            .collect();

        tree.tree
            .iter()
            .filter(|entry| entry.is_tree())
            .map(|entry| entry.path.as_str())
            .filter(|directory| manifests.contains(format!("{directory}/{MANIFEST}").as_str()))
            .filter(|directory| self.is_match(directory))
            .map(str::to_string)
            .collect()
    }
}

/// Strips `./` prefixes and trailing slashes.
fn normalize(pattern: &str) -> &str {
    let mut pattern = pattern.trim();
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern.trim_end_matches('/')
}

fn compile(pattern: &str, original: &str) -> Result<Glob, PackageError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| PackageError::InvalidPattern {
            pattern: original.to_string(),
            source,
        })
}

fn build(builder: GlobSetBuilder, patterns: &[String]) -> Result<GlobSet, PackageError> {
    builder.build().map_err(|source| PackageError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::TreeEntry;

    fn tree(entries: &[(&str, &str)]) -> GitTree {
        GitTree {
            sha: "root".to_string(),
            tree: entries
                .iter()
                .map(|(path, kind)| TreeEntry {
                    path: (*path).to_string(),
                    kind: (*kind).to_string(),
                })
                .collect(),
            truncated: false,
        }
    }

    fn patterns(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn sample_tree() -> GitTree {
        tree(&[
            ("package.json", "blob"),
            ("packages", "tree"),
            ("packages/package1", "tree"),
            ("packages/package1/package.json", "blob"),
            ("packages/package1/src", "tree"),
            ("packages/package1/src/index.ts", "blob"),
            ("packages/package2", "tree"),
            ("packages/package2/package.json", "blob"),
            ("packages/docs", "tree"),
            ("packages/docs/README.md", "blob"),
            ("packages/nested", "tree"),
            ("packages/nested/deep", "tree"),
            ("packages/nested/deep/package.json", "blob"),
        ])
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let matcher = WorkspaceMatcher::new(&patterns(&["packages/*"]), &[]).unwrap();
        assert_eq!(
            matcher.package_directories(&sample_tree()),
            ["packages/package1", "packages/package2"]
        );
    }

    #[test]
    fn double_star_crosses_directories() {
        let matcher = WorkspaceMatcher::new(&patterns(&["packages/**"]), &[]).unwrap();
        assert_eq!(
            matcher.package_directories(&sample_tree()),
            [
                "packages/package1",
                "packages/package2",
                "packages/nested/deep"
            ]
        );
    }

    #[test]
    fn normalizes_patterns() {
        let matcher = WorkspaceMatcher::new(&patterns(&["./packages/*/"]), &[]).unwrap();
        assert!(matcher.is_match("packages/package1"));
        assert!(!matcher.is_match("apps/web"));
    }

    #[test]
    fn negated_patterns_exclude() {
        let matcher =
            WorkspaceMatcher::new(&patterns(&["packages/*", "!packages/package2"]), &[]).unwrap();
        assert_eq!(
            matcher.package_directories(&sample_tree()),
            ["packages/package1"]
        );
    }

    #[test]
    fn ignores_use_gitignore_rules() {
        let matcher = WorkspaceMatcher::new(
            &patterns(&["packages/**"]),
            &patterns(&["packages/package1", "nested"]),
        )
        .unwrap();

        assert!(matcher.is_ignored("packages/package1"));
        assert!(matcher.is_ignored("packages/nested/deep"));
        assert_eq!(
            matcher.package_directories(&sample_tree()),
            ["packages/package2"]
        );
    }

    #[test]
    fn wildcards_skip_dot_directories() {
        let matcher = WorkspaceMatcher::new(&patterns(&["packages/*", "tools/**"]), &[]).unwrap();
        assert!(!matcher.is_match("packages/.changeset"));
        assert!(!matcher.is_match("tools/.cache/plugin"));
        assert!(matcher.is_match("packages/package1"));

        let dotted = tree(&[
            ("packages", "tree"),
            ("packages/.changeset", "tree"),
            ("packages/.changeset/package.json", "blob"),
            ("packages/package1", "tree"),
            ("packages/package1/package.json", "blob"),
        ]);
        assert_eq!(matcher.package_directories(&dotted), ["packages/package1"]);
    }

    #[test]
    fn explicit_dot_segments_match() {
        let matcher =
            WorkspaceMatcher::new(&patterns(&[".config/*", "packages/.internal"]), &[]).unwrap();
        assert!(matcher.is_match(".config/eslint"));
        assert!(matcher.is_match("packages/.internal"));
        assert!(!matcher.is_match(".config/.hidden"));
    }

    #[test]
    fn nothing_matches_without_patterns() {
        let matcher = WorkspaceMatcher::new(&[], &[]).unwrap();
        assert!(matcher.package_directories(&sample_tree()).is_empty());
    }
}
