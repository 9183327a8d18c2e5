//! Slash-delimited tree paths.
//!
//! A single leading `/` is an optional root marker. The literal `/` and the
//! empty string both denote the root. `.` and `..` have no special meaning and
//! empty segments are kept as-is, so `a//b` looks up a child named `""`.

use std::fmt;

use itertools::Itertools;

/// Literal path of the root node.
pub const ROOT: &str = "/";

/// Segment separator.
pub const SEPARATOR: char = '/';

/// Case-fold a node name. Every lookup and insert goes through this.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// A parsed path borrowing its segments from the input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath<'a> {
    rooted: bool,
    segments: Vec<&'a str>,
}

impl<'a> TreePath<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() || raw == ROOT {
            return Self {
                rooted: raw == ROOT,
                segments: Vec::new(),
            };
        }
        let (rooted, body) = match raw.strip_prefix(SEPARATOR) {
            Some(body) => (true, body),
            None => (false, raw),
        };
        Self {
            rooted,
            segments: body.split(SEPARATOR).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Split off the last segment: `a/b/c` becomes (`a/b`, `c`).
    ///
    /// Returns `None` for the root, which has no parent.
    pub fn split_leaf(&self) -> Option<(TreePath<'a>, &'a str)> {
        let (&leaf, parent) = self.segments.split_last()?;
        Some((
            TreePath {
                rooted: self.rooted,
                segments: parent.to_vec(),
            },
            leaf,
        ))
    }

    /// Display form of the first `len` segments, keeping the root marker.
    pub fn prefix(&self, len: usize) -> String {
        let joined = self.segments.iter().take(len).join("/");
        if self.rooted {
            format!("/{joined}")
        } else {
            joined
        }
    }

    /// True when `other` denotes this node or one of its descendants.
    pub fn contains(&self, other: &TreePath<'_>) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| normalize_name(a) == normalize_name(b))
    }
}

impl fmt::Display for TreePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() && self.rooted {
            return f.write_str(ROOT);
        }
        f.write_str(&self.prefix(self.segments.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("/", &[])]
    #[case("a", &["a"])]
    #[case("/a/b", &["a", "b"])]
    #[case("a//b", &["a", "", "b"])]
    #[case("a/", &["a", ""])]
    fn given_raw_path_when_parsing_then_yields_segments(
        #[case] raw: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(TreePath::parse(raw).segments(), expected);
    }

    #[test]
    fn given_nested_path_when_splitting_leaf_then_returns_parent_and_name() {
        let path = TreePath::parse("/a/b/c");
        let (parent, leaf) = path.split_leaf().unwrap();
        assert_eq!(leaf, "c");
        assert_eq!(parent.to_string(), "/a/b");
    }

    #[test]
    fn given_top_level_path_when_splitting_leaf_then_parent_is_root() {
        let path = TreePath::parse("a");
        let (parent, leaf) = path.split_leaf().unwrap();
        assert_eq!(leaf, "a");
        assert!(parent.is_root());
    }

    #[test]
    fn given_root_when_splitting_leaf_then_none() {
        assert!(TreePath::parse("/").split_leaf().is_none());
    }

    #[test]
    fn given_prefix_length_when_formatting_then_keeps_root_marker() {
        let path = TreePath::parse("/a/b/c");
        assert_eq!(path.prefix(2), "/a/b");
        assert_eq!(TreePath::parse("a/b/c").prefix(2), "a/b");
    }

    #[rstest]
    #[case("/a", "/a", true)]
    #[case("/a", "/a/b", true)]
    #[case("/A", "a/b", true)]
    #[case("/a/b", "/a", false)]
    #[case("/ab", "/abc", false)]
    #[case("/a", "/x", false)]
    fn given_two_paths_when_checking_containment_then_compares_normalized_segments(
        #[case] outer: &str,
        #[case] inner: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            TreePath::parse(outer).contains(&TreePath::parse(inner)),
            expected
        );
    }

    #[test]
    fn given_mixed_case_when_normalizing_then_lowercases() {
        assert_eq!(normalize_name("Docs"), "docs");
    }
}
