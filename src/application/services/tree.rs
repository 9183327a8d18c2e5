//! Directory tree service
//!
//! Owns the root node and exposes path-based create/delete/move/list on top of
//! a single resolution primitive.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::{debug, instrument, warn};

use crate::domain::{
    Attachment, CollisionPolicy, DomainError, DomainResult, Node, Placement, TreePath,
};

/// Order of the two phases of a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveStrategy {
    /// Resolve and validate the target before detaching the source.
    /// A failed move leaves the tree unchanged.
    #[default]
    ResolveTargetFirst,
    /// Detach the source, then resolve the target. If the target is missing
    /// the detached subtree is dropped.
    DetachFirst,
}

impl FromStr for MoveStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resolve-target-first" => Ok(Self::ResolveTargetFirst),
            "detach-first" => Ok(Self::DetachFirst),
            other => Err(format!(
                "unknown move strategy '{other}' (expected resolve-target-first or detach-first)"
            )),
        }
    }
}

impl fmt::Display for MoveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolveTargetFirst => "resolve-target-first",
            Self::DetachFirst => "detach-first",
        })
    }
}

/// How `list` draws the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyle {
    /// One name per line, indented per depth level.
    #[default]
    Indent,
    /// Box-drawing branches.
    Tree,
}

impl FromStr for ListStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indent" => Ok(Self::Indent),
            "tree" => Ok(Self::Tree),
            other => Err(format!("unknown list style '{other}' (expected indent or tree)")),
        }
    }
}

impl fmt::Display for ListStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Indent => "indent",
            Self::Tree => "tree",
        })
    }
}

/// Spaces per depth level in [`ListStyle::Indent`] listings.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Behavior knobs fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    pub collision: CollisionPolicy,
    pub move_strategy: MoveStrategy,
    pub list_style: ListStyle,
    pub indent_width: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::default(),
            move_strategy: MoveStrategy::default(),
            list_style: ListStyle::default(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Outcome of a successful move.
#[derive(Debug)]
pub struct Relocation<'a> {
    /// How the moved subtree was placed under the target.
    pub placement: Placement,
    /// The child now living under the moved name in the target.
    pub node: &'a Node,
}

/// Service owning one directory tree.
#[derive(Debug)]
pub struct TreeService {
    root: Node,
    options: TreeOptions,
}

impl Default for TreeService {
    fn default() -> Self {
        Self::with_options(TreeOptions::default())
    }
}

impl TreeService {
    /// Create an empty tree with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            root: Node::root(),
            options,
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk `path` from the root.
    ///
    /// Fails at the first missing segment, reporting the prefix up to and
    /// including it. `/` and the empty path resolve to the root.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, path: &str) -> DomainResult<&Node> {
        self.lookup(&TreePath::parse(path))
    }

    fn lookup(&self, path: &TreePath<'_>) -> DomainResult<&Node> {
        let mut current = &self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = current
                .get_child(segment)
                .ok_or_else(|| DomainError::not_found(path.prefix(depth + 1)))?;
        }
        Ok(current)
    }

    fn lookup_mut(&mut self, path: &TreePath<'_>) -> DomainResult<&mut Node> {
        let mut current = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = current
                .child_mut(segment)
                .ok_or_else(|| DomainError::not_found(path.prefix(depth + 1)))?;
        }
        Ok(current)
    }

    /// Create the last segment of `path` under its (existing) parent.
    ///
    /// Creating a name that already exists returns the existing node.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, path: &str) -> DomainResult<&Node> {
        let parsed = TreePath::parse(path);
        let Some((parent_path, leaf)) = parsed.split_leaf() else {
            return Ok(&self.root);
        };
        let parent = self.lookup_mut(&parent_path)?;
        debug!(parent = %parent.name(), leaf, "create");
        match parent.add(leaf) {
            Some(node) => Ok(&*node),
            None => Err(DomainError::not_found(parsed.to_string())),
        }
    }

    /// Remove the node at `path` with its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, path: &str) -> DomainResult<()> {
        let removed = self.detach(path)?;
        debug!(removed = %removed.name(), descendants = removed.subtree_size(), "delete");
        Ok(())
    }

    fn detach(&mut self, path: &str) -> DomainResult<Node> {
        let parsed = TreePath::parse(path);
        let Some((parent_path, leaf)) = parsed.split_leaf() else {
            return Err(DomainError::cannot_delete(path, DomainError::not_found(path)));
        };
        let parent = self
            .lookup_mut(&parent_path)
            .map_err(|err| DomainError::cannot_delete(path, err))?;
        parent.detach(leaf).ok_or_else(|| {
            DomainError::cannot_delete(path, DomainError::not_found(parsed.to_string()))
        })
    }

    /// Move the subtree at `source` under `target`.
    ///
    /// Returns the node now living under the moved name in the target. On a
    /// name collision that is the target's child, which under
    /// [`CollisionPolicy::Reject`] means the move was refused and `source` is
    /// still in place. Use [`TreeService::relocate`] to tell the cases apart.
    pub fn move_node(&mut self, source: &str, target: &str) -> DomainResult<&Node> {
        self.relocate(source, target).map(|relocation| relocation.node)
    }

    /// Move the subtree at `source` under `target`, reporting collisions.
    #[instrument(level = "debug", skip(self))]
    pub fn relocate(&mut self, source: &str, target: &str) -> DomainResult<Relocation<'_>> {
        let source_path = TreePath::parse(source);
        let target_path = TreePath::parse(target);
        if source_path.is_root() {
            return Err(DomainError::root_source(source));
        }
        self.lookup(&source_path)?;

        if self.options.move_strategy == MoveStrategy::ResolveTargetFirst {
            self.lookup(&target_path)?;
            if source_path.contains(&target_path) {
                return Err(DomainError::inside_source(source, target));
            }
        }

        let node = self.detach(source)?;
        let name = node.name().to_string();
        let policy = self.options.collision;

        let (placement, rejected) = {
            let parent = match self.lookup_mut(&target_path) {
                Ok(parent) => parent,
                Err(err) => {
                    warn!(
                        source,
                        nodes = node.subtree_size() + 1,
                        "move target missing after detach, subtree dropped"
                    );
                    return Err(err);
                }
            };
            let attachment = parent.attach(node, policy);
            let placement = attachment.placement();
            match attachment {
                Attachment::Rejected { incoming, .. } | Attachment::Unnamed(incoming) => {
                    (placement, Some(incoming))
                }
                Attachment::KeptExisting { discarded, .. } => {
                    debug!(name = %discarded.name(), "name taken in target, moved subtree discarded");
                    (placement, None)
                }
                Attachment::Replaced { previous, .. } => {
                    debug!(name = %previous.name(), "name taken in target, previous subtree replaced");
                    (placement, None)
                }
                Attachment::Inserted(_) => (placement, None),
            }
        };

        if let Some(incoming) = rejected {
            debug!(name = %incoming.name(), "name taken in target, restoring source");
            self.restore(&source_path, incoming)?;
        }

        let node = self
            .lookup(&target_path)?
            .get_child(&name)
            .ok_or_else(|| DomainError::not_found(format!("{target_path}/{name}")))?;
        Ok(Relocation { placement, node })
    }

    fn restore(&mut self, origin: &TreePath<'_>, node: Node) -> DomainResult<()> {
        if let Some((parent_path, _)) = origin.split_leaf() {
            self.lookup_mut(&parent_path)?.adopt(node);
        }
        Ok(())
    }

    /// Print the whole tree to stdout.
    pub fn list(&self) {
        print!("{}", self.render());
    }

    /// Write the listing to `out`.
    pub fn write_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }

    /// The listing in the configured style, one node per line.
    pub fn render(&self) -> String {
        match self.options.list_style {
            ListStyle::Indent => self.render_indented(),
            ListStyle::Tree => self.render_tree(),
        }
    }

    fn render_indented(&self) -> String {
        let mut out = String::new();
        for (depth, name) in self.root.list_descendants() {
            out.push_str(&" ".repeat(depth * self.options.indent_width));
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    fn render_tree(&self) -> String {
        fn branch(node: &Node) -> Tree<String> {
            Tree::new(node.name().to_string()).with_leaves(node.children().map(branch))
        }

        self.root
            .children()
            .map(|child| branch(child).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_create_when_resolving_then_found() {
        let mut tree = TreeService::new();
        tree.create("a").unwrap();
        tree.create("a/b").unwrap();
        assert_eq!(tree.resolve("a/b").unwrap().name(), "b");
        assert_eq!(tree.resolve("/a/b").unwrap().name(), "b");
    }

    #[test]
    fn given_root_path_when_resolving_then_returns_root() {
        let tree = TreeService::new();
        assert_eq!(tree.resolve("/").unwrap().name(), "/");
        assert_eq!(tree.resolve("").unwrap().name(), "/");
    }

    #[test]
    fn given_tree_style_when_rendering_then_draws_branches() {
        let mut tree = TreeService::with_options(TreeOptions {
            list_style: ListStyle::Tree,
            ..TreeOptions::default()
        });
        tree.create("a").unwrap();
        tree.create("a/b").unwrap();
        let rendered = tree.render();
        assert!(rendered.starts_with("a\n"));
        assert!(rendered.contains("b"));
        assert!(rendered.contains("└"));
    }

    #[test]
    fn given_wider_indent_when_rendering_then_uses_width() {
        let mut tree = TreeService::with_options(TreeOptions {
            indent_width: 4,
            ..TreeOptions::default()
        });
        tree.create("a").unwrap();
        tree.create("a/b").unwrap();
        assert_eq!(tree.render(), "a\n    b\n");
    }
}
