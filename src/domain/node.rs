//! Tree node: a named container owning its children.

use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::path::{normalize_name, ROOT};

/// What to do when attaching a node whose name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the child already in place, discard the incoming subtree.
    #[default]
    KeepExisting,
    /// Replace the child in place with the incoming subtree.
    Overwrite,
    /// Leave the parent untouched and hand the incoming subtree back.
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep-existing" => Ok(Self::KeepExisting),
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown collision policy '{other}' (expected keep-existing, overwrite or reject)"
            )),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KeepExisting => "keep-existing",
            Self::Overwrite => "overwrite",
            Self::Reject => "reject",
        })
    }
}

/// Where an attached node ended up, without the borrowed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Inserted,
    KeptExisting,
    Replaced,
    Rejected,
}

impl Placement {
    pub fn is_collision(&self) -> bool {
        !matches!(self, Placement::Inserted)
    }
}

/// Result of [`Node::attach`].
#[derive(Debug)]
pub enum Attachment<'a> {
    /// Name was free.
    Inserted(&'a mut Node),
    /// Name was taken; the existing child stays and `discarded` is dropped by the caller.
    KeptExisting { node: &'a mut Node, discarded: Node },
    /// Name was taken; `previous` was swapped out.
    Replaced { node: &'a mut Node, previous: Node },
    /// Name was taken; nothing changed and `incoming` is returned.
    Rejected { existing: &'a mut Node, incoming: Node },
    /// Incoming node has an empty name and was not placed.
    Unnamed(Node),
}

impl<'a> Attachment<'a> {
    pub fn placement(&self) -> Placement {
        match self {
            Attachment::Inserted(_) => Placement::Inserted,
            Attachment::KeptExisting { .. } => Placement::KeptExisting,
            Attachment::Replaced { .. } => Placement::Replaced,
            Attachment::Rejected { .. } | Attachment::Unnamed(_) => Placement::Rejected,
        }
    }

    /// The child now living under the attached name, `None` for an unnamed node.
    pub fn into_node(self) -> Option<&'a mut Node> {
        match self {
            Attachment::Inserted(node)
            | Attachment::KeptExisting { node, .. }
            | Attachment::Replaced { node, .. }
            | Attachment::Rejected { existing: node, .. } => Some(node),
            Attachment::Unnamed(_) => None,
        }
    }
}

/// A named container holding uniquely named children.
///
/// Children are keyed by normalized name in an ordered map, so every
/// enumeration visits siblings in ascending name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    children: BTreeMap<String, Node>,
}

impl Node {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            children: BTreeMap::new(),
        }
    }

    /// The invisible root every tree hangs off.
    pub fn root() -> Self {
        Self {
            name: ROOT.to_string(),
            children: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_child(name).is_some()
    }

    /// Direct children in ascending name order.
    pub fn children(&self) -> btree_map::Values<'_, String, Node> {
        self.children.values()
    }

    /// Return the child called `name`, creating it if absent.
    ///
    /// Existing children are returned untouched. An empty name is never
    /// inserted and yields `None`.
    pub fn add(&mut self, name: &str) -> Option<&mut Node> {
        if name.is_empty() {
            return None;
        }
        Some(
            self.children
                .entry(normalize_name(name))
                .or_insert_with_key(|key| Node::new(key)),
        )
    }

    /// Insert a detached subtree, keeping an existing child on collision.
    pub fn adopt(&mut self, child: Node) -> Option<&mut Node> {
        self.attach(child, CollisionPolicy::KeepExisting).into_node()
    }

    /// Insert a detached subtree under its own name, resolving collisions by `policy`.
    #[instrument(level = "trace", skip(self, child), fields(parent = %self.name, child = %child.name))]
    pub fn attach(&mut self, child: Node, policy: CollisionPolicy) -> Attachment<'_> {
        if child.name.is_empty() {
            return Attachment::Unnamed(child);
        }
        match self.children.entry(child.name.clone()) {
            Entry::Vacant(slot) => Attachment::Inserted(slot.insert(child)),
            Entry::Occupied(slot) => match policy {
                CollisionPolicy::KeepExisting => Attachment::KeptExisting {
                    node: slot.into_mut(),
                    discarded: child,
                },
                CollisionPolicy::Overwrite => {
                    let node = slot.into_mut();
                    let previous = std::mem::replace(node, child);
                    Attachment::Replaced { node, previous }
                }
                CollisionPolicy::Reject => Attachment::Rejected {
                    existing: slot.into_mut(),
                    incoming: child,
                },
            },
        }
    }

    /// Remove and drop the child called `name` with its subtree.
    pub fn remove(&mut self, name: &str) -> bool {
        self.detach(name).is_some()
    }

    /// Remove the child called `name` and hand its subtree back.
    pub fn detach(&mut self, name: &str) -> Option<Node> {
        if name.is_empty() {
            return None;
        }
        self.children.remove(&normalize_name(name))
    }

    pub fn get_child(&self, name: &str) -> Option<&Node> {
        self.children.get(&normalize_name(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(&normalize_name(name))
    }

    /// Depth-first pre-order walk over all descendants, excluding `self`.
    ///
    /// Direct children have depth 0.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.values()],
        }
    }

    /// `(depth, name)` pairs in display order.
    pub fn list_descendants(&self) -> impl Iterator<Item = (usize, &str)> {
        self.descendants().map(|(depth, node)| (depth, node.name()))
    }

    /// Number of descendants, excluding `self`.
    pub fn subtree_size(&self) -> usize {
        self.descendants().count()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Iterator returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<btree_map::Values<'a, String, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            match self.stack.last_mut()?.next() {
                Some(node) => {
                    self.stack.push(node.children.values());
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::root();
        root.add("b");
        if let Some(a) = root.add("a") {
            a.add("z");
            if let Some(m) = a.add("m") {
                m.add("deep");
            }
        }
        root
    }

    #[test]
    fn given_existing_child_when_adding_again_then_returns_existing() {
        let mut root = Node::root();
        if let Some(a) = root.add("a") {
            a.add("inner");
        }
        let again = root.add("A").unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn given_tree_when_listing_descendants_then_pre_order_sorted() {
        let listed: Vec<_> = sample().list_descendants().map(|(d, n)| (d, n.to_string())).collect();
        assert_eq!(
            listed,
            vec![
                (0, "a".to_string()),
                (1, "m".to_string()),
                (2, "deep".to_string()),
                (1, "z".to_string()),
                (0, "b".to_string()),
            ]
        );
    }

    #[test]
    fn given_tree_when_listing_twice_then_restarts() {
        let root = sample();
        assert_eq!(root.descendants().count(), root.descendants().count());
        assert_eq!(root.subtree_size(), 5);
    }

    #[test]
    fn given_empty_name_when_attaching_then_handed_back_unplaced() {
        let mut root = sample();
        let attachment = root.attach(Node::new(""), CollisionPolicy::Overwrite);
        assert!(matches!(attachment, Attachment::Unnamed(_)));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn given_empty_name_when_removing_then_false() {
        let mut root = sample();
        assert!(!root.remove(""));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn given_collision_when_adopting_then_keeps_existing() {
        let mut root = sample();
        let mut incoming = Node::new("A");
        incoming.add("fresh");
        let kept = root.adopt(incoming).unwrap();
        assert!(kept.contains("m"));
        assert!(!kept.contains("fresh"));
    }

    #[test]
    fn given_collision_when_attaching_with_overwrite_then_replaces() {
        let mut root = sample();
        let mut incoming = Node::new("a");
        incoming.add("fresh");
        match root.attach(incoming, CollisionPolicy::Overwrite) {
            Attachment::Replaced { node, previous } => {
                assert!(node.contains("fresh"));
                assert!(previous.contains("m"));
            }
            other => panic!("expected Replaced, got {:?}", other.placement()),
        }
    }

    #[test]
    fn given_collision_when_attaching_with_reject_then_returns_incoming() {
        let mut root = sample();
        let incoming = Node::new("b");
        let attachment = root.attach(incoming, CollisionPolicy::Reject);
        assert_eq!(attachment.placement(), Placement::Rejected);
        assert!(matches!(attachment, Attachment::Rejected { incoming, .. } if incoming.name() == "b"));
    }

    #[test]
    fn given_policy_names_when_parsing_then_round_trips_display() {
        for policy in [
            CollisionPolicy::KeepExisting,
            CollisionPolicy::Overwrite,
            CollisionPolicy::Reject,
        ] {
            assert_eq!(policy.to_string().parse::<CollisionPolicy>(), Ok(policy));
        }
        assert!("merge".parse::<CollisionPolicy>().is_err());
    }
}
