//! Owned, mutable scene graph: a forest of typed nodes keyed by stable string ids.
//!
//! Invariants maintained here:
//! - ids are unique across the whole graph
//! - the parent/child relation is a forest; a node's `parent` pointer and its parent's
//!   `children` list always agree
//! - child lists are ordered; order is meaningful (paint layering for same-position elements)
//! - containment follows the schema registry's table
//!
//! Mutations reject invalid input and leave the graph unchanged; no partial application.

use rustc_hash::FxBuildHasher;

use crate::error::{Error, Result};
use crate::node::{Node, NodeKind, NodePatch};
use crate::schema::SchemaRegistry;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Upper bound on tree depth for rootward walks. The graph is acyclic by construction, so this
/// can only trip on a violated invariant; the walk asserts and stops rather than looping.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    registry: SchemaRegistry,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    roots: Vec<String>,
}

impl SceneGraph {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
            index: HashMap::default(),
            roots: Vec::new(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// O(1) lookup. Absent ids are not an error at read time.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx])
    }

    /// Root ids in insertion order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Inserts a root node. Only root-capable kinds (sites) are accepted.
    pub fn insert_root(&mut self, mut node: Node) -> Result<String> {
        if !self.registry.can_root(node.kind()) {
            return Err(Error::SchemaViolation {
                kind: node.kind(),
                message: format!("a {} cannot be a root node", node.kind()),
            });
        }
        if self.contains(&node.id) {
            return Err(Error::DuplicateId {
                id: node.id.clone(),
            });
        }
        self.registry.fill_defaults(&mut node);
        self.registry.validate(&node)?;
        node.parent = None;
        let id = node.id.clone();
        self.push_node(node);
        self.roots.push(id.clone());
        Ok(id)
    }

    /// Inserts `node` as the last child of `parent_id`, preserving sibling order.
    pub fn insert(&mut self, parent_id: &str, mut node: Node) -> Result<String> {
        let Some(parent) = self.get(parent_id) else {
            return Err(Error::NotFound {
                id: parent_id.to_string(),
            });
        };
        let parent_kind = parent.kind();
        if !self.registry.can_contain(parent_kind, node.kind()) {
            return Err(Error::ChildNotAllowed {
                parent: parent_kind,
                child: node.kind(),
            });
        }
        if self.contains(&node.id) {
            return Err(Error::DuplicateId {
                id: node.id.clone(),
            });
        }
        self.registry.fill_defaults(&mut node);
        self.registry.validate(&node)?;

        node.parent = Some(parent_id.to_string());
        let id = node.id.clone();
        self.push_node(node);
        if let Some(parent) = self.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        Ok(id)
    }

    /// Applies a partial attribute patch. A `spec` replacement must keep the node's kind.
    pub fn update(&mut self, id: &str, patch: &NodePatch) -> Result<()> {
        let Some(node) = self.get(id) else {
            return Err(Error::NotFound { id: id.to_string() });
        };

        let mut next = node.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(position) = patch.position {
            next.position = position;
        }
        if let Some(rotation) = patch.rotation {
            next.rotation = rotation;
        }
        if let Some(visible) = patch.visible {
            next.visible = visible;
        }
        if let Some(opacity) = patch.opacity {
            next.opacity = opacity;
        }
        if let Some(spec) = &patch.spec {
            if spec.kind() != next.kind() {
                return Err(Error::SchemaViolation {
                    kind: next.kind(),
                    message: format!(
                        "patch cannot change node kind from {} to {}",
                        next.kind(),
                        spec.kind()
                    ),
                });
            }
            next.spec = spec.clone();
        }
        if let Some(meta) = &patch.meta {
            next.meta = meta.clone();
        }
        self.registry.validate(&next)?;

        if let Some(node) = self.get_mut(id) {
            *node = next;
        }
        Ok(())
    }

    /// Writes derived attributes computed by the processor pipeline. Returns false for absent
    /// ids (a processor may race a deletion within the same mutation cycle).
    pub fn set_derived(&mut self, id: &str, derived: crate::node::Derived) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.derived = derived;
                true
            }
            None => false,
        }
    }

    /// Moves `id` under `new_parent_id` at the given child index (clamped to the list length).
    pub fn reparent(&mut self, id: &str, new_parent_id: &str, index: usize) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NotFound { id: id.to_string() });
        }
        let Some(new_parent) = self.get(new_parent_id) else {
            return Err(Error::NotFound {
                id: new_parent_id.to_string(),
            });
        };

        // A node cannot move under itself or any of its descendants.
        if id == new_parent_id || self.ancestors(new_parent_id).any(|a| a.id == id) {
            return Err(Error::Cycle {
                id: id.to_string(),
                new_parent: new_parent_id.to_string(),
            });
        }

        let parent_kind = new_parent.kind();
        let child_kind = self.get(id).map(|n| n.kind());
        let Some(child_kind) = child_kind else {
            return Err(Error::NotFound { id: id.to_string() });
        };
        if !self.registry.can_contain(parent_kind, child_kind) {
            return Err(Error::ChildNotAllowed {
                parent: parent_kind,
                child: child_kind,
            });
        }

        self.detach(id);
        if let Some(parent) = self.get_mut(new_parent_id) {
            let at = index.min(parent.children.len());
            parent.children.insert(at, id.to_string());
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = Some(new_parent_id.to_string());
        }
        Ok(())
    }

    /// Removes `id` and all descendants transitively. Deleting an absent id is a no-op (not an
    /// error) to simplify bulk and undo operations. Returns the removed ids in preorder.
    pub fn delete(&mut self, id: &str) -> Vec<String> {
        if !self.contains(id) {
            return Vec::new();
        }
        let removed = self.descendants(id);
        self.detach(id);
        self.roots.retain(|r| r != id);
        for rid in &removed {
            self.remove_entry(rid);
        }
        removed
    }

    /// Lazy rootward walk starting at `id`'s parent. Finite (stops at a rootless node, bounded
    /// by `MAX_DEPTH`) and restartable: each call re-walks from current graph state.
    pub fn ancestors<'a>(&'a self, id: &str) -> Ancestors<'a> {
        let next = self.get(id).and_then(|n| n.parent.as_deref());
        Ancestors {
            graph: self,
            next,
            depth: 0,
        }
    }

    /// Ordered child ids; empty for absent ids and leaves.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Sibling ids (children of `id`'s parent, excluding `id`). Roots have no siblings.
    pub fn siblings_of(&self, id: &str) -> Vec<&str> {
        let Some(parent) = self.get(id).and_then(|n| n.parent.as_deref()) else {
            return Vec::new();
        };
        self.children_of(parent)
            .iter()
            .filter(|c| c.as_str() != id)
            .map(|c| c.as_str())
            .collect()
    }

    /// `id` plus all descendants, preorder. Empty for absent ids.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.get(&cur) else {
                continue;
            };
            out.push(cur);
            for child in node.children.iter().rev() {
                stack.push(child.clone());
            }
        }
        out
    }

    /// All nodes of a kind, in storage order (perturbed by removals; use
    /// `nodes_of_kind_under` for tree order).
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind() == kind).collect()
    }

    /// Nodes of a kind within the subtree rooted at `root_id` (e.g. all zones on a level).
    pub fn nodes_of_kind_under(&self, root_id: &str, kind: NodeKind) -> Vec<&Node> {
        self.descendants(root_id)
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|n| n.kind() == kind)
            .collect()
    }

    fn push_node(&mut self, node: Node) {
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
    }

    fn remove_entry(&mut self, id: &str) {
        let Some(idx) = self.index.remove(id) else {
            return;
        };
        // O(1): only the node swapped into the vacated slot needs its index entry fixed up.
        self.nodes.swap_remove(idx);
        if idx < self.nodes.len() {
            let moved = self.nodes[idx].id.clone();
            self.index.insert(moved, idx);
        }
    }

    fn detach(&mut self, id: &str) {
        let parent = self.get(id).and_then(|n| n.parent.clone());
        if let Some(parent_id) = parent {
            if let Some(parent) = self.get_mut(&parent_id) {
                parent.children.retain(|c| c != id);
            }
            if let Some(node) = self.get_mut(id) {
                node.parent = None;
            }
        }
    }
}

pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<&'a str>,
    depth: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        if self.depth >= MAX_DEPTH {
            debug_assert!(false, "ancestor chain exceeds MAX_DEPTH; cycle invariant violated");
            self.next = None;
            return None;
        }
        self.depth += 1;
        let node = self.graph.get(id)?;
        self.next = node.parent.as_deref();
        Some(node)
    }
}
