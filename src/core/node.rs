//! The structural description tree.
//!
//! Nodes live in a [`NodeTree`] arena and refer to each other by
//! [`NodeId`]. Parent, child and sibling links are plain ids, so every
//! direction of navigation is O(1) and no ownership cycles exist. A builder
//! inserts nodes (detached), then wires them with [`NodeTree::add_child`];
//! insertion order is free, sibling order is the order of `add_child` calls.

use crate::core::segment::{Extent, Segment, Space};
use crate::error::{BinviewError, Result};
use crate::interpret::Interpretation;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Stable handle to a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named, possibly multi-segment region.
#[derive(Debug, Clone)]
pub struct Node {
    description: String,
    segments: Vec<Segment>,
    interpretation: Option<Rc<Interpretation>>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    pub fn new(
        description: impl Into<String>,
        segments: Vec<Segment>,
        interpretation: Option<Rc<Interpretation>>,
    ) -> Self {
        Self {
            description: description.into(),
            segments,
            interpretation,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }

    /// A node covering one contiguous range of its parent.
    pub fn contiguous(description: impl Into<String>, offset: u64, length: u64) -> Self {
        Self::new(description, vec![Segment::new(offset, length)], None)
    }

    /// A node with no bytes of its own.
    pub fn empty(description: impl Into<String>) -> Self {
        Self::new(description, Vec::new(), None)
    }

    pub fn with_interpretation(mut self, interpretation: impl Into<Rc<Interpretation>>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn interpretation(&self) -> Option<&Rc<Interpretation>> {
        self.interpretation.as_ref()
    }

    /// Total bytes across all segments.
    pub fn byte_len(&self) -> u64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    fn unlink(&mut self) {
        self.parent = None;
        self.next_sibling = None;
        self.prev_sibling = None;
    }
}

/// Arena owning every node of one description.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    // Freed slots stay None so stale ids never alias a new node.
    nodes: Vec<Option<Node>>,
    live: usize,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Adds a detached node. Any links the node carried are cleared.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.unlink();
        node.first_child = None;
        node.last_child = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        self.live += 1;
        id
    }

    /// Inserts `node` and appends it under `parent`.
    pub fn append(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.insert(node);
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Appends `child` to the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, if `child` already has a parent, or if
    /// `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        if let Some(existing) = self.node(child)?.parent {
            return Err(BinviewError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(BinviewError::WouldCycle { parent, child });
        }

        let previous = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.prev_sibling = previous;
        }
        match previous {
            Some(prev) => self.node_mut(prev)?.next_sibling = Some(child),
            None => self.node_mut(parent)?.first_child = Some(child),
        }
        self.node_mut(parent)?.last_child = Some(child);
        Ok(())
    }

    /// Detaches `id` from its parent and frees it with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        match prev {
            Some(prev) => self.node_mut(prev)?.next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent)?.first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.node_mut(next)?.prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent)?.last_child = prev;
                }
            }
        }

        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut child = self.first_child(id);
        while let Some(current) = child {
            child = self.next_sibling(current);
            self.free_subtree(current);
        }
        if let Some(slot) = self.nodes.get_mut(id.0) {
            if slot.take().is_some() {
                self.live -= 1;
                trace!(node = %id, "Freed node");
            }
        }
    }

    /// Replaces a node's interpretation. Lets a builder point a node at
    /// nodes that were created after it.
    pub fn set_interpretation(
        &mut self,
        id: NodeId,
        interpretation: Option<Rc<Interpretation>>,
    ) -> Result<()> {
        self.node_mut(id)?.interpretation = interpretation;
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Like [`get`](Self::get) but fails with `UnknownNode`.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(BinviewError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BinviewError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::last_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::prev_sibling)
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// `id` and everything below it, parents before children.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: if self.contains(id) { vec![id] } else { Vec::new() },
        }
    }

    /// Parent, grandparent, ... up to the top of the tree.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// The topmost ancestor of `id` (itself when detached).
    pub fn top(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// True if `ancestor` lies strictly above `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Number of edges between `id` and the top of its tree.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// The coordinate space of `id`, derived from the top of its tree.
    ///
    /// The topmost node's space is the resource itself; every other node's
    /// space is its segments mapped through its parent's space.
    pub fn space(&self, id: NodeId) -> Result<Space> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(Space::identity()),
            Some(parent) => Ok(self.space(parent)?.child(&node.segments)),
        }
    }

    /// Absolute pieces of the resource that `id` covers.
    pub fn absolute_extents(&self, id: NodeId) -> Result<Vec<Extent>> {
        let node = self.node(id)?;
        match node.parent {
            // The top node's segments are already absolute.
            None => Ok(node
                .segments
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| Extent::new(s.offset, s.length))
                .collect()),
            Some(_) => Ok(self.space(id)?.extents().to_vec()),
        }
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        let mut child = self.tree.last_child(current);
        while let Some(c) = child {
            self.stack.push(c);
            child = self.tree.prev_sibling(c);
        }
        Some(current)
    }
}
