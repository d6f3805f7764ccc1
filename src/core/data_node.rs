//! Binding of a node tree to concrete bytes.
//!
//! [`DataTree::build`] walks a subtree top-down and gives every node a
//! [`ByteSource`] scoped to its own bytes, carved out of its parent's source.
//! The data tree borrows the node tree, so the node tree cannot change while
//! a binding over it is alive; rebuild after editing.

use crate::config::IoConfig;
use crate::core::node::{NodeId, NodeTree};
use crate::core::segment::Segment;
use crate::error::{BinviewError, Result};
use crate::interpret::FormatContext;
use crate::io::{ByteCursor, ByteSource, DEFAULT_BUFFER_SIZE};
use std::collections::HashMap;
use tracing::{debug, trace};

/// The bytes bound to one node.
#[derive(Debug, Clone)]
pub struct DataNode {
    node: NodeId,
    source: ByteSource,
    children: Vec<NodeId>,
}

impl DataNode {
    /// The node this binding belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's bytes, in its own coordinate space.
    pub fn source(&self) -> &ByteSource {
        &self.source
    }

    /// Bound children, in sibling order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Per-node byte sources for one subtree of a [`NodeTree`].
#[derive(Debug)]
pub struct DataTree<'t> {
    tree: &'t NodeTree,
    root: NodeId,
    bindings: HashMap<NodeId, DataNode>,
    buffer_size: usize,
}

impl<'t> DataTree<'t> {
    /// Binds `root` to `source` and every node below it to a slice of its
    /// parent's bytes.
    ///
    /// # Errors
    ///
    /// Fails if a segment does not fit inside its parent's bytes, or if an
    /// interpretation in the subtree refers to a node outside it.
    pub fn build(tree: &'t NodeTree, root: NodeId, source: ByteSource) -> Result<Self> {
        Self::build_with_config(tree, root, source, &IoConfig::default())
    }

    pub fn build_with_config(
        tree: &'t NodeTree,
        root: NodeId,
        source: ByteSource,
        config: &IoConfig,
    ) -> Result<Self> {
        let span = crate::span_trace!("bind_data_tree", root = %root);
        let _guard = span.enter();

        tree.node(root)?;
        let mut bindings = HashMap::new();
        let mut pending = vec![(root, source)];
        while let Some((id, source)) = pending.pop() {
            let children: Vec<NodeId> = tree.children(id).collect();
            for &child in children.iter().rev() {
                let child_source = source_for_segments(&source, tree.node(child)?.segments())
                    .map_err(|e| crate::log_error!(e, "Segment does not fit its parent"))?;
                pending.push((child, child_source));
            }
            trace!(node = %id, kind = ?source.kind(), "Bound node");
            bindings.insert(
                id,
                DataNode {
                    node: id,
                    source,
                    children,
                },
            );
        }

        let data = Self {
            tree,
            root,
            bindings,
            buffer_size: config.file_buffer_size.max(1),
        };
        data.check_references()?;

        debug!(root = %root, nodes = data.bindings.len(), "Data tree built");
        Ok(data)
    }

    // Cross-node interpretations must point inside the bound subtree.
    fn check_references(&self) -> Result<()> {
        for id in self.tree.descendants(self.root) {
            let Some(interpretation) = self.tree.node(id)?.interpretation() else {
                continue;
            };
            for target in interpretation.references() {
                if !self.bindings.contains_key(&target) {
                    return Err(crate::log_error!(
                        BinviewError::UnboundNode(target),
                        "Interpretation refers outside the bound tree"
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn tree(&self) -> &'t NodeTree {
        self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of bound nodes.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&DataNode> {
        self.bindings.get(&id)
    }

    /// Like [`get`](Self::get) but fails with `UnboundNode`.
    pub fn data_node(&self, id: NodeId) -> Result<&DataNode> {
        self.get(id).ok_or(BinviewError::UnboundNode(id))
    }

    pub fn source(&self, id: NodeId) -> Result<&ByteSource> {
        Ok(&self.data_node(id)?.source)
    }

    /// A fresh cursor over the bytes of `id`.
    pub fn cursor(&self, id: NodeId) -> Result<ByteCursor> {
        Ok(self.source(id)?.cursor_with_buffer(self.buffer_size)?)
    }

    /// Formats `id` with its own interpretation. `None` when the node has
    /// no interpretation.
    pub fn format(&self, id: NodeId, ctx: &FormatContext<'_>) -> Result<Option<String>> {
        self.format_in(id, &ctx.with_data(self))
    }

    pub(crate) fn format_in(&self, id: NodeId, ctx: &FormatContext<'_>) -> Result<Option<String>> {
        let Some(interpretation) = self.tree.node(id)?.interpretation() else {
            return Ok(None);
        };
        let mut cursor = self.cursor(id)?;
        interpretation.format(&mut cursor, ctx).map(Some)
    }
}

/// The bytes of a node with `segments`, given its parent's bytes.
pub fn source_for_segments(parent: &ByteSource, segments: &[Segment]) -> Result<ByteSource> {
    match segments {
        [] => Ok(ByteSource::empty()),
        [single] => Ok(parent.subset(single.offset, single.length)?),
        many => {
            let parts = many
                .iter()
                .map(|s| parent.subset(s.offset, s.length))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ByteSource::aggregate(parts))
        }
    }
}
