//! Which node owns each byte of a window.
//!
//! Used to color a hex dump in step with the node selected in the tree. The
//! resolver walks down from a root, descending only into children whose
//! bytes overlap the window; deeper nodes overwrite their ancestors, so each
//! slot ends up owned by the deepest node covering it. The selection is laid
//! over the result afterwards by node identity.

use crate::core::node::{NodeId, NodeTree};
use crate::core::segment::{Extent, Space};
use crate::error::Result;
use tracing::debug;

/// How one byte of the window should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// No node covers the byte.
    None,
    /// Covered by this node, unrelated to the selection.
    Owned(NodeId),
    /// Covered by the selected node's parent, outside the selected node.
    SelectedParent,
    /// Covered by the selected node or one of its descendants.
    Selected,
}

/// Per-byte ownership of `[offset, offset + len)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    offset: u64,
    owners: Vec<Option<NodeId>>,
    highlights: Vec<Highlight>,
}

impl Coverage {
    /// Absolute offset of the first slot.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Deepest covering node per slot.
    pub fn owners(&self) -> &[Option<NodeId>] {
        &self.owners
    }

    /// Display class per slot.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Owner of the byte at absolute offset `at`, if inside the window.
    pub fn owner_at(&self, at: u64) -> Option<NodeId> {
        let index = usize::try_from(at.checked_sub(self.offset)?).ok()?;
        self.owners.get(index).copied().flatten()
    }
}

/// Resolves the window `[offset, offset + length)` against the subtree at
/// `root`. Offsets are absolute; `root` need not be the top of its tree.
/// A top node with no segments owns every slot of the window.
pub fn resolve(
    tree: &NodeTree,
    root: NodeId,
    offset: u64,
    length: usize,
    selected: Option<NodeId>,
) -> Result<Coverage> {
    let end = offset.saturating_add(length as u64);
    let mut owners = vec![None; length];

    let root_node = tree.node(root)?;
    if root_node.parent().is_none() && root_node.segments().is_empty() {
        // A top node without segments stands for the whole resource.
        owners.fill(Some(root));
    } else {
        for extent in tree.absolute_extents(root)? {
            claim(&mut owners, offset, end, extent, root);
        }
    }
    descend(tree, root, &tree.space(root)?, offset, end, &mut owners)?;

    let selected_parent = selected.and_then(|s| tree.parent(s));
    let within = |target: Option<NodeId>, owner: NodeId| {
        target.is_some_and(|t| t == owner || tree.is_ancestor(t, owner))
    };
    let highlights = owners
        .iter()
        .map(|owner| match *owner {
            None => Highlight::None,
            Some(o) if within(selected, o) => Highlight::Selected,
            Some(o) if within(selected_parent, o) => Highlight::SelectedParent,
            Some(o) => Highlight::Owned(o),
        })
        .collect();

    debug!(root = %root, offset, length, "Resolved coverage");
    Ok(Coverage {
        offset,
        owners,
        highlights,
    })
}

fn descend(
    tree: &NodeTree,
    node: NodeId,
    space: &Space,
    offset: u64,
    end: u64,
    owners: &mut [Option<NodeId>],
) -> Result<()> {
    for child in tree.children(node) {
        let child_space = space.child(tree.node(child)?.segments());
        let mut touched = false;
        for extent in child_space.extents() {
            touched |= claim(owners, offset, end, *extent, child);
        }
        if touched {
            descend(tree, child, &child_space, offset, end, owners)?;
        }
    }
    Ok(())
}

// Marks the part of `extent` inside the window; false if there is none.
fn claim(
    owners: &mut [Option<NodeId>],
    offset: u64,
    end: u64,
    extent: Extent,
    owner: NodeId,
) -> bool {
    let Some(clipped) = extent.clip(offset, end) else {
        return false;
    };
    let from = (clipped.start - offset) as usize;
    let to = (clipped.end() - offset) as usize;
    owners[from..to].fill(Some(owner));
    true
}
