//! Error types for the binview engine.
//!
//! Byte access failures come from [`crate::io::error::IoError`] and are
//! wrapped unchanged; everything else concerns the shape of the node tree,
//! its binding to data, or the construction of interpretations.

use crate::core::node::NodeId;
use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for binview operations.
#[derive(Debug, Error)]
pub enum BinviewError {
    /// Byte access errors (bounds, exhaustion, file I/O)
    #[error(transparent)]
    Io(#[from] IoError),

    /// The id does not name a live node
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// `add_child` on a node that already has a parent
    #[error("Node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    /// `add_child` that would make a node its own ancestor
    #[error("Attaching {child} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    /// A node was referenced without a bound data node
    #[error("Node {0} has no bound data; build the data tree over a root that contains it")]
    UnboundNode(NodeId),

    /// Cross references nested deeper than the configured limit
    #[error("Reference depth limit of {limit} exceeded")]
    ReferenceDepth { limit: usize },

    /// Malformed AdvancedNode template
    #[error("Invalid template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Flag groups that cannot be decoded
    #[error("Invalid flag groups: {0}")]
    InvalidFlags(String),

    /// Configuration parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for binview operations
pub type Result<T> = std::result::Result<T, BinviewError>;
