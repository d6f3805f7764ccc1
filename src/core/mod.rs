//! Core data types for binview.
//!
//! Segments place bytes, nodes arrange segments into a tree, and data nodes
//! bind that tree to a concrete byte source.

pub mod data_node;
pub mod node;
pub mod segment;

pub use data_node::{DataNode, DataTree};
pub use node::{Children, Descendants, Node, NodeId, NodeTree};
pub use segment::{Extent, Segment, Space};
