//! Engine for a structured binary viewer.
//!
//! A [`NodeTree`] describes how a file breaks down into nested regions,
//! each with a description and an optional [`Interpretation`]. Binding the
//! tree to a [`ByteSource`] yields a [`DataTree`] whose nodes can be
//! formatted, and [`coverage::resolve`] maps a window of bytes back onto
//! the nodes that own them.

pub mod config;
pub mod core;
pub mod coverage;
pub mod error;
pub mod interpret;
pub mod io;
pub mod logging;

pub use crate::config::ViewerConfig;
pub use crate::core::{DataNode, DataTree, Node, NodeId, NodeTree, Segment};
pub use crate::coverage::{Coverage, Highlight};
pub use crate::error::{BinviewError, Result};
pub use crate::interpret::{FormatContext, Interpretation, Locale};
pub use crate::io::{ByteCursor, ByteSource};
