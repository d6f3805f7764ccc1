//! Turning node bytes into display strings.
//!
//! An [`Interpretation`] is an immutable formatter. [`Interpretation::format`]
//! consumes a [`ByteCursor`] over a node's bytes and returns the text shown
//! next to the node's description. Cross-node variants (`Node`,
//! `AdvancedNode`, `Conditional`) read other nodes through the
//! [`DataTree`] carried by the [`FormatContext`].
//!
//! Formatting is stateless and never cached; values are re-read whenever
//! they are displayed.

pub mod flags;
pub mod int;
pub mod msdos;
pub mod template;
pub mod text;

pub use crate::interpret::flags::{FlagGroup, FlagGroups, FlagLabels};
pub use crate::interpret::int::{Endianness, EnumTable, IntFormat};
pub use crate::interpret::template::Template;

use crate::config::FormatConfig;
use crate::core::data_node::DataTree;
use crate::core::node::NodeId;
use crate::error::{BinviewError, Result};
use crate::io::ByteCursor;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Locale tag threaded through every format call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
}

/// Everything a format call may consult besides its own bytes.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    locale: Locale,
    max_depth: usize,
    depth: usize,
    data: Option<&'a DataTree<'a>>,
}

impl<'a> FormatContext<'a> {
    /// A context without bindings. Cross-node interpretations fail under it.
    pub fn new(locale: Locale) -> Self {
        Self::from_config(&FormatConfig {
            locale,
            ..FormatConfig::default()
        })
    }

    pub fn from_config(config: &FormatConfig) -> Self {
        Self {
            locale: config.locale,
            max_depth: config.max_reference_depth,
            depth: 0,
            data: None,
        }
    }

    /// The same context, resolving references through `data`.
    pub fn with_data<'b>(&self, data: &'b DataTree<'b>) -> FormatContext<'b> {
        FormatContext {
            locale: self.locale,
            max_depth: self.max_depth,
            depth: self.depth,
            data: Some(data),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn data(&self) -> Option<&'a DataTree<'a>> {
        self.data
    }

    fn bindings(&self, id: NodeId) -> Result<&'a DataTree<'a>> {
        self.data.ok_or(BinviewError::UnboundNode(id))
    }

    fn descend(&self) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(BinviewError::ReferenceDepth {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Formats another node with that node's own interpretation. A node
    /// without one formats as the empty string.
    pub(crate) fn format_node(&self, id: NodeId) -> Result<String> {
        let data = self.bindings(id)?;
        let nested = self.descend()?;
        Ok(data.format_in(id, &nested)?.unwrap_or_default())
    }

    /// Reads another node as a little-endian integer of up to 8 bytes.
    pub(crate) fn read_value(&self, id: NodeId) -> Result<u64> {
        let data = self.bindings(id)?;
        let bytes = data.cursor(id)?.read_up_to(8)?;
        Ok(int::decode(&bytes, Endianness::Little))
    }
}

/// Dispatch on another node's value.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Node whose value selects the case.
    pub reference: NodeId,
    /// Checked in order; the first equal value wins.
    pub cases: Vec<(u64, Rc<Interpretation>)>,
    pub default: Rc<Interpretation>,
}

/// The ways a node's bytes can be displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// Bytes as characters.
    Ascii,
    /// Bytes as characters up to the first zero byte.
    Asciz,
    /// `0x` and two hex digits per byte.
    Hex,
    /// Unsigned integer of up to 8 bytes.
    Int(IntFormat),
    /// MS-DOS packed date.
    MsdosDate,
    /// MS-DOS packed time.
    MsdosTime,
    /// Another node's formatted value.
    Node(NodeId),
    /// Several nodes' formatted values spliced into a template.
    AdvancedNode(Template),
    /// Bit groups with labels.
    Flags(FlagGroups),
    /// Interpretation chosen by another node's value.
    Conditional(Conditional),
    /// Integer with a label from a value table.
    Enum(EnumTable),
}

impl Interpretation {
    pub fn int(format: IntFormat) -> Self {
        Self::Int(format)
    }

    pub fn node(reference: NodeId) -> Self {
        Self::Node(reference)
    }

    /// `$1`..`$9` in `template` are replaced by the values of `nodes`; `$$`
    /// is a literal `$`.
    pub fn advanced(template: &str, nodes: Vec<NodeId>) -> Result<Self> {
        Ok(Self::AdvancedNode(Template::parse(template, nodes)?))
    }

    pub fn flags(groups: Vec<FlagGroup>) -> Result<Self> {
        Ok(Self::Flags(FlagGroups::new(groups)?))
    }

    pub fn conditional(
        reference: NodeId,
        cases: Vec<(u64, Rc<Interpretation>)>,
        default: impl Into<Rc<Interpretation>>,
    ) -> Self {
        Self::Conditional(Conditional {
            reference,
            cases,
            default: default.into(),
        })
    }

    pub fn enumeration(
        format: IntFormat,
        entries: Vec<(u64, String)>,
        default: impl Into<String>,
    ) -> Self {
        Self::Enum(EnumTable {
            format,
            entries,
            default: default.into(),
        })
    }

    /// Wraps the interpretation for sharing between nodes.
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Nodes whose bytes this interpretation reads, including those of
    /// nested conditional cases.
    pub fn references(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<NodeId>) {
        match self {
            Self::Node(id) => out.push(*id),
            Self::AdvancedNode(template) => out.extend_from_slice(template.nodes()),
            Self::Conditional(cond) => {
                out.push(cond.reference);
                for (_, case) in &cond.cases {
                    case.collect_references(out);
                }
                cond.default.collect_references(out);
            }
            _ => {}
        }
    }

    /// Formats the bytes under `cursor`.
    pub fn format(&self, cursor: &mut ByteCursor, ctx: &FormatContext<'_>) -> Result<String> {
        match self {
            Self::Ascii => Ok(text::ascii(cursor)?),
            Self::Asciz => Ok(text::asciz(cursor)?),
            Self::Hex => Ok(text::hex(cursor)?),
            Self::Int(format) => Ok(format.format(cursor)?),
            Self::MsdosDate => Ok(msdos::MsdosDate::read(cursor)?.display(ctx.locale())),
            Self::MsdosTime => Ok(msdos::MsdosTime::read(cursor)?.display(ctx.locale())),
            Self::Node(id) => ctx.format_node(*id),
            Self::AdvancedNode(template) => template.render(ctx),
            Self::Flags(groups) => Ok(groups.format(cursor)?),
            Self::Conditional(cond) => {
                let value = ctx.read_value(cond.reference)?;
                let chosen = cond
                    .cases
                    .iter()
                    .find(|(candidate, _)| *candidate == value)
                    .map(|(_, interpretation)| interpretation)
                    .unwrap_or(&cond.default);
                chosen.format(cursor, ctx)
            }
            Self::Enum(table) => Ok(table.format(cursor)?),
        }
    }
}
