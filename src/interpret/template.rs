//! Templates that splice the values of other nodes into text.

use crate::core::node::NodeId;
use crate::error::{BinviewError, Result};
use crate::interpret::FormatContext;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    // Index into `Template::nodes`.
    Node(usize),
}

/// A parsed `$1`..`$9` template bound to its nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
    nodes: Vec<NodeId>,
}

impl Template {
    /// Parses `template`, checking every placeholder against `nodes`.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` for `$0`, a `$` followed by anything other than a
    /// digit or `$`, a trailing `$`, or a placeholder past the end of
    /// `nodes`.
    pub fn parse(template: &str, nodes: Vec<NodeId>) -> Result<Self> {
        let invalid = |reason: String| BinviewError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let bytes = template.as_bytes();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;
        while let Some(found) = memchr::memchr(b'$', &bytes[pos..]) {
            let at = pos + found;
            literal.push_str(&template[pos..at]);
            match bytes.get(at + 1) {
                Some(b'$') => literal.push('$'),
                Some(digit @ b'1'..=b'9') => {
                    let index = usize::from(*digit - b'0');
                    if index > nodes.len() {
                        return Err(invalid(format!(
                            "placeholder ${} has no node ({} supplied)",
                            index,
                            nodes.len()
                        )));
                    }
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Node(index - 1));
                }
                Some(b'0') => {
                    return Err(invalid("placeholder $0 is outside 1-9".to_string()));
                }
                Some(_) => {
                    let next = template[at + 1..].chars().next().unwrap_or_default();
                    return Err(invalid(format!("unexpected {:?} after $", next)));
                }
                None => return Err(invalid("template ends with $".to_string())),
            }
            pos = at + 2;
        }
        literal.push_str(&template[pos..]);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
            nodes,
        })
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn render(&self, ctx: &FormatContext<'_>) -> Result<String> {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Node(index) => out.push_str(&ctx.format_node(self.nodes[*index])?),
            }
        }
        Ok(out)
    }
}
