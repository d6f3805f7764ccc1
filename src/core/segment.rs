//! Segments and absolute extents.
//!
//! A [`Segment`] is a contiguous range in the coordinate space of a node's
//! parent. A node's own coordinate space is the concatenation of its
//! segments, so the absolute bytes behind a segment are found by mapping it
//! through every ancestor's [`Space`]. Nothing absolute is ever stored.

use std::fmt;

/// A contiguous `(offset, length)` range relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    /// Offset from the parent's coordinate origin.
    pub offset: u64,
    /// Length in bytes.
    pub length: u64,
}

impl Segment {
    pub const fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// End of the segment (exclusive), saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl From<(u64, u64)> for Segment {
    fn from((offset, length): (u64, u64)) -> Self {
        Self::new(offset, length)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, +{:#x})", self.offset, self.length)
    }
}

/// A half-open absolute range `[start, start + len)` within the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub start: u64,
    pub len: u64,
}

impl Extent {
    pub const fn new(start: u64, len: u64) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.len)
    }

    /// The part of `self` that lies within `[start, end)`, if any.
    pub fn clip(&self, start: u64, end: u64) -> Option<Extent> {
        let from = self.start.max(start);
        let to = self.end().min(end);
        (from < to).then(|| Extent::new(from, to - from))
    }
}

/// The coordinate space of a node: absolute extents laid end to end.
///
/// Local offset 0 is the start of the first extent; local offsets continue
/// into the next extent where the previous one ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    extents: Vec<Extent>,
}

impl Space {
    /// The resource itself: local offsets equal absolute offsets.
    pub fn identity() -> Self {
        Self {
            extents: vec![Extent::new(0, u64::MAX)],
        }
    }

    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }

    /// Maps a local range onto absolute extents. Parts that fall past the
    /// end of this space are dropped.
    pub fn map(&self, offset: u64, length: u64) -> Vec<Extent> {
        let want_end = offset.saturating_add(length);
        let mut out = Vec::new();
        let mut base = 0u64;
        for extent in &self.extents {
            let local_end = base.saturating_add(extent.len);
            let from = offset.max(base);
            let to = want_end.min(local_end);
            if from < to {
                push_merged(&mut out, Extent::new(extent.start + (from - base), to - from));
            }
            if local_end >= want_end {
                break;
            }
            base = local_end;
        }
        out
    }

    /// The space of a child whose segments are given in this space.
    pub fn child(&self, segments: &[Segment]) -> Space {
        let mut extents = Vec::new();
        for segment in segments {
            for extent in self.map(segment.offset, segment.length) {
                push_merged(&mut extents, extent);
            }
        }
        Space { extents }
    }
}

fn push_merged(out: &mut Vec<Extent>, extent: Extent) {
    match out.last_mut() {
        Some(last) if last.end() == extent.start => last.len += extent.len,
        _ => out.push(extent),
    }
}
