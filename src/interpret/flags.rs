//! Bit-field rendering.
//!
//! A field's bytes are read as a little-endian integer. Its groups describe
//! the low `sum(width)` bits, the first group being the most significant.
//! Each group renders as its bits followed by a label:
//! `0 (no data descriptor), 1 (encrypted)`.

use crate::error::{BinviewError, Result};
use crate::interpret::int::{decode, Endianness, MAX_INT_BYTES};
use crate::io::ByteCursor;

const MAX_BITS: u32 = (MAX_INT_BYTES * 8) as u32;

/// Labels for the values of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagLabels {
    /// `labels[value]`; values past the end render as `unknown`.
    PerValue(Vec<String>),
    /// One label whatever the value.
    Single(String),
}

/// A run of `width` bits with its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagGroup {
    pub width: u32,
    pub labels: FlagLabels,
}

impl FlagGroup {
    /// A group whose values are labelled in order, e.g. `["off", "on"]`.
    pub fn labelled<S: Into<String>>(width: u32, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            width,
            labels: FlagLabels::PerValue(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// A group shown with the same label for every value.
    pub fn named(width: u32, label: impl Into<String>) -> Self {
        Self {
            width,
            labels: FlagLabels::Single(label.into()),
        }
    }

    fn label(&self, value: u64) -> &str {
        match &self.labels {
            FlagLabels::Single(label) => label.as_str(),
            FlagLabels::PerValue(labels) => usize::try_from(value)
                .ok()
                .and_then(|i| labels.get(i))
                .map(String::as_str)
                .unwrap_or("unknown"),
        }
    }
}

/// Flag groups whose widths fit in one 64-bit value. Only built through
/// [`FlagGroups::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagGroups(Vec<FlagGroup>);

impl FlagGroups {
    /// # Errors
    ///
    /// `InvalidFlags` if a group is zero bits wide or the widths add up to
    /// more than 64.
    pub fn new(groups: Vec<FlagGroup>) -> Result<Self> {
        validate(&groups)?;
        Ok(Self(groups))
    }

    pub fn groups(&self) -> &[FlagGroup] {
        &self.0
    }

    pub(crate) fn format(&self, cursor: &mut ByteCursor) -> crate::io::error::Result<String> {
        let bytes = cursor.read_up_to(MAX_INT_BYTES)?;
        let value = decode(&bytes, Endianness::Little);

        let mut shift = self
            .0
            .iter()
            .fold(0u32, |total, g| total.saturating_add(g.width))
            .min(MAX_BITS);
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|group| {
                let width = group.width.min(MAX_BITS);
                shift = shift.saturating_sub(width);
                let mask = if width >= MAX_BITS {
                    u64::MAX
                } else {
                    (1u64 << width) - 1
                };
                let bits = value.checked_shr(shift).unwrap_or(0) & mask;
                format!(
                    "{:0width$b} ({})",
                    bits,
                    group.label(bits),
                    width = width as usize
                )
            })
            .collect();
        Ok(rendered.join(", "))
    }
}

fn validate(groups: &[FlagGroup]) -> Result<()> {
    let mut total = 0u32;
    for group in groups {
        if group.width == 0 {
            return Err(BinviewError::InvalidFlags(
                "flag groups must be at least one bit wide".to_string(),
            ));
        }
        total = total.saturating_add(group.width);
    }
    if total > MAX_BITS {
        return Err(BinviewError::InvalidFlags(format!(
            "flag groups span {} bits; at most {} are supported",
            total, MAX_BITS
        )));
    }
    Ok(())
}
