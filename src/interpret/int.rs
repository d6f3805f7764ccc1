//! Integer and enumeration rendering.

use crate::io::error::Result;
use crate::io::ByteCursor;

/// Widest integer the engine decodes; longer fields are truncated.
pub const MAX_INT_BYTES: usize = 8;

/// Byte order of an encoded integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Assembles up to 8 bytes into a `u64` in the given byte order. Only the
/// first 8 bytes count; fewer bytes behave as if zero-extended.
pub fn decode(bytes: &[u8], endianness: Endianness) -> u64 {
    let bytes = &bytes[..bytes.len().min(MAX_INT_BYTES)];
    let mut buf = [0u8; MAX_INT_BYTES];
    match endianness {
        Endianness::Little => {
            buf[..bytes.len()].copy_from_slice(bytes);
            u64::from_le_bytes(buf)
        }
        Endianness::Big => {
            buf[MAX_INT_BYTES - bytes.len()..].copy_from_slice(bytes);
            u64::from_be_bytes(buf)
        }
    }
}

/// How an integer field is decoded and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntFormat {
    pub endianness: Endianness,
    /// Append the raw bytes, most significant first, as hex.
    pub include_hex: bool,
}

impl IntFormat {
    pub const LITTLE: Self = Self {
        endianness: Endianness::Little,
        include_hex: false,
    };

    pub const BIG: Self = Self {
        endianness: Endianness::Big,
        include_hex: false,
    };

    pub const fn with_hex(mut self) -> Self {
        self.include_hex = true;
        self
    }

    /// Reads up to 8 bytes and returns the value with its rendering.
    pub fn read(&self, cursor: &mut ByteCursor) -> Result<(u64, String)> {
        let bytes = cursor.read_up_to(MAX_INT_BYTES)?;
        let value = decode(&bytes, self.endianness);
        Ok((value, self.render(value, &bytes)))
    }

    pub fn format(&self, cursor: &mut ByteCursor) -> Result<String> {
        Ok(self.read(cursor)?.1)
    }

    fn render(&self, value: u64, bytes: &[u8]) -> String {
        if !self.include_hex {
            return value.to_string();
        }
        let hex = match self.endianness {
            Endianness::Big => hex::encode_upper(bytes),
            Endianness::Little => {
                let reversed: Vec<u8> = bytes.iter().rev().copied().collect();
                hex::encode_upper(reversed)
            }
        };
        format!("{} (0x{})", value, hex)
    }
}

/// Integer followed by the label of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTable {
    pub format: IntFormat,
    /// Searched in order; the first equal value wins.
    pub entries: Vec<(u64, String)>,
    /// Label used when no entry matches.
    pub default: String,
}

impl EnumTable {
    pub fn label(&self, value: u64) -> &str {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == value)
            .map(|(_, label)| label.as_str())
            .unwrap_or(&self.default)
    }

    pub fn format(&self, cursor: &mut ByteCursor) -> Result<String> {
        let (value, rendered) = self.format.read(cursor)?;
        Ok(format!("{} ({})", rendered, self.label(value)))
    }
}
