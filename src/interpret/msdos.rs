//! MS-DOS packed date and time fields (as used by ZIP and FAT).
//!
//! Both are 16-bit little-endian values. Short fields are zero-padded.

use crate::interpret::Locale;
use crate::io::error::Result;
use crate::io::ByteCursor;

fn read_u16(cursor: &mut ByteCursor) -> Result<u16> {
    let bytes = cursor.read_up_to(2)?;
    let mut buf = [0u8; 2];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Ok(u16::from_le_bytes(buf))
}

/// Day `[0:4]`, month `[5:8]`, years since 1980 `[9:15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsdosDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl MsdosDate {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            year: 1980 + (raw >> 9),
            month: ((raw >> 5) & 0x0f) as u8,
            day: (raw & 0x1f) as u8,
        }
    }

    pub fn read(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self::from_raw(read_u16(cursor)?))
    }

    pub fn display(&self, locale: Locale) -> String {
        match locale {
            Locale::EnUs => format!("{}/{}/{}", self.month, self.day, self.year),
        }
    }
}

/// Seconds / 2 `[0:4]`, minute `[5:10]`, hour `[11:15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsdosTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl MsdosTime {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            hour: (raw >> 11) as u8,
            minute: ((raw >> 5) & 0x3f) as u8,
            second: ((raw & 0x1f) * 2) as u8,
        }
    }

    pub fn read(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self::from_raw(read_u16(cursor)?))
    }

    pub fn display(&self, locale: Locale) -> String {
        match locale {
            Locale::EnUs => format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second),
        }
    }
}
