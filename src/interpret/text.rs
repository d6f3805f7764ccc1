//! Character and hex renderings.

use crate::io::error::Result;
use crate::io::ByteCursor;

/// Every byte as the character with the same code point.
pub fn ascii(cursor: &mut ByteCursor) -> Result<String> {
    let mut out = String::new();
    while cursor.has_next() {
        out.push(char::from(cursor.next_byte()?));
    }
    Ok(out)
}

/// Like [`ascii`], stopping at the first zero byte. Bytes after the
/// terminator are left unread.
pub fn asciz(cursor: &mut ByteCursor) -> Result<String> {
    let mut out = String::new();
    while cursor.has_next() {
        match cursor.next_byte()? {
            0 => break,
            byte => out.push(char::from(byte)),
        }
    }
    Ok(out)
}

/// `0x` followed by two uppercase hex digits per byte, in stream order.
pub fn hex(cursor: &mut ByteCursor) -> Result<String> {
    let bytes = cursor.read_to_end()?;
    Ok(format!("0x{}", hex::encode_upper(bytes)))
}
