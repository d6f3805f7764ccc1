//! Custom error types for the I/O module.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Range [{start}, {start}+{len}) lies outside a source of {size} bytes.")]
    OutOfBounds { start: u64, len: u64, size: u64 },

    #[error("Index {index} lies outside a source of {size} bytes.")]
    IndexOutOfBounds { index: u64, size: u64 },

    #[error("Cursor read past the end of its source.")]
    CursorExhausted,

    #[error("File size of {found} bytes exceeds the maximum allowed size of {limit} bytes.")]
    FileTooLarge { limit: u64, found: u64 },

    #[error("File ended after {read} of {expected} bytes.")]
    UnexpectedEof { expected: u64, read: u64 },

    #[error("An underlying I/O error occurred: {0}")]
    Std(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;
