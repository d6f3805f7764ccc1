//! Uniform random access over bytes in memory, in files, or spread across
//! several of either.
//!
//! A [`ByteSource`] can be indexed, narrowed with [`ByteSource::subset`]
//! without copying, and read sequentially through a [`ByteCursor`]. Memory
//! sources share one reference-counted buffer (`bytes::Bytes`, optionally
//! backed by a read-only memory map), file sources share one handle, and
//! aggregate sources stitch children together into a single logical range.

pub mod cursor;
pub mod error;
pub mod file;

pub use crate::io::cursor::{ByteCursor, DEFAULT_BUFFER_SIZE};
pub use crate::io::file::{shared_handle, FileHandle, FileMode, FileRegion, ReadSeek};

use crate::config::IoConfig;
use crate::io::error::{IoError, Result};
use crate::io::file::check_range;
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Which backing a source uses; handy for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Memory,
    File,
    Aggregate,
}

/// A random-access, sliceable view over a byte range.
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// A shared view over an in-memory buffer.
    Memory(Bytes),
    /// A window over a (possibly shared) file handle.
    File(FileRegion),
    /// Children concatenated into one contiguous range.
    Aggregate(Vec<ByteSource>),
}

impl Default for ByteSource {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Memory(Bytes::from(data))
    }
}

impl From<Bytes> for ByteSource {
    fn from(data: Bytes) -> Self {
        Self::Memory(data)
    }
}

impl From<&'static [u8]> for ByteSource {
    fn from(data: &'static [u8]) -> Self {
        Self::Memory(Bytes::from_static(data))
    }
}

impl ByteSource {
    /// A source with no bytes.
    pub fn empty() -> Self {
        Self::Memory(Bytes::new())
    }

    /// Concatenates `children` into one logical range.
    pub fn aggregate(children: Vec<ByteSource>) -> Self {
        Self::Aggregate(children)
    }

    /// Wraps a handle that other code may also be reading. The source and
    /// everything derived from it restores the handle position after use.
    pub fn from_handle(handle: FileHandle) -> Self {
        Self::File(FileRegion::new(handle, 0, None, FileMode::Shared))
    }

    /// Takes ownership of an open file. Reads move the file position freely.
    pub fn from_file(file: File) -> Self {
        Self::File(FileRegion::new(
            shared_handle(file),
            0,
            None,
            FileMode::Exclusive,
        ))
    }

    /// Opens `path` as a whole-resource source.
    ///
    /// Non-empty files are memory-mapped when `config.prefer_mmap` is set;
    /// otherwise the file is read through an exclusive handle.
    ///
    /// # Errors
    ///
    /// Returns `IoError::FileTooLarge` if the file exceeds
    /// `config.max_file_size`, or the underlying I/O error.
    pub fn open<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size,
            max_file_size = config.max_file_size,
            mmap = config.prefer_mmap,
            "Opening byte source"
        );

        if size > config.max_file_size {
            warn!(
                path = %path.display(),
                size,
                limit = config.max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: config.max_file_size,
                found: size,
            });
        }

        // memmap cannot map empty files.
        if config.prefer_mmap && size > 0 {
            // Safety: read-only map of a regular file; the map is kept alive
            // by the `Bytes` owner for as long as any view references it.
            let map = unsafe { Mmap::map(&file)? };
            return Ok(Self::Memory(Bytes::from_owner(map)));
        }

        Ok(Self::from_file(file))
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Memory(_) => SourceKind::Memory,
            Self::File(_) => SourceKind::File,
            Self::Aggregate(_) => SourceKind::Aggregate,
        }
    }

    /// Number of bytes in the source.
    pub fn size(&self) -> Result<u64> {
        match self {
            Self::Memory(data) => Ok(data.len() as u64),
            Self::File(region) => region.size(),
            Self::Aggregate(children) => children
                .iter()
                .try_fold(0u64, |total, child| -> Result<u64> {
                    Ok(total + child.size()?)
                }),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// The byte at `index`.
    pub fn get(&self, index: u64) -> Result<u8> {
        match self {
            Self::Memory(data) => usize::try_from(index)
                .ok()
                .and_then(|i| data.get(i).copied())
                .ok_or(IoError::IndexOutOfBounds {
                    index,
                    size: data.len() as u64,
                }),
            Self::File(region) => region.get(index),
            Self::Aggregate(children) => {
                let mut local = index;
                for child in children {
                    let size = child.size()?;
                    if local < size {
                        return child.get(local);
                    }
                    local -= size;
                }
                Err(IoError::IndexOutOfBounds {
                    index,
                    size: self.size()?,
                })
            }
        }
    }

    /// A view of `len` bytes starting at `start`.
    ///
    /// Memory and file sources never copy. An aggregate narrows the children
    /// that the range cuts through and keeps fully covered children as they
    /// are.
    ///
    /// # Errors
    ///
    /// Returns `IoError::OutOfBounds` unless `start + len <= size()`.
    pub fn subset(&self, start: u64, len: u64) -> Result<ByteSource> {
        match self {
            Self::Memory(data) => {
                check_range(start, len, data.len() as u64)?;
                let start = start as usize;
                Ok(Self::Memory(data.slice(start..start + len as usize)))
            }
            Self::File(region) => Ok(Self::File(region.subset(start, len)?)),
            Self::Aggregate(children) => {
                check_range(start, len, self.size()?)?;
                let end = start + len;

                let mut parts = Vec::new();
                let mut base = 0u64;
                for child in children {
                    let size = child.size()?;
                    let child_end = base + size;
                    if size > 0 && base < end && child_end > start {
                        if start <= base && child_end <= end {
                            parts.push(child.clone());
                        } else {
                            let from = start.max(base);
                            let to = end.min(child_end);
                            parts.push(child.subset(from - base, to - from)?);
                        }
                    }
                    if child_end >= end {
                        break;
                    }
                    base = child_end;
                }

                Ok(match parts.len() {
                    0 => Self::empty(),
                    1 => parts.remove(0),
                    _ => Self::Aggregate(parts),
                })
            }
        }
    }

    /// A cursor with the default file buffer size.
    pub fn cursor(&self) -> Result<ByteCursor> {
        self.cursor_with_buffer(DEFAULT_BUFFER_SIZE)
    }

    /// A cursor whose file-backed parts load `buffer_size` bytes per refill.
    pub fn cursor_with_buffer(&self, buffer_size: usize) -> Result<ByteCursor> {
        match self {
            Self::Memory(data) => Ok(ByteCursor::memory(data.clone())),
            Self::File(region) => ByteCursor::file(region.clone(), buffer_size),
            Self::Aggregate(children) => {
                let cursors = children
                    .iter()
                    .map(|child| child.cursor_with_buffer(buffer_size))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ByteCursor::aggregate(cursors))
            }
        }
    }

    /// Copies `len` bytes starting at `start`.
    pub fn read_range(&self, start: u64, len: u64) -> Result<Vec<u8>> {
        self.subset(start, len)?.to_vec()
    }

    /// Copies the whole source.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        match self {
            Self::Memory(data) => Ok(data.to_vec()),
            _ => self.cursor()?.read_to_end(),
        }
    }
}
