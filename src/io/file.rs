//! File-backed byte regions.
//!
//! A [`FileRegion`] is a window `[offset, offset + len)` over a handle that
//! may be shared with other regions or with code outside this crate. Shared
//! regions save the handle's position before touching it and restore it
//! afterwards, so readers of the same handle never observe a moved cursor.

use crate::io::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::rc::Rc;
use tracing::trace;

/// Anything that can back a file region.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// A handle shared between every region carved out of the same file.
pub type FileHandle = Rc<RefCell<dyn ReadSeek>>;

/// Wraps a reader in a [`FileHandle`].
pub fn shared_handle<R: Read + Seek + 'static>(reader: R) -> FileHandle {
    Rc::new(RefCell::new(reader))
}

/// How a region treats the position of its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileMode {
    /// The region owns the handle position and never restores it.
    Exclusive,
    /// Every operation leaves the handle position where it found it.
    Shared,
}

/// A window over a file handle.
#[derive(Clone)]
pub struct FileRegion {
    handle: FileHandle,
    offset: u64,
    // None means "until EOF".
    len: Option<u64>,
    mode: FileMode,
    resolved_len: Cell<Option<u64>>,
}

impl FileRegion {
    pub fn new(handle: FileHandle, offset: u64, len: Option<u64>, mode: FileMode) -> Self {
        Self {
            handle,
            offset,
            len,
            mode,
            resolved_len: Cell::new(len),
        }
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Length of the region, seeking to the end of the file when the region
    /// runs until EOF. The result is cached.
    pub fn size(&self) -> Result<u64> {
        if let Some(len) = self.resolved_len.get() {
            return Ok(len);
        }

        let end = self.with_handle(|file| file.seek(SeekFrom::End(0)))?;
        let len = end.saturating_sub(self.offset);
        self.resolved_len.set(Some(len));
        trace!(offset = self.offset, len, "Resolved open-ended file region");
        Ok(len)
    }

    /// Reads the byte at `index` relative to the region start.
    pub fn get(&self, index: u64) -> Result<u8> {
        let size = self.size()?;
        if index >= size {
            return Err(IoError::IndexOutOfBounds { index, size });
        }

        let mut byte = [0u8; 1];
        let read = self.read_at(index, &mut byte)?;
        if read == 0 {
            return Err(IoError::UnexpectedEof {
                expected: 1,
                read: 0,
            });
        }
        Ok(byte[0])
    }

    /// Narrows the region. The result always runs in shared mode since the
    /// parent region, or its owner, may still be using the handle.
    pub fn subset(&self, start: u64, len: u64) -> Result<Self> {
        let size = self.size()?;
        check_range(start, len, size)?;
        Ok(Self::new(
            Rc::clone(&self.handle),
            self.offset + start,
            Some(len),
            FileMode::Shared,
        ))
    }

    /// Fills as much of `buf` as the file allows, starting at `local`
    /// (relative to the region start). Returns the number of bytes read.
    pub fn read_at(&self, local: u64, buf: &mut [u8]) -> Result<usize> {
        let absolute = self.offset + local;
        self.with_handle(|file| {
            file.seek(SeekFrom::Start(absolute))?;
            read_full(file, buf)
        })
    }

    fn with_handle<T>(&self, op: impl FnOnce(&mut dyn ReadSeek) -> io::Result<T>) -> Result<T> {
        let mut file = self.handle.borrow_mut();
        match self.mode {
            FileMode::Exclusive => Ok(op(&mut *file)?),
            FileMode::Shared => {
                let saved = file.stream_position()?;
                let out = op(&mut *file);
                file.seek(SeekFrom::Start(saved))?;
                Ok(out?)
            }
        }
    }
}

impl fmt::Debug for FileRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRegion")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Validates `[start, start + len)` against a source of `size` bytes.
pub(crate) fn check_range(start: u64, len: u64, size: u64) -> Result<()> {
    match start.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(IoError::OutOfBounds { start, len, size }),
    }
}

fn read_full(file: &mut dyn ReadSeek, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
