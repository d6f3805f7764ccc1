//! Sequential, restartable readers over a [`ByteSource`](super::ByteSource).

use crate::io::error::{IoError, Result};
use crate::io::file::{FileMode, FileRegion};
use bytes::Bytes;
use tracing::trace;

/// Default number of bytes a file cursor loads per refill.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Forward cursor over the bytes of a source.
///
/// `has_next` must be consulted before `next_byte`; reading past the end is
/// reported as [`IoError::CursorExhausted`]. `reset` rewinds to the first
/// byte. The cursor is also an `Iterator<Item = Result<u8>>`; after a read
/// error `has_next` is false until the next `reset`, so iteration ends.
#[derive(Debug)]
pub struct ByteCursor {
    inner: CursorKind,
    failed: bool,
}

#[derive(Debug)]
enum CursorKind {
    Memory(MemoryCursor),
    File(FileCursor),
    Aggregate(AggregateCursor),
}

impl ByteCursor {
    pub(crate) fn memory(data: Bytes) -> Self {
        Self {
            inner: CursorKind::Memory(MemoryCursor { data, pos: 0 }),
            failed: false,
        }
    }

    pub(crate) fn file(region: FileRegion, buffer_size: usize) -> Result<Self> {
        Ok(Self {
            inner: CursorKind::File(FileCursor::new(region, buffer_size)?),
            failed: false,
        })
    }

    pub(crate) fn aggregate(children: Vec<ByteCursor>) -> Self {
        Self {
            inner: CursorKind::Aggregate(AggregateCursor {
                children,
                current: 0,
            }),
            failed: false,
        }
    }

    /// Reports whether unread bytes remain.
    pub fn has_next(&mut self) -> bool {
        if self.failed {
            return false;
        }
        match &mut self.inner {
            CursorKind::Memory(c) => c.pos < c.data.len(),
            CursorKind::File(c) => c.consumed < c.len,
            CursorKind::Aggregate(c) => c.skip_exhausted(),
        }
    }

    /// Returns the current byte and advances by one.
    pub fn next_byte(&mut self) -> Result<u8> {
        let read = self.read_byte();
        if read.is_err() {
            self.failed = true;
        }
        read
    }

    fn read_byte(&mut self) -> Result<u8> {
        match &mut self.inner {
            CursorKind::Memory(c) => {
                let byte = *c.data.get(c.pos).ok_or(IoError::CursorExhausted)?;
                c.pos += 1;
                Ok(byte)
            }
            CursorKind::File(c) => c.next_byte(),
            CursorKind::Aggregate(c) => {
                if !c.skip_exhausted() {
                    return Err(IoError::CursorExhausted);
                }
                c.children[c.current].next_byte()
            }
        }
    }

    /// Rewinds to the first byte.
    pub fn reset(&mut self) {
        self.failed = false;
        match &mut self.inner {
            CursorKind::Memory(c) => c.pos = 0,
            CursorKind::File(c) => c.reset(),
            CursorKind::Aggregate(c) => {
                for child in &mut c.children {
                    child.reset();
                }
                c.current = 0;
            }
        }
    }

    /// Reads at most `limit` bytes, stopping early at the end of the source.
    pub fn read_up_to(&mut self, limit: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(limit.min(64));
        while out.len() < limit && self.has_next() {
            out.push(self.next_byte()?);
        }
        Ok(out)
    }

    /// Reads every remaining byte.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.read_up_to(usize::MAX)
    }
}

impl Iterator for ByteCursor {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            Some(self.next_byte())
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct MemoryCursor {
    data: Bytes,
    pos: usize,
}

/// Buffered reader over a file region. In shared mode every refill leaves
/// the handle where it was; that discipline lives in [`FileRegion::read_at`].
#[derive(Debug)]
struct FileCursor {
    region: FileRegion,
    len: u64,
    buffer: Vec<u8>,
    buf_pos: usize,
    buf_len: usize,
    // Bytes handed out so far.
    consumed: u64,
    // Bytes loaded into buffers so far.
    fetched: u64,
}

impl FileCursor {
    fn new(region: FileRegion, buffer_size: usize) -> Result<Self> {
        let len = region.size()?;
        Ok(Self {
            region,
            len,
            buffer: vec![0; buffer_size.max(1)],
            buf_pos: 0,
            buf_len: 0,
            consumed: 0,
            fetched: 0,
        })
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.consumed >= self.len {
            return Err(IoError::CursorExhausted);
        }
        if self.buf_pos == self.buf_len {
            self.refill()?;
        }
        let byte = self.buffer[self.buf_pos];
        self.buf_pos += 1;
        self.consumed += 1;
        Ok(byte)
    }

    fn refill(&mut self) -> Result<()> {
        let want = (self.len - self.fetched).min(self.buffer.len() as u64) as usize;
        let got = self.region.read_at(self.fetched, &mut self.buffer[..want])?;
        trace!(
            offset = self.region.offset() + self.fetched,
            requested = want,
            read = got,
            shared = self.region.mode() == FileMode::Shared,
            "Refilled file cursor"
        );
        if got < want {
            return Err(IoError::UnexpectedEof {
                expected: want as u64,
                read: got as u64,
            });
        }
        self.fetched += got as u64;
        self.buf_pos = 0;
        self.buf_len = got;
        Ok(())
    }

    fn reset(&mut self) {
        self.buf_pos = 0;
        self.buf_len = 0;
        self.consumed = 0;
        self.fetched = 0;
    }
}

#[derive(Debug)]
struct AggregateCursor {
    children: Vec<ByteCursor>,
    current: usize,
}

impl AggregateCursor {
    /// Moves to the first child with bytes left. Returns false once every
    /// child is exhausted.
    fn skip_exhausted(&mut self) -> bool {
        while self.current < self.children.len() {
            if self.children[self.current].has_next() {
                return true;
            }
            self.current += 1;
        }
        false
    }
}
