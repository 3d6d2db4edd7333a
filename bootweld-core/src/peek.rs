//! Buffered-lookahead reader.
//!
//! [`PeekReader`] inspects the first bytes of a stream without consuming
//! them: the lookahead is buffered once at construction and replayed before
//! reads fall through to the underlying reader, so downstream consumers see
//! the stream exactly once from the start. The pattern is generic; the only
//! zip-flavored piece is the [`PeekReader::has_zip_header`] convenience.

use std::io::{self, Read};

/// ZIP local file header magic, `PK\x03\x04`.
pub const ZIP_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// A reader that peeks at the first few bytes of its source.
///
/// Construction eagerly reads up to [`ZIP_HEADER`]-many bytes. A stream
/// shorter than the lookahead is not an error; the header check simply
/// fails and the short content replays as-is.
pub struct PeekReader<R: Read> {
    inner: R,
    header: [u8; 4],
    /// Bytes actually present in `header`.
    filled: usize,
    /// Replay cursor into `header`; `filled` once the buffer is drained.
    position: usize,
}

impl<R: Read> PeekReader<R> {
    /// Wrap a reader, buffering its first bytes.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let mut header = [0u8; 4];
        let mut filled = 0;
        // read() may return short counts; fill until EOF or full.
        while filled < header.len() {
            let n = inner.read(&mut header[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(Self {
            inner,
            header,
            filled,
            position: 0,
        })
    }

    /// True iff the stream begins with the ZIP local-file-header magic.
    pub fn has_zip_header(&self) -> bool {
        self.filled == ZIP_HEADER.len() && self.header == ZIP_HEADER
    }

    /// Unwrap, discarding any unread lookahead.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position < self.filled {
            let n = (self.filled - self.position).min(buf.len());
            buf[..n].copy_from_slice(&self.header[self.position..self.position + n]);
            self.position += n;
            return Ok(n);
        }
        self.inner.read(buf)
    }
}
