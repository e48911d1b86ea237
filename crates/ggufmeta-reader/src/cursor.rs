//! Forward-only, chunk-buffered byte cursor.

use std::io::{self, Read};

use tracing::trace;

use crate::error::{GgufError, Result};

/// Size of every chunk fetched from the underlying source (10 MiB).
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Knobs for [`ByteCursor`].
///
/// The defaults fetch [`CHUNK_SIZE`] bytes at a time and treat a short chunk
/// as a truncated read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Bytes requested from the source on every fetch.
    pub chunk_size: usize,
    /// Accept one short fetch as end-of-file instead of failing.
    pub allow_partial_chunk: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { chunk_size: CHUNK_SIZE, allow_partial_chunk: false }
    }
}

/// Buffers a source in fixed-size chunks and hands out byte slices in order.
///
/// A cursor is created per parse and never rewinds. When a read runs past the
/// buffered data exactly one chunk is fetched before the bounds are checked
/// again.
#[derive(Debug)]
pub struct ByteCursor<R> {
    source: R,
    data: Vec<u8>,
    offset: usize,
    options: ReaderOptions,
    eof: bool,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(source: R) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    pub fn with_options(source: R, options: ReaderOptions) -> Self {
        Self { source, data: Vec::new(), offset: 0, options, eof: false }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset as u64
    }

    /// Number of bytes fetched from the source so far.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.data.len()
    }

    /// Return the next `n` bytes and advance past them.
    pub fn read(&mut self, n: usize) -> Result<&[u8]> {
        let end = self.offset.checked_add(n).ok_or_else(|| self.truncated(n as u64))?;
        if end > self.data.len() {
            self.fetch_chunk(n as u64)?;
            if end > self.data.len() {
                return Err(self.truncated(n as u64));
            }
        }
        let start = self.offset;
        self.offset = end;
        Ok(&self.data[start..end])
    }

    /// Like [`read`](Self::read) for a length taken from the stream.
    pub fn read_len(&mut self, n: u64) -> Result<&[u8]> {
        let n = usize::try_from(n).map_err(|_| self.truncated(n))?;
        self.read(n)
    }

    /// Read exactly `N` bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Give the source back, dropping the buffer.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn fetch_chunk(&mut self, requested: u64) -> Result<()> {
        if self.eof {
            return Err(self.truncated(requested));
        }

        let chunk = self.options.chunk_size;
        let start = self.data.len();
        self.data.resize(start + chunk, 0);
        let filled = match fill(&mut self.source, &mut self.data[start..]) {
            Ok(filled) => filled,
            Err(e) => {
                self.data.truncate(start);
                return Err(GgufError::Io(e));
            }
        };
        self.data.truncate(start + filled);
        trace!(offset = self.offset, filled, chunk, "fetched chunk");

        if filled < chunk {
            if !self.options.allow_partial_chunk {
                return Err(self.truncated(requested));
            }
            self.eof = true;
        }
        Ok(())
    }

    fn truncated(&self, requested: u64) -> GgufError {
        GgufError::TruncatedRead {
            offset: self.offset as u64,
            requested,
            available: (self.data.len() - self.offset) as u64,
        }
    }
}

/// Read until `buf` is full or the source reports end-of-file.
fn fill<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small(chunk_size: usize, allow_partial_chunk: bool) -> ReaderOptions {
        ReaderOptions { chunk_size, allow_partial_chunk }
    }

    #[test]
    fn reads_advance_offset() {
        let mut cursor = ByteCursor::with_options(Cursor::new((0u8..16).collect::<Vec<_>>()), small(8, false));
        assert_eq!(cursor.read(3).unwrap(), &[0, 1, 2]);
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.read_array::<2>().unwrap(), [3, 4]);
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn fetches_whole_chunks_only() {
        let mut cursor = ByteCursor::with_options(Cursor::new(vec![7u8; 32]), small(8, false));
        cursor.read(1).unwrap();
        assert_eq!(cursor.buffered(), 8);
        cursor.read(7).unwrap();
        assert_eq!(cursor.buffered(), 8);
        cursor.read(1).unwrap();
        assert_eq!(cursor.buffered(), 16);
    }

    #[test]
    fn read_spanning_chunk_boundary() {
        let data: Vec<u8> = (0u8..16).collect();
        let mut cursor = ByteCursor::with_options(Cursor::new(data), small(8, false));
        cursor.read(6).unwrap();
        assert_eq!(cursor.read(4).unwrap(), &[6, 7, 8, 9]);
    }

    #[test]
    fn short_chunk_is_truncated_read() {
        let mut cursor = ByteCursor::with_options(Cursor::new(vec![1u8; 5]), small(8, false));
        let err = cursor.read(1).unwrap_err();
        assert!(matches!(err, GgufError::TruncatedRead { offset: 0, requested: 1, .. }));
    }

    #[test]
    fn only_one_fetch_per_read() {
        // A read larger than a chunk cannot be satisfied by a single fetch.
        let mut cursor = ByteCursor::with_options(Cursor::new(vec![0u8; 64]), small(8, false));
        let err = cursor.read(12).unwrap_err();
        assert!(matches!(
            err,
            GgufError::TruncatedRead { offset: 0, requested: 12, available: 8 }
        ));
    }

    #[test]
    fn partial_chunk_accepted_when_allowed() {
        let mut cursor = ByteCursor::with_options(Cursor::new(vec![9u8; 5]), small(8, true));
        assert_eq!(cursor.read(5).unwrap(), &[9; 5]);
        let err = cursor.read(1).unwrap_err();
        assert!(matches!(err, GgufError::TruncatedRead { offset: 5, available: 0, .. }));
    }

    #[test]
    fn oversized_length_is_truncated_not_panic() {
        let mut cursor = ByteCursor::with_options(Cursor::new(vec![0u8; 8]), small(8, false));
        assert!(matches!(cursor.read_len(u64::MAX), Err(GgufError::TruncatedRead { .. })));
    }
}
