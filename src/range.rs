use std::fmt;
use std::sync::Arc;

use crate::scan;
use crate::{Error, Result};

/// Zero-copy view over the byte span `[start, end)` of a shared input buffer.
///
/// All positions are byte offsets into the full buffer, never character
/// offsets. A range never owns the buffer and is immutable once constructed;
/// narrowing operations return new ranges aliasing the same buffer.
#[derive(Clone)]
pub struct ByteRange {
    buf: Arc<[u8]>,
    start: usize,
    end: usize,
}

impl ByteRange {
    pub fn new(buf: Arc<[u8]>, start: usize, end: usize) -> Result<Self> {
        if end < start || end > buf.len() {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { buf, start, end })
    }

    /// Range spanning the whole buffer.
    pub fn whole(buf: Arc<[u8]>) -> Self {
        let end = buf.len();
        Self { buf, start: 0, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The exact byte slice this range covers.
    pub fn text(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    /// Byte at offset `i` from the start of the range, `None` past its end.
    pub fn byte_at(&self, i: usize) -> Option<u8> {
        let pos = self.start.checked_add(i)?;
        if pos < self.end {
            Some(self.buf[pos])
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<u8> {
        self.byte_at(0)
    }

    /// Narrow to `[start, pos)`.
    pub fn prefix(&self, pos: usize) -> Result<Self> {
        Self::new(Arc::clone(&self.buf), self.start, pos)
    }

    /// Narrow to `[pos, end)`.
    pub fn suffix(&self, pos: usize) -> Result<Self> {
        Self::new(Arc::clone(&self.buf), pos, self.end)
    }

    /// The unconsumed tail `[self.end, enclosing.end)`: what is left of an
    /// enclosing range after this sub-range has been read out of it.
    pub fn remainder(&self, enclosing: &ByteRange) -> Result<Self> {
        Self::new(Arc::clone(&self.buf), self.end, enclosing.end)
    }

    /// The leading run of whitespace as a prefix range.
    pub fn read_whitespace(&self) -> Self {
        let pos = scan::skim_whitespace(&self.buf, self.start, self.end);
        Self {
            buf: Arc::clone(&self.buf),
            start: self.start,
            end: pos,
        }
    }

    /// The range with leading whitespace dropped.
    pub fn skip_whitespace(&self) -> Self {
        let pos = scan::skim_whitespace(&self.buf, self.start, self.end);
        Self {
            buf: Arc::clone(&self.buf),
            start: pos,
            end: self.end,
        }
    }

    /// The range with whitespace dropped from both ends, the exact span handed
    /// to a decoder.
    pub fn trimmed(&self) -> Self {
        let start = scan::skim_whitespace(&self.buf, self.start, self.end);
        let mut end = self.end;
        while end > start && scan::is_whitespace(self.buf[end - 1]) {
            end -= 1;
        }
        Self {
            buf: Arc::clone(&self.buf),
            start,
            end,
        }
    }

    /// Match one leading byte against `set` and return it as a prefix range.
    /// On a mismatch, fails with [`Error::UnexpectedByte`] if `required`,
    /// otherwise returns an empty prefix.
    pub fn read_byte(&self, set: &[u8], required: bool) -> Result<Self> {
        let pos = scan::skim_byte(&self.buf, self.start, self.end, set, required)?;
        self.prefix(pos)
    }

    /// Match one leading byte against `set` and skip past it.
    pub fn skip_byte(&self, set: &[u8], required: bool) -> Result<Self> {
        let pos = scan::skim_byte(&self.buf, self.start, self.end, set, required)?;
        self.suffix(pos)
    }

    /// Scan forward to the first byte of `terminators` at this nesting level
    /// and return everything before it (and the terminator itself when
    /// `include_terminator`) as a prefix range. Terminators inside nested
    /// strings, arrays, and objects do not stop the scan.
    pub fn read_until(
        &self,
        terminators: &[u8],
        include_terminator: bool,
        max_depth: usize,
    ) -> Result<Self> {
        let pos = scan::skim_until(
            &self.buf,
            self.start,
            self.end,
            false,
            terminators,
            include_terminator,
            max_depth,
        )?;
        self.prefix(pos)
    }

    /// Like [`read_until`](Self::read_until) but returns the suffix after the
    /// scan instead.
    pub fn skip_until(
        &self,
        terminators: &[u8],
        include_terminator: bool,
        max_depth: usize,
    ) -> Result<Self> {
        let pos = scan::skim_until(
            &self.buf,
            self.start,
            self.end,
            false,
            terminators,
            include_terminator,
            max_depth,
        )?;
        self.suffix(pos)
    }
}

impl fmt::Debug for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRange")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("text", &String::from_utf8_lossy(self.text()))
            .finish()
    }
}
