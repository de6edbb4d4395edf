//! Byte cursor over template text with line tracking.
//!
//! The scanner only ever stops on ASCII bytes (braces, quotes, whitespace),
//! so every position handed to [`Cursor::slice`] lies on a UTF-8 boundary.
//! Non-ASCII text is skipped over as opaque continuation bytes.

/// Cursor over a template, tracking the current line for diagnostics.
///
/// The cursor is [`Copy`], so callers can snapshot it before a tentative read.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    /// Current read position (byte index into `source`).
    pos: usize,
    /// 1-based line of `pos`.
    line: u32,
    /// Byte index where the current line starts.
    line_start: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Returns the byte at the current position, or `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    /// Returns the byte one position ahead of current, or `0x00` past EOF.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    fn byte_at(&self, index: usize) -> u8 {
        self.source.as_bytes().get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Advance one byte, recording line breaks.
    #[inline]
    pub fn advance(&mut self) {
        if self.current() == b'\n' {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the current position, counted in characters.
    pub fn column(&self) -> u32 {
        let end = self.pos.min(self.source.len());
        let count = self
            .source
            .get(self.line_start..end)
            .map_or(0, |s| s.chars().count());
        u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1)
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Slice between two byte positions.
    ///
    /// Both positions must lie on character boundaries; an out-of-range or
    /// misaligned request yields the empty string.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or_default()
    }

    /// Slice from `start` to the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Skip to the next `{` or `}` (or EOF) and return the byte found there.
    ///
    /// Uses `memchr2` for the search and `memchr_iter` to keep the line
    /// counter in step with the skipped region.
    pub fn skip_to_brace(&mut self) -> u8 {
        let remaining = &self.source.as_bytes()[self.pos.min(self.source.len())..];
        let skip = memchr::memchr2(b'{', b'}', remaining).unwrap_or(remaining.len());
        let skipped = &remaining[..skip];
        if let Some(last) = memchr::memrchr(b'\n', skipped) {
            let breaks = memchr::memchr_iter(b'\n', skipped).count();
            self.line += u32::try_from(breaks).unwrap_or(u32::MAX);
            self.line_start = self.pos + last + 1;
        }
        self.pos += skip;
        self.current()
    }
}
