//! Template scanner: literal runs and isolated tag tokens.
//!
//! # Escaping
//!
//! Outside tags, `{{` and `}}` each produce one literal brace. A single `{`
//! opens a tag; a single `}` is an error.
//!
//! # Tag Capture
//!
//! Inside a tag, quoted text (`'...'` or `"..."`, backslash escapes honored)
//! is kept verbatim. Whitespace outside quotes is dropped from the captured
//! text. Braces nest, so `{(x) => F}` and `{!a {b} c}` are one tag each; the
//! tag ends at the `}` that brings the nesting back to zero. Comment tags
//! (`{!` or `{-!`/`{+!`) skip quote tracking so prose apostrophes are harmless.

use std::borrow::Cow;

use stencil_value::{unclosed_tag, unescaped_close_marker, MergeResult};

use crate::cursor::Cursor;

/// Longest tag excerpt carried by an `UnclosedTag` error.
const EXCERPT_CHARS: usize = 40;

/// One tag exactly as found in the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTag<'a> {
    /// Captured text, braces included, whitespace outside quotes removed.
    pub text: String,
    /// The verbatim source slice the tag was captured from.
    pub source: &'a str,
    /// Byte offset of the opening brace.
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl RawTag<'_> {
    /// Byte offset one past the closing brace.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.source.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal content with brace escapes resolved.
    Text(Cow<'a, str>),
    Tag(RawTag<'a>),
}

/// Pull-based scanner over one template.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Byte offset of the next unread character.
    #[inline]
    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> MergeResult<Option<Token<'a>>> {
        if self.cursor.is_eof() {
            return Ok(None);
        }
        if let Some(text) = self.scan_text()? {
            return Ok(Some(Token::Text(text)));
        }
        if self.cursor.is_eof() {
            return Ok(None);
        }
        self.scan_tag().map(|tag| Some(Token::Tag(tag)))
    }

    /// Consume literal content up to the next tag opener.
    ///
    /// Returns `None` when the cursor already sits on a tag.
    fn scan_text(&mut self) -> MergeResult<Option<Cow<'a, str>>> {
        let start = self.cursor.pos();
        let mut run_start = start;
        let mut owned: Option<String> = None;

        loop {
            match self.cursor.skip_to_brace() {
                b'{' if self.cursor.peek() == b'{' => {}
                b'}' if self.cursor.peek() == b'}' => {}
                b'}' => return Err(unescaped_close_marker()),
                // `{` opening a tag, or EOF
                _ => break,
            }
            // Escaped brace: keep the text so far plus one brace.
            let buf = owned.get_or_insert_with(String::new);
            buf.push_str(self.cursor.slice(run_start, self.cursor.pos() + 1));
            self.cursor.advance_n(2);
            run_start = self.cursor.pos();
        }

        let text = match owned {
            Some(mut buf) => {
                buf.push_str(self.cursor.slice_from(run_start));
                Cow::Owned(buf)
            }
            None if self.cursor.pos() == start => return Ok(None),
            None => Cow::Borrowed(self.cursor.slice_from(start)),
        };
        Ok(Some(text))
    }

    /// Capture one tag. The cursor sits on its opening `{`.
    fn scan_tag(&mut self) -> MergeResult<RawTag<'a>> {
        let offset = self.cursor.pos();
        let line = self.cursor.line();
        let column = self.cursor.column();

        self.cursor.advance();
        let comment = match self.cursor.current() {
            b'!' => true,
            b'+' | b'-' => self.cursor.peek() == b'!',
            _ => false,
        };

        let mut text = String::from("{");
        let mut run_start = self.cursor.pos();
        let mut depth = 1usize;
        let mut quote: Option<u8> = None;

        loop {
            if self.cursor.is_eof() {
                return Err(unclosed_tag(&excerpt(self.cursor.slice_from(offset))));
            }
            let b = self.cursor.current();

            if let Some(q) = quote {
                if b == b'\\' {
                    self.cursor.advance();
                } else if b == q {
                    quote = None;
                }
                self.cursor.advance();
                continue;
            }

            match b {
                b'"' | b'\'' if !comment => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor.advance();
                        break;
                    }
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    text.push_str(self.cursor.slice_from(run_start));
                    self.cursor.advance();
                    run_start = self.cursor.pos();
                    continue;
                }
                _ => {}
            }
            self.cursor.advance();
        }

        text.push_str(self.cursor.slice_from(run_start));
        Ok(RawTag {
            text,
            source: self.cursor.slice_from(offset),
            offset,
            line,
            column,
        })
    }
}

fn excerpt(source: &str) -> String {
    match source.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &source[..cut]),
        None => source.to_string(),
    }
}
