//! Block matching.
//!
//! Given a block opener already read from a [`Scanner`], consume tokens up to
//! its matching end tag. Openers of the same kind nest; every other tag is
//! left in the body untouched, to be scanned again when the body is rendered.

use stencil_value::{invalid_tag, unmatched_block_end, MergeResult};

use crate::scanner::{Scanner, Token};
use crate::tag::Tag;

/// The text between a matched opener and its end tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block<'a> {
    /// Verbatim source between the tags, escapes and all.
    pub body: &'a str,
    /// The end tag, for its trim markers.
    pub close: Tag,
}

/// Consume `scanner` through the end tag that matches `open`.
///
/// `open` must be the tag the scanner returned last.
pub fn match_block<'a>(scanner: &mut Scanner<'a>, open: &Tag) -> MergeResult<Block<'a>> {
    let Some(end_kind) = open.kind().end_kind() else {
        return Err(invalid_tag(open.raw(), "not a block directive"));
    };
    let body_start = scanner.pos();
    let mut depth = 1usize;

    while let Some(token) = scanner.next_token()? {
        let Token::Tag(raw) = token else {
            continue;
        };
        let offset = raw.offset;
        let tag = Tag::parse(raw.text)?;
        if tag.kind() == open.kind() {
            depth += 1;
        } else if tag.kind() == end_kind {
            depth -= 1;
            if depth == 0 {
                tracing::trace!(open = open.raw(), body_len = offset - body_start, "matched block");
                return Ok(Block {
                    body: scanner.source().get(body_start..offset).unwrap_or_default(),
                    close: tag,
                });
            }
        }
    }

    let expected = format!("{{#/{}}}", open.kind().directive().unwrap_or_default());
    Err(unmatched_block_end(open.raw(), &expected))
}
