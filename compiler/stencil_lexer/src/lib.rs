#![allow(
    clippy::result_large_err,
    reason = "MergeError carries its breadcrumb trail by value"
)]
//! Stencil Lexer - tokenization of template text.
//!
//! Template text is literal content interleaved with brace-delimited tags:
//!
//! - [`Scanner`] walks the template, producing literal runs (with `{{`/`}}`
//!   unescaped) and isolated tag tokens.
//! - [`Tag`] classifies one tag token into a [`TagKind`] plus trim markers
//!   and exposes its bind expression.
//! - [`match_block`] consumes the scanner up to the correctly nested end tag
//!   of a block directive.
//! - [`trim_line_end`] / [`trim_line_start`] implement trim markers.
//!
//! The lexer never resolves values; everything here is pure text handling.

mod block;
mod cursor;
mod scanner;
mod tag;
mod trim;

pub use block::{match_block, Block};
pub use cursor::Cursor;
pub use scanner::{RawTag, Scanner, Token};
pub use tag::{is_identifier, split_assignment, Tag, TagKind, Trim};
pub use trim::{trim_line_end, trim_line_start};
