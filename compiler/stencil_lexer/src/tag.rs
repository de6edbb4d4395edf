//! Tag classification.
//!
//! A captured tag such as `{-#each items+}` is split into an optional left
//! trim marker, a directive prefix, the bind expression and an optional
//! right trim marker:
//!
//! | prefix | kind |
//! |---|---|
//! | `!` | [`TagKind::Comment`] |
//! | `#if` `#each` `#with` | block openers |
//! | `#/if` `#/each` `#/with` | block closers |
//! | `>` | [`TagKind::Partial`] |
//! | `?` | [`TagKind::VarDeclare`] |
//! | `:` with `=` | [`TagKind::VarAssign`] |
//! | identifier with `=` | [`TagKind::VarDeclare`] |
//! | anything else | [`TagKind::Simple`] |
//!
//! A `-` or `+` directly after `{` is always a trim marker, never part of the
//! expression: `{-5}` renders `5` with left trimming. Negative literals go
//! where a tag cannot start with them, as in `{n=-5}` or `{(-5) => Abs}`.

use std::fmt;
use std::ops::Range;

use stencil_value::{invalid_tag, MergeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Simple,
    If,
    EndIf,
    Each,
    EndEach,
    With,
    EndWith,
    Partial,
    Comment,
    VarDeclare,
    VarAssign,
}

impl TagKind {
    /// The closing kind for a block opener.
    pub fn end_kind(self) -> Option<TagKind> {
        match self {
            TagKind::If => Some(TagKind::EndIf),
            TagKind::Each => Some(TagKind::EndEach),
            TagKind::With => Some(TagKind::EndWith),
            _ => None,
        }
    }

    #[inline]
    pub fn is_block_open(self) -> bool {
        self.end_kind().is_some()
    }

    #[inline]
    pub fn is_block_end(self) -> bool {
        matches!(self, TagKind::EndIf | TagKind::EndEach | TagKind::EndWith)
    }

    /// Directive name, for block kinds.
    pub fn directive(self) -> Option<&'static str> {
        match self {
            TagKind::If | TagKind::EndIf => Some("if"),
            TagKind::Each | TagKind::EndEach => Some("each"),
            TagKind::With | TagKind::EndWith => Some("with"),
            _ => None,
        }
    }
}

/// Per-side trim marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Trim {
    /// No marker; the engine's global flag decides.
    #[default]
    Unset,
    /// `-`: drop adjacent whitespace and one line break.
    Discard,
    /// `+`: keep adjacent whitespace even under the global flag.
    Retain,
}

impl Trim {
    fn from_marker(byte: u8) -> Option<Trim> {
        match byte {
            b'-' => Some(Trim::Discard),
            b'+' => Some(Trim::Retain),
            _ => None,
        }
    }

    /// Resolve against the global flag.
    #[inline]
    pub fn discards(self, global: bool) -> bool {
        match self {
            Trim::Discard => true,
            Trim::Retain => false,
            Trim::Unset => global,
        }
    }
}

/// A classified tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    kind: TagKind,
    trim_left: Trim,
    trim_right: Trim,
    raw: String,
    bind: Range<usize>,
}

impl Tag {
    /// Classify a captured tag. `raw` must include its braces.
    pub fn parse(raw: impl Into<String>) -> MergeResult<Tag> {
        let raw = raw.into();
        let bytes = raw.as_bytes();
        if bytes.len() < 2 || bytes[0] != b'{' || bytes[bytes.len() - 1] != b'}' {
            return Err(invalid_tag(&raw, "tag must be enclosed in braces"));
        }

        let mut start = 1;
        let mut end = bytes.len() - 1;
        let mut trim_left = Trim::Unset;
        let mut trim_right = Trim::Unset;
        if let Some(trim) = Trim::from_marker(bytes[start]) {
            if start < end {
                trim_left = trim;
                start += 1;
            }
        }
        if start < end {
            if let Some(trim) = Trim::from_marker(bytes[end - 1]) {
                trim_right = trim;
                end -= 1;
            }
        }

        let body = &raw[start..end];
        let (kind, skip) = classify(body).ok_or_else(|| invalid_tag(&raw, "unknown directive"))?;
        let bind = start + skip..end;

        let needs_expr = matches!(
            kind,
            TagKind::If
                | TagKind::Each
                | TagKind::With
                | TagKind::Partial
                | TagKind::Simple
                | TagKind::VarDeclare
        );
        if needs_expr && bind.is_empty() {
            return Err(invalid_tag(&raw, "missing expression"));
        }
        if kind.is_block_end() && !bind.is_empty() {
            return Err(invalid_tag(&raw, "end tag takes no expression"));
        }

        Ok(Tag {
            kind,
            trim_left,
            trim_right,
            raw,
            bind,
        })
    }

    #[inline]
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    #[inline]
    pub fn trim_left(&self) -> Trim {
        self.trim_left
    }

    #[inline]
    pub fn trim_right(&self) -> Trim {
        self.trim_right
    }

    /// The captured tag text, braces included.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The expression with braces, directive prefix and trim markers removed.
    ///
    /// For comments this is the comment text.
    #[inline]
    pub fn bind_as(&self) -> &str {
        self.raw.get(self.bind.clone()).unwrap_or_default()
    }

    /// Whether whitespace before the tag is discarded.
    ///
    /// The global flag only reaches directive tags; value tags need an
    /// explicit marker.
    #[inline]
    pub fn discards_left(&self, global: bool) -> bool {
        self.trim_left.discards(global && self.kind != TagKind::Simple)
    }

    /// Whether whitespace after the tag is discarded.
    #[inline]
    pub fn discards_right(&self, global: bool) -> bool {
        self.trim_right.discards(global && self.kind != TagKind::Simple)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns the kind and the length of its directive prefix.
fn classify(body: &str) -> Option<(TagKind, usize)> {
    const OPENERS: [(&str, TagKind); 3] = [
        ("#each", TagKind::Each),
        ("#with", TagKind::With),
        ("#if", TagKind::If),
    ];
    const CLOSERS: [(&str, TagKind); 3] = [
        ("#/each", TagKind::EndEach),
        ("#/with", TagKind::EndWith),
        ("#/if", TagKind::EndIf),
    ];

    match body.as_bytes().first() {
        Some(b'!') => Some((TagKind::Comment, 1)),
        Some(b'#') => CLOSERS
            .iter()
            .chain(OPENERS.iter())
            .find(|(prefix, _)| body.starts_with(prefix))
            .map(|&(prefix, kind)| (kind, prefix.len())),
        Some(b'>') => Some((TagKind::Partial, 1)),
        Some(b'?') => Some((TagKind::VarDeclare, 1)),
        Some(b':') if split_assignment(&body[1..]).is_some() => Some((TagKind::VarAssign, 1)),
        _ => match split_assignment(body) {
            Some((name, _)) if is_identifier(name) => Some((TagKind::VarDeclare, 0)),
            _ => Some((TagKind::Simple, 0)),
        },
    }
}

/// Split `name=expr` on the first top-level `=` that is not part of `=>`.
///
/// `=` inside quotes or parentheses does not count.
pub fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut parens = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b'=' if parens == 0 && bytes.get(i + 1) != Some(&b'>') => {
                    return Some((&text[..i], &text[i + 1..]));
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
