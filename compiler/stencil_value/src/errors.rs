//! Error types for template merging.
//!
//! Every failure aborts the whole merge. `ErrorKind` carries the structured
//! data for one failure; `MergeError` pairs it with the breadcrumb trail that
//! each nested renderer appends while the error travels outward, so the error
//! surfaced to the caller names every sub-template between the failing tag and
//! the top-level call.
//!
//! Factory functions (e.g. `unclosed_tag()`) are the public way to build
//! errors; they keep message wording in one place.

use std::fmt;

/// Result of a merge step.
pub type MergeResult<T> = Result<T, MergeError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    // Scanning
    #[error("unclosed tag: `{tag}` has no terminating `}}`")]
    UnclosedTag { tag: String },
    #[error("unescaped close marker in content (write `}}}}` for a literal `}}`)")]
    UnescapedCloseMarker,
    #[error("end tag `{expected}` never found for `{tag}`")]
    UnmatchedBlockEnd { tag: String, expected: String },
    #[error("invalid tag `{tag}`: {reason}")]
    InvalidTag { tag: String, reason: String },

    // Rendering
    #[error("stack depth overflow: partial nesting exceeds {limit}")]
    StackDepthExceeded { limit: usize },
    #[error("`{expr}` is bound to non-enumerable {type_name}")]
    NonEnumerableIterationTarget { expr: String, type_name: String },
    #[error("partial `{tag}` resolved to {type_name} `{value}`, expected a template string")]
    PartialTargetNotString {
        tag: String,
        type_name: String,
        value: String,
    },

    // Variables and scopes
    #[error("access to undeclared variable `{name}`")]
    UndeclaredVariableAccess { name: String },
    #[error("update of undeclared variable `{name}`")]
    UndeclaredVariableUpdate { name: String },
    #[error("scope walk of {requested} exceeds scope chain depth {depth}")]
    ScopeChainOverreach { requested: usize, depth: usize },
    #[error("no member `{segment}` on {type_name} (in path `{path}`)")]
    NoSuchMember {
        path: String,
        segment: String,
        type_name: String,
    },

    // Functions
    #[error("malformed function expression `{expr}`: {reason}")]
    MalformedFunctionExpression { expr: String, reason: String },
    #[error("function not found: `{name}`")]
    FunctionNotFound { name: String },
    #[error("function `{name}` expects {expected} {}, got {got}", plural(.expected))]
    FunctionArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("function `{name}` argument {index}: expected {expected}, got {got}")]
    FunctionArgumentTypeMismatch {
        name: String,
        index: usize,
        expected: String,
        got: String,
    },
    #[error("cannot parse literal `{literal}` as {target}")]
    LiteralParseFailure { literal: String, target: String },
    #[error("function `{name}` is already registered")]
    DuplicateFunctionRegistration { name: String },
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes fields by reference"
)]
fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        "argument"
    } else {
        "arguments"
    }
}

/// One location in the render call tree an error passed through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breadcrumb {
    /// 1-based line of the tag within its template.
    pub line: u32,
    /// 1-based column of the tag within its line.
    pub column: u32,
    /// Byte offset of the tag within its template.
    pub offset: usize,
    /// Raw text of the last tag handled by that renderer.
    pub tag: String,
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {}) in `{}`",
            self.line, self.column, self.offset, self.tag
        )
    }
}

/// Breadcrumb trail collected while an error propagates outward.
///
/// Innermost renderer first. Purely diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextStack {
    frames: Vec<Breadcrumb>,
}

impl ContextStack {
    /// Get the breadcrumbs, innermost first.
    pub fn frames(&self) -> &[Breadcrumb] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Breadcrumb of the renderer where the error originated.
    pub fn innermost(&self) -> Option<&Breadcrumb> {
        self.frames.first()
    }
}

impl fmt::Display for ContextStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        write!(f, "\nmerge context:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "\n  {i}: {frame}")?;
        }
        Ok(())
    }
}

/// A failed merge.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{context}")]
pub struct MergeError {
    kind: ErrorKind,
    context: ContextStack,
}

impl MergeError {
    /// The structured error category.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Breadcrumbs accumulated on the way out.
    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    /// Append the breadcrumb of the renderer this error is leaving.
    #[must_use]
    pub fn with_breadcrumb(mut self, breadcrumb: Breadcrumb) -> Self {
        self.context.frames.push(breadcrumb);
        self
    }
}

impl From<ErrorKind> for MergeError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: ContextStack::default(),
        }
    }
}

// Scanning Errors

#[cold]
pub fn unclosed_tag(tag: &str) -> MergeError {
    ErrorKind::UnclosedTag {
        tag: tag.to_string(),
    }
    .into()
}

#[cold]
pub fn unescaped_close_marker() -> MergeError {
    ErrorKind::UnescapedCloseMarker.into()
}

#[cold]
pub fn unmatched_block_end(tag: &str, expected: &str) -> MergeError {
    ErrorKind::UnmatchedBlockEnd {
        tag: tag.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

#[cold]
pub fn invalid_tag(tag: &str, reason: &str) -> MergeError {
    ErrorKind::InvalidTag {
        tag: tag.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// Rendering Errors

#[cold]
pub fn stack_depth_exceeded(limit: usize) -> MergeError {
    ErrorKind::StackDepthExceeded { limit }.into()
}

#[cold]
pub fn non_enumerable(expr: &str, type_name: &str) -> MergeError {
    ErrorKind::NonEnumerableIterationTarget {
        expr: expr.to_string(),
        type_name: type_name.to_string(),
    }
    .into()
}

/// Longest rendered value quoted in a partial error.
const VALUE_EXCERPT_CHARS: usize = 40;

#[cold]
pub fn partial_not_string(tag: &str, type_name: &str, value: &str) -> MergeError {
    let mut excerpt: String = value.chars().take(VALUE_EXCERPT_CHARS).collect();
    if excerpt.len() < value.len() {
        excerpt.push_str("...");
    }
    ErrorKind::PartialTargetNotString {
        tag: tag.to_string(),
        type_name: type_name.to_string(),
        value: excerpt,
    }
    .into()
}

// Variable and Scope Errors

#[cold]
pub fn undeclared_variable_access(name: &str) -> MergeError {
    ErrorKind::UndeclaredVariableAccess {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn undeclared_variable_update(name: &str) -> MergeError {
    ErrorKind::UndeclaredVariableUpdate {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn scope_chain_overreach(requested: usize, depth: usize) -> MergeError {
    ErrorKind::ScopeChainOverreach { requested, depth }.into()
}

#[cold]
pub fn no_such_member(path: &str, segment: &str, type_name: &str) -> MergeError {
    ErrorKind::NoSuchMember {
        path: path.to_string(),
        segment: segment.to_string(),
        type_name: type_name.to_string(),
    }
    .into()
}

// Function Errors

#[cold]
pub fn malformed_function(expr: &str, reason: &str) -> MergeError {
    ErrorKind::MalformedFunctionExpression {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cold]
pub fn function_not_found(name: &str) -> MergeError {
    ErrorKind::FunctionNotFound {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn function_arity_mismatch(name: &str, expected: usize, got: usize) -> MergeError {
    ErrorKind::FunctionArityMismatch {
        name: name.to_string(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn wrong_argument_type(name: &str, index: usize, expected: &str, got: &str) -> MergeError {
    ErrorKind::FunctionArgumentTypeMismatch {
        name: name.to_string(),
        index,
        expected: expected.to_string(),
        got: got.to_string(),
    }
    .into()
}

#[cold]
pub fn literal_parse_failure(literal: &str, target: &str) -> MergeError {
    ErrorKind::LiteralParseFailure {
        literal: literal.to_string(),
        target: target.to_string(),
    }
    .into()
}

#[cold]
pub fn duplicate_function(name: &str) -> MergeError {
    ErrorKind::DuplicateFunctionRegistration {
        name: name.to_string(),
    }
    .into()
}
