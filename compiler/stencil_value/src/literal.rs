//! Literal text and typed coercion.
//!
//! Bind expressions and function arguments are untyped text. This module
//! turns literal text into values, either untyped (variable declarations,
//! `{#if true}`) or driven by the declared parameter type of a registered
//! function.
//!
//! # Numeric Literals
//!
//! `[+-]digits[.digits][e[+-]digits][suffix]`, where the optional suffix is a
//! Rust-style width (`i8`..`i64`, `u8`..`u64`, `f32`, `f64`) or `m` for
//! decimal. Unsuffixed literals are `i64` when integral and `f64` otherwise,
//! unless a parameter type asks for something else.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::errors::{literal_parse_failure, MergeResult};
use crate::value::Value;

/// Parameter type declared by a registered function.
///
/// Closed set: one coercion rule per variant, selected by the signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    DateTime,
    /// Accepts any value unchanged.
    Any,
}

impl ParamType {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Bool => "bool",
            ParamType::Char => "char",
            ParamType::I8 => "i8",
            ParamType::I16 => "i16",
            ParamType::I32 => "i32",
            ParamType::I64 => "i64",
            ParamType::U8 => "u8",
            ParamType::U16 => "u16",
            ParamType::U32 => "u32",
            ParamType::U64 => "u64",
            ParamType::F32 => "f32",
            ParamType::F64 => "f64",
            ParamType::Decimal => "decimal",
            ParamType::DateTime => "datetime",
            ParamType::Any => "any",
        }
    }

    /// Whether `value` satisfies this type exactly.
    #[inline]
    pub fn accepts(self, value: &Value) -> bool {
        self == ParamType::Any || value.param_type() == Some(self)
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ParamType::I8
                | ParamType::I16
                | ParamType::I32
                | ParamType::I64
                | ParamType::U8
                | ParamType::U16
                | ParamType::U32
                | ParamType::U64
                | ParamType::F32
                | ParamType::F64
                | ParamType::Decimal
        )
    }

    /// Coerce a quoted token (quotes included) for this parameter.
    ///
    /// `Char` and `DateTime` parse the text; any other non-string target gets
    /// a string back and fails the caller's `accepts` check.
    pub fn coerce_quoted(self, token: &str) -> MergeResult<Value> {
        let Some(text) = unquote(token) else {
            return Err(literal_parse_failure(token, self.name()));
        };
        match self {
            ParamType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(literal_parse_failure(token, self.name())),
                }
            }
            ParamType::DateTime => parse_datetime(&text)
                .map(Value::DateTime)
                .ok_or_else(|| literal_parse_failure(token, self.name())),
            _ => Ok(Value::string(text)),
        }
    }

    /// Coerce a numeric token for this parameter.
    ///
    /// A suffixed literal keeps its suffix type. An unsuffixed literal is
    /// parsed as exactly this type and fails rather than widening. Non-numeric
    /// targets get the untyped value back and fail the caller's `accepts` check.
    pub fn coerce_numeric(self, token: &str) -> MergeResult<Value> {
        let (body, suffix) = split_suffix(token);
        if suffix.is_some() || !self.is_numeric() {
            return parse_number(token);
        }
        self.parse_exact(body)
            .ok_or_else(|| literal_parse_failure(token, self.name()))
    }

    fn parse_exact(self, body: &str) -> Option<Value> {
        match self {
            ParamType::I8 => body.parse().ok().map(Value::I8),
            ParamType::I16 => body.parse().ok().map(Value::I16),
            ParamType::I32 => body.parse().ok().map(Value::I32),
            ParamType::I64 => body.parse().ok().map(Value::I64),
            ParamType::U8 => body.parse().ok().map(Value::U8),
            ParamType::U16 => body.parse().ok().map(Value::U16),
            ParamType::U32 => body.parse().ok().map(Value::U32),
            ParamType::U64 => body.parse().ok().map(Value::U64),
            ParamType::F32 => body.parse().ok().map(Value::F32),
            ParamType::F64 => body.parse().ok().map(Value::F64),
            ParamType::Decimal => Decimal::from_str(body)
                .or_else(|_| Decimal::from_scientific(body))
                .ok()
                .map(Value::Decimal),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Suffixes, longest first so `i16` is not read as `i1` + `6`.
const SUFFIXES: [(&str, ParamType); 12] = [
    ("i16", ParamType::I16),
    ("i32", ParamType::I32),
    ("i64", ParamType::I64),
    ("u16", ParamType::U16),
    ("u32", ParamType::U32),
    ("u64", ParamType::U64),
    ("f32", ParamType::F32),
    ("f64", ParamType::F64),
    ("i8", ParamType::I8),
    ("u8", ParamType::U8),
    ("m", ParamType::Decimal),
    ("M", ParamType::Decimal),
];

fn split_suffix(token: &str) -> (&str, Option<ParamType>) {
    for (suffix, ty) in SUFFIXES {
        if let Some(body) = token.strip_suffix(suffix) {
            if body.ends_with(|c: char| c.is_ascii_digit() || c == '.') {
                return (body, Some(ty));
            }
        }
    }
    (token, None)
}

/// Whether `token` begins like a numeric literal: sign, digit or point,
/// followed by a digit when the first character is not one.
pub fn is_numeric_start(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'+' | b'-' | b'.') => match bytes.get(1) {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'.') => bytes.get(2).is_some_and(u8::is_ascii_digit),
            _ => false,
        },
        _ => false,
    }
}

/// Parse an untyped numeric literal, honoring a width suffix.
pub fn parse_number(token: &str) -> MergeResult<Value> {
    let (body, suffix) = split_suffix(token);
    if let Some(ty) = suffix {
        return ty
            .parse_exact(body)
            .ok_or_else(|| literal_parse_failure(token, ty.name()));
    }
    if body.contains(['.', 'e', 'E']) {
        return body
            .parse()
            .map(Value::F64)
            .map_err(|_| literal_parse_failure(token, "number"));
    }
    body.parse()
        .map(Value::I64)
        .or_else(|_| body.parse().map(Value::U64))
        .map_err(|_| literal_parse_failure(token, "number"))
}

/// Parse `true`/`false`, case-insensitively.
pub fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[inline]
fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('"') && token.ends_with('"'))
            || (token.starts_with('\'') && token.ends_with('\'')))
}

/// Strip matching quotes and resolve backslash escapes.
///
/// Returns `None` if `token` is not a quoted literal.
pub fn unquote(token: &str) -> Option<String> {
    if !is_quoted(token) {
        return None;
    }
    let inner = &token[1..token.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Some(out)
}

/// Parse an untyped literal: quoted string, boolean, `null` or number.
///
/// Returns `None` when `token` is not literal syntax at all, leaving it to
/// be resolved as a bind expression.
pub fn parse_literal(token: &str) -> Option<MergeResult<Value>> {
    if let Some(text) = unquote(token) {
        return Some(Ok(Value::string(text)));
    }
    if let Some(b) = parse_bool(token) {
        return Some(Ok(Value::Bool(b)));
    }
    if token == "null" {
        return Some(Ok(Value::Null));
    }
    if is_numeric_start(token) {
        return Some(parse_number(token));
    }
    None
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests;
