#![allow(
    clippy::result_large_err,
    reason = "MergeError carries its breadcrumb trail by value"
)]
//! Stencil Value - runtime data model for the stencil template engine.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, the `Object` host capability)
//! - Member resolution over values (`MemberResolver`, `resolve_path`)
//! - Literal parsing and typed coercion (`ParamType`)
//! - Merge error types (`MergeError`, `ErrorKind`, `ContextStack`)
//!
//! # Value Types
//!
//! Heap payloads are reference counted and only constructible through the
//! `Value::` factory methods, so cloning a value while walking scopes or
//! binding loop items never copies strings, lists or maps.

mod errors;
mod literal;
mod member;
mod value;

pub use errors::{Breadcrumb, ContextStack, ErrorKind, MergeError, MergeResult};
pub use literal::{is_numeric_start, parse_bool, parse_literal, parse_number, unquote, ParamType};
pub use member::{resolve_path, DefaultResolver, MemberMode, MemberResolver};
pub use value::{Heap, Object, Value};

// Re-export error constructors for use by other crates
pub use errors::{
    duplicate_function, function_arity_mismatch, function_not_found, invalid_tag,
    literal_parse_failure, malformed_function, no_such_member, non_enumerable,
    partial_not_string, scope_chain_overreach, stack_depth_exceeded, unclosed_tag,
    undeclared_variable_access, undeclared_variable_update, unescaped_close_marker,
    unmatched_block_end, wrong_argument_type,
};

// Scalar payload types appearing in `Value`
pub use chrono::NaiveDateTime;
pub use rust_decimal::Decimal;
