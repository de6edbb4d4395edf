//! Member resolution over runtime values.
//!
//! A bind expression like `order.customer.name` is resolved one segment at a
//! time through a [`MemberResolver`]. The default resolver understands maps,
//! host [`Object`](crate::Object)s, numeric list indexes and the `len`
//! pseudo-member; hosts with other conventions plug in their own resolver.

use crate::errors::{no_such_member, MergeResult};
use crate::value::Value;

/// How absent members are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemberMode {
    /// An absent member aborts the merge with `NoSuchMember`.
    #[default]
    Strict,
    /// An absent member resolves to `Null` and renders as nothing.
    Lenient,
}

impl MemberMode {
    #[inline]
    pub fn is_strict(self) -> bool {
        matches!(self, MemberMode::Strict)
    }
}

/// Capability: look up one member segment on a value.
pub trait MemberResolver: Send + Sync {
    /// Return the member named `segment`, or `None` if `value` has none.
    fn member(&self, value: &Value, segment: &str) -> Option<Value>;
}

/// Map keys, object members, list/string indexes and `len`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResolver;

impl MemberResolver for DefaultResolver {
    fn member(&self, value: &Value, segment: &str) -> Option<Value> {
        match value {
            Value::Map(entries) => entries.get(segment).cloned().or_else(|| {
                (segment == "len").then(|| Value::U64(entries.len() as u64))
            }),
            Value::Object(object) => object.member(segment),
            Value::List(items) => {
                if segment == "len" {
                    return Some(Value::U64(items.len() as u64));
                }
                segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned())
            }
            Value::Str(s) => {
                if segment == "len" {
                    return Some(Value::U64(s.chars().count() as u64));
                }
                segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(Value::Char)
            }
            _ => None,
        }
    }
}

/// Resolve a dotted `path` against `value`.
///
/// An empty path is the value itself. In lenient mode a missing segment (or a
/// null intermediate) short-circuits to `Null`.
pub fn resolve_path(
    resolver: &dyn MemberResolver,
    value: &Value,
    path: &str,
    mode: MemberMode,
) -> MergeResult<Value> {
    if path.is_empty() {
        return Ok(value.clone());
    }
    let mut current = value.clone();
    for segment in path.split('.') {
        match resolver.member(&current, segment) {
            Some(next) => current = next,
            None if mode.is_strict() => {
                return Err(no_such_member(path, segment, current.type_name()));
            }
            None => return Ok(Value::Null),
        }
    }
    Ok(current)
}
