//! Host records exposed to templates.

use std::fmt;

use super::Value;

/// A host value whose members are reachable by name from bind expressions.
///
/// Implement this for application record types instead of converting them to
/// maps up front. Members are looked up lazily, one path segment at a time.
///
/// ```text
/// impl Object for Invoice {
///     fn type_name(&self) -> &str { "Invoice" }
///     fn member(&self, name: &str) -> Option<Value> {
///         match name {
///             "number" => Some(Value::from(self.number)),
///             "lines" => Some(Value::from(self.lines.clone())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// Name used in diagnostics and as the rendered text of the record.
    fn type_name(&self) -> &str;

    /// Look up a member, or `None` if the record has no such member.
    fn member(&self, name: &str) -> Option<Value>;

    /// Items for `#each`, or `None` if the record is not enumerable.
    fn items(&self) -> Option<Vec<Value>> {
        None
    }
}
