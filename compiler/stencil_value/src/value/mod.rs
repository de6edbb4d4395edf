//! Runtime values bound into templates.
//!
//! # Heap Enforcement
//!
//! Strings, lists and maps are shared through `Heap<T>`, whose constructor is
//! private to this module. Build them with the factory methods:
//!
//! ```text
//! let s = Value::string("hello");                 // OK
//! let items = Value::list(vec![Value::I64(1)]);   // OK
//! let s = Value::Str(Heap::new(...));             // ERROR: Heap::new is pub(super)
//! ```
//!
//! # Numeric Widths
//!
//! Every primitive width is its own variant. Registered functions declare
//! exact parameter types and values are never widened implicitly, so an `I32`
//! does not satisfy an `i64` parameter.

mod convert;
mod heap;
mod object;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::literal::ParamType;

pub use heap::Heap;
pub use object::Object;

/// Render format for date-time values.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Runtime value in a template merge.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; renders as the empty string.
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),

    // Heap Types
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    /// Insertion-ordered map from string keys to values.
    Map(Heap<IndexMap<String, Value>>),
    /// Host record exposing members by name.
    Object(Heap<dyn Object>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value.
    #[inline]
    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create a map value from key/value pairs, keeping their order.
    pub fn map_from<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap a host record.
    #[inline]
    pub fn object(object: impl Object + 'static) -> Self {
        let shared: Arc<dyn Object> = Arc::new(object);
        Value::Object(Heap::from_arc(shared))
    }

    /// Wrap an already shared host record.
    #[inline]
    pub fn shared_object(object: Arc<dyn Object>) -> Self {
        Value::Object(Heap::from_arc(object))
    }
}

impl Value {
    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(o) => o.type_name(),
            _ => self.param_type().map_or("unknown", ParamType::name),
        }
    }

    /// The exact parameter type this value satisfies, if it is a scalar.
    ///
    /// Lists, maps, objects and null only satisfy `ParamType::Any`.
    pub fn param_type(&self) -> Option<ParamType> {
        let ty = match self {
            Value::Bool(_) => ParamType::Bool,
            Value::Char(_) => ParamType::Char,
            Value::I8(_) => ParamType::I8,
            Value::I16(_) => ParamType::I16,
            Value::I32(_) => ParamType::I32,
            Value::I64(_) => ParamType::I64,
            Value::U8(_) => ParamType::U8,
            Value::U16(_) => ParamType::U16,
            Value::U32(_) => ParamType::U32,
            Value::U64(_) => ParamType::U64,
            Value::F32(_) => ParamType::F32,
            Value::F64(_) => ParamType::F64,
            Value::Decimal(_) => ParamType::Decimal,
            Value::DateTime(_) => ParamType::DateTime,
            Value::Str(_) => ParamType::String,
            Value::Null | Value::List(_) | Value::Map(_) | Value::Object(_) => return None,
        };
        Some(ty)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Template truthiness.
    ///
    /// Null, `false`, numeric zero of any width, the NUL character and empty
    /// enumerables (including the empty string) are false. Everything else,
    /// date-times and non-enumerable objects included, is true.
    #[allow(clippy::float_cmp, reason = "exact zero is the false value")]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Char(c) => *c != '\0',
            Value::I8(n) => *n != 0,
            Value::I16(n) => *n != 0,
            Value::I32(n) => *n != 0,
            Value::I64(n) => *n != 0,
            Value::U8(n) => *n != 0,
            Value::U16(n) => *n != 0,
            Value::U32(n) => *n != 0,
            Value::U64(n) => *n != 0,
            Value::F32(f) => *f != 0.0,
            Value::F64(f) => *f != 0.0,
            Value::Decimal(d) => !d.is_zero(),
            Value::DateTime(_) => true,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object(o) => o.items().map_or(true, |items| !items.is_empty()),
        }
    }

    /// Items visited by `#each`, or `None` if the value is not enumerable.
    ///
    /// Strings enumerate their characters; maps enumerate `{key, value}`
    /// entry maps in insertion order.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.to_vec()),
            Value::Str(s) => Some(s.chars().map(Value::Char).collect()),
            Value::Map(entries) => Some(
                entries
                    .iter()
                    .map(|(k, v)| {
                        Value::map_from([("key", Value::string(k.as_str())), ("value", v.clone())])
                    })
                    .collect(),
            ),
            Value::Object(o) => o.items(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::I8(n) => write!(f, "I8({n})"),
            Value::I16(n) => write!(f, "I16({n})"),
            Value::I32(n) => write!(f, "I32({n})"),
            Value::I64(n) => write!(f, "I64({n})"),
            Value::U8(n) => write!(f, "U8({n})"),
            Value::U16(n) => write!(f, "U16({n})"),
            Value::U32(n) => write!(f, "U32({n})"),
            Value::U64(n) => write!(f, "U64({n})"),
            Value::F32(n) => write!(f, "F32({n:?})"),
            Value::F64(n) => write!(f, "F64({n:?})"),
            Value::Decimal(d) => write!(f, "Decimal({d})"),
            Value::DateTime(dt) => write!(f, "DateTime({dt})"),
            Value::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
            Value::Object(o) => write!(f, "Object({o:?})"),
        }
    }
}

/// The rendered form of a value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::I8(n) => write!(f, "{n}"),
            Value::I16(n) => write!(f, "{n}"),
            Value::I32(n) => write!(f, "{n}"),
            Value::I64(n) => write!(f, "{n}"),
            Value::U8(n) => write!(f, "{n}"),
            Value::U16(n) => write!(f, "{n}"),
            Value::U32(n) => write!(f, "{n}"),
            Value::U64(n) => write!(f, "{n}"),
            Value::F32(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Object(o) => write!(f, "{}", o.type_name()),
        }
    }
}

#[cfg(test)]
mod tests;
