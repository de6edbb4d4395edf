//! Function registry and typed argument coercion.
//!
//! Functions are called from bind expressions as `(arg, ...) => Name`.
//! Each registered function declares one [`ParamType`] per parameter, and
//! every argument token is coerced against it:
//!
//! - quoted text parses as the parameter type (string, char, date-time)
//! - `true`/`false` is a boolean
//! - a numeric literal parses as exactly the parameter type, or as its suffix
//! - anything else is a bind expression, resolved and then type-checked
//!
//! Registration takes ordinary Rust closures through [`IntoFunction`]:
//!
//! ```text
//! registry.register("Add", |a: i64, b: i64| a + b)?;
//! ```

// Arc shares one function between the registry and in-flight calls
#![allow(
    clippy::disallowed_types,
    reason = "Arc shares registered functions with pending calls"
)]

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use stencil_value::{
    duplicate_function, function_arity_mismatch, function_not_found, is_numeric_start,
    malformed_function, parse_bool, wrong_argument_type, Decimal, MergeResult, NaiveDateTime,
    ParamType, Value,
};

use crate::resolver::BindContext;

/// Native callable behind a registered function.
pub type NativeFn = dyn Fn(&[Value]) -> MergeResult<Value> + Send + Sync;

/// Argument storage; most calls take a handful of arguments.
type ArgValues = SmallVec<[Value; 4]>;

/// A registered function: declared parameter types plus its invoker.
pub struct Function {
    params: Vec<ParamType>,
    invoke: Box<NativeFn>,
}

impl Function {
    /// Build a function from explicit parameter types.
    ///
    /// `invoke` receives arguments already coerced and checked against `params`.
    pub fn new(
        params: Vec<ParamType>,
        invoke: impl Fn(&[Value]) -> MergeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params,
            invoke: Box::new(invoke),
        }
    }

    #[inline]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Native argument type with a declared [`ParamType`].
pub trait FromValue: Sized {
    const PARAM: ParamType;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $param:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const PARAM: ParamType = ParamType::$param;

                #[inline]
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$param(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    NaiveDateTime => DateTime,
}

impl FromValue for String {
    const PARAM: ParamType = ParamType::String;

    fn from_value(value: Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for Value {
    const PARAM: ParamType = ParamType::Any;

    #[inline]
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Conversion of a native closure into a [`Function`].
///
/// Implemented for `Fn` closures of up to six [`FromValue`] parameters whose
/// result converts into a [`Value`]. `Args` is the parameter tuple and only
/// exists to keep the arity impls apart.
pub trait IntoFunction<Args>: Send + Sync + 'static {
    fn into_function(self, name: &str) -> Function;
}

fn take<T: FromValue>(name: &str, args: &[Value], index: &mut usize) -> MergeResult<T> {
    let value = args.get(*index).cloned().unwrap_or_default();
    let got = value.type_name().to_string();
    let arg = T::from_value(value)
        .ok_or_else(|| wrong_argument_type(name, *index, T::PARAM.name(), &got));
    *index += 1;
    arg
}

macro_rules! impl_into_function {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> IntoFunction<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Into<Value>,
            $($arg: FromValue,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables, reason = "macro-generated arity impls")]
            fn into_function(self, name: &str) -> Function {
                let name = name.to_string();
                Function::new(vec![$($arg::PARAM),*], move |args: &[Value]| {
                    let mut index = 0usize;
                    $(let $arg = take::<$arg>(&name, args, &mut index)?;)*
                    Ok(self($($arg),*).into())
                })
            }
        }
    };
}

impl_into_function!();
impl_into_function!(A);
impl_into_function!(A, B);
impl_into_function!(A, B, C);
impl_into_function!(A, B, C, D);
impl_into_function!(A, B, C, D, E);
impl_into_function!(A, B, C, D, E, G);

/// A resolved call, ready to run.
///
/// Produced by [`FunctionRegistry::resolve`] with every argument coerced;
/// the function itself does not run until [`invoke`](Call::invoke).
#[derive(Debug)]
pub struct Call {
    name: String,
    function: Arc<Function>,
    args: ArgValues,
}

impl Call {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn invoke(self) -> MergeResult<Value> {
        tracing::trace!(function = %self.name, args = self.args.len(), "invoke");
        (self.function.invoke)(&self.args)
    }
}

/// Functions callable from templates, by name.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<Function>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native closure under `name`.
    pub fn register<Args, F: IntoFunction<Args>>(
        &mut self,
        name: &str,
        function: F,
    ) -> MergeResult<()> {
        let function = function.into_function(name);
        self.insert(name, function)
    }

    /// Register a prebuilt [`Function`] under `name`.
    pub fn insert(&mut self, name: &str, function: Function) -> MergeResult<()> {
        if self.functions.contains_key(name) {
            return Err(duplicate_function(name));
        }
        tracing::debug!(function = name, arity = function.arity(), "register function");
        self.functions.insert(name.to_string(), Arc::new(function));
        Ok(())
    }

    /// Remove `name`, reporting whether it was registered.
    pub fn deregister(&mut self, name: &str) -> bool {
        let removed = self.functions.remove(name).is_some();
        tracing::debug!(function = name, removed, "deregister function");
        removed
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name).map(|f| &**f)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Parse `(args) => Name` and coerce its arguments.
    pub(crate) fn resolve(&self, expr: &str, bind: &BindContext<'_>) -> MergeResult<Call> {
        let Some(arrow) = find_arrow(expr) else {
            return Err(malformed_function(expr, "missing `=>`"));
        };
        let arg_list = expr[..arrow].trim();
        let name = expr[arrow + 2..].trim();
        if name.is_empty() {
            return Err(malformed_function(expr, "missing function name"));
        }
        let Some(inner) = arg_list
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return Err(malformed_function(expr, "arguments must be parenthesized"));
        };

        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| function_not_found(name))?;
        let tokens = split_arguments(expr, inner)?;
        if tokens.len() != function.arity() {
            return Err(function_arity_mismatch(name, function.arity(), tokens.len()));
        }

        let args = tokens
            .iter()
            .zip(function.params())
            .enumerate()
            .map(|(index, (token, &param))| coerce(name, index, token, param, bind))
            .collect::<MergeResult<ArgValues>>()?;

        Ok(Call {
            name: name.to_string(),
            function,
            args,
        })
    }
}

/// Coerce one argument token to `param`.
fn coerce(
    name: &str,
    index: usize,
    token: &str,
    param: ParamType,
    bind: &BindContext<'_>,
) -> MergeResult<Value> {
    let value = if token.starts_with(['"', '\'']) {
        param.coerce_quoted(token)?
    } else if let Some(b) = parse_bool(token) {
        Value::Bool(b)
    } else if is_numeric_start(token) {
        param.coerce_numeric(token)?
    } else {
        bind.resolve(token)?
    };
    if !param.accepts(&value) {
        return Err(wrong_argument_type(name, index, param.name(), value.type_name()));
    }
    Ok(value)
}

/// Byte index of the first `=>` outside quotes and parentheses.
pub(crate) fn find_arrow(expr: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut quote: Option<u8> = None;
    let mut parens = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b'=' if parens == 0 && bytes.get(i + 1) == Some(&b'>') => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Split an argument list on top-level commas.
///
/// Commas inside quotes or nested parentheses do not split.
fn split_arguments<'a>(expr: &str, inner: &'a str) -> MergeResult<SmallVec<[&'a str; 4]>> {
    let mut tokens = SmallVec::new();
    if inner.trim().is_empty() {
        return Ok(tokens);
    }

    let bytes = inner.as_bytes();
    let mut quote: Option<u8> = None;
    let mut parens = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => parens += 1,
                b')' if parens == 0 => {
                    return Err(malformed_function(expr, "unbalanced parentheses"));
                }
                b')' => parens -= 1,
                b',' if parens == 0 => {
                    tokens.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    if quote.is_some() {
        return Err(malformed_function(expr, "unterminated string"));
    }
    if parens != 0 {
        return Err(malformed_function(expr, "unbalanced parentheses"));
    }
    tokens.push(&inner[start..]);

    for token in &mut tokens {
        *token = token.trim();
        if token.is_empty() {
            return Err(malformed_function(expr, "empty argument"));
        }
    }
    Ok(tokens)
}
