#![allow(
    clippy::result_large_err,
    reason = "MergeError carries its breadcrumb trail by value"
)]
//! Stencil Eval - the template interpreter.
//!
//! # Architecture
//!
//! - [`Engine`]: a template plus options, functions and a member resolver
//! - `ScopeChain`: one frame per bound value, each with its variable store
//! - `BindContext`: resolves bind expressions against the scope chain
//! - [`FunctionRegistry`]: typed native functions called as `(args) => Name`
//!
//! ```text
//! stencil_eval::init_tracing();
//! let mut engine = Engine::new("{#each lines}{$.qty} x {$.item}\n{#/each}");
//! engine.register("Add", |a: i64, b: i64| a + b)?;
//! let text = engine.merge(&order)?;
//! ```
//!
//! # Re-exports
//!
//! Value and error types come from `stencil_value` so hosts depend on this
//! crate alone.

mod environment;
mod function;
mod interpreter;
mod options;
mod resolver;

use std::sync::Once;

pub use environment::{ScopeChain, ScopeLink, VariableStore};
pub use function::{Call, FromValue, Function, FunctionRegistry, IntoFunction, NativeFn};
pub use interpreter::{Engine, EngineBuilder};
pub use options::{MergeOptions, DEFAULT_MAX_DEPTH};
pub use resolver::BindContext;

pub use stencil_value::{
    Breadcrumb, ContextStack, DefaultResolver, ErrorKind, Heap, MemberMode, MemberResolver,
    MergeError, MergeResult, Object, ParamType, Value,
};

/// Merge `template` against `value` with default options.
pub fn merge(template: &str, value: &Value) -> MergeResult<String> {
    Engine::new(template).merge(value)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only ever runs once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
