//! The template engine.
//!
//! An [`Engine`] holds one template, its [`MergeOptions`], the functions the
//! template may call and the member resolver used for host values. Merging
//! never mutates the engine; every [`Engine::merge`] call builds its own scope
//! chain, so one engine can serve many merges.

// Arc<dyn MemberResolver> is shared between clones of an engine
#![allow(
    clippy::disallowed_types,
    reason = "Arc<dyn MemberResolver> shared across engine clones"
)]

mod builder;
mod render;

use std::fmt;
use std::sync::Arc;

use stencil_value::{MemberResolver, MergeResult, Value};

use crate::function::{FunctionRegistry, IntoFunction};
use crate::options::MergeOptions;

pub use builder::EngineBuilder;
use render::Renderer;

/// A template ready to merge against data.
#[derive(Clone)]
pub struct Engine {
    template: String,
    options: MergeOptions,
    functions: FunctionRegistry,
    members: Arc<dyn MemberResolver>,
}

impl Engine {
    /// Engine with default options and no functions.
    pub fn new(template: impl Into<String>) -> Self {
        EngineBuilder::new(template).build()
    }

    pub fn builder(template: impl Into<String>) -> EngineBuilder {
        EngineBuilder::new(template)
    }

    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Toggle whitespace trimming around unmarked directive tags.
    pub fn set_trim_whitespace(&mut self, trim: bool) {
        self.options.trim_whitespace = trim;
    }

    #[inline]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Make a native closure callable as `(args) => name`.
    pub fn register<Args, F: IntoFunction<Args>>(
        &mut self,
        name: &str,
        function: F,
    ) -> MergeResult<()> {
        self.functions.register(name, function)
    }

    /// Remove a function, reporting whether it was registered.
    pub fn deregister(&mut self, name: &str) -> bool {
        self.functions.deregister(name)
    }

    /// Render the template against `value`.
    ///
    /// Any failure aborts the whole merge and discards partial output; the
    /// error carries one breadcrumb per nested template it passed through.
    #[tracing::instrument(level = "debug", skip_all, fields(template_len = self.template.len()))]
    pub fn merge(&self, value: &Value) -> MergeResult<String> {
        let mut renderer = Renderer::new(&self.functions, &*self.members, self.options);
        renderer.merge(&self.template, value.clone(), self.options.max_depth)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("template", &self.template)
            .field("options", &self.options)
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}
