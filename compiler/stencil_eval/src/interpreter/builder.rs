//! `EngineBuilder` for creating engines with non-default configuration.

#![allow(
    clippy::disallowed_types,
    reason = "Arc<dyn MemberResolver> shared across engine clones"
)]

use std::sync::Arc;

use stencil_value::{DefaultResolver, MemberMode, MemberResolver};

use super::Engine;
use crate::function::FunctionRegistry;
use crate::options::MergeOptions;

/// Builder for [`Engine`].
///
/// ```text
/// let engine = Engine::builder("{#each items-}{$}{-#/each}")
///     .trim_whitespace(true)
///     .member_mode(MemberMode::Lenient)
///     .build();
/// ```
pub struct EngineBuilder {
    template: String,
    options: MergeOptions,
    functions: Option<FunctionRegistry>,
    members: Option<Arc<dyn MemberResolver>>,
}

impl EngineBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            options: MergeOptions::default(),
            functions: None,
            members: None,
        }
    }

    /// Replace every option at once.
    #[must_use]
    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.options.trim_whitespace = trim;
        self
    }

    /// Partial expansions allowed before `StackDepthExceeded`.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    #[must_use]
    pub fn member_mode(mut self, mode: MemberMode) -> Self {
        self.options.members = mode;
        self
    }

    /// Start from an existing registry instead of an empty one.
    #[must_use]
    pub fn functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Resolve members of host values with `resolver`.
    ///
    /// Default is [`DefaultResolver`].
    #[must_use]
    pub fn resolver(mut self, resolver: impl MemberResolver + 'static) -> Self {
        self.members = Some(Arc::new(resolver));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            template: self.template,
            options: self.options,
            functions: self.functions.unwrap_or_default(),
            members: self.members.unwrap_or_else(|| Arc::new(DefaultResolver)),
        }
    }
}
