//! Bind expression resolution.
//!
//! Dispatch is by leading syntax, most specific first:
//!
//! 1. `$`: the current frame's value
//! 2. `$.path`: a member path off the current value
//! 3. `..\expr` (or `../expr`), repeated: `expr` against an ancestor frame
//! 4. `:name` or `:name.path`: a declared variable
//! 5. `(args) => Name`: a function call
//! 6. a quoted, boolean, `null` or numeric literal
//! 7. anything else: a member path off the current value

use stencil_value::{
    parse_literal, resolve_path, scope_chain_overreach, MemberMode, MemberResolver, MergeResult,
    Value,
};

use crate::environment::ScopeChain;
use crate::function::{find_arrow, Call, FunctionRegistry};

/// One level of a relative scope walk.
const WALK_UP: [&str; 2] = ["..\\", "../"];

/// Everything a bind expression can see, anchored at one frame.
pub struct BindContext<'a> {
    scopes: &'a ScopeChain,
    functions: &'a FunctionRegistry,
    members: &'a dyn MemberResolver,
    mode: MemberMode,
    /// Arena index of the frame treated as current.
    frame: usize,
}

impl<'a> BindContext<'a> {
    /// Anchor at the top of `scopes`. The chain must not be empty.
    pub fn new(
        scopes: &'a ScopeChain,
        functions: &'a FunctionRegistry,
        members: &'a dyn MemberResolver,
        mode: MemberMode,
    ) -> MergeResult<Self> {
        let frame = scopes.index_of(0)?;
        Ok(Self {
            scopes,
            functions,
            members,
            mode,
            frame,
        })
    }

    /// The same context anchored at another frame.
    fn at(&self, frame: usize) -> Self {
        Self {
            scopes: self.scopes,
            functions: self.functions,
            members: self.members,
            mode: self.mode,
            frame,
        }
    }

    fn current(&self) -> Value {
        self.scopes
            .link(self.frame)
            .map(|link| link.value().clone())
            .unwrap_or_default()
    }

    /// Resolve `expr` to a value.
    pub fn resolve(&self, expr: &str) -> MergeResult<Value> {
        let expr = expr.trim();

        if expr == "$" {
            return Ok(self.current());
        }
        if let Some(path) = expr.strip_prefix("$.") {
            return resolve_path(self.members, &self.current(), path, self.mode);
        }
        if let Some((levels, rest)) = split_walk(expr) {
            return self.resolve_up(levels, rest);
        }
        if let Some(reference) = expr.strip_prefix(':') {
            return self.resolve_variable(reference);
        }
        if find_arrow(expr).is_some() {
            return self.functions.resolve(expr, self).and_then(Call::invoke);
        }
        if let Some(literal) = parse_literal(expr) {
            return literal;
        }
        resolve_path(self.members, &self.current(), expr, self.mode)
    }

    fn resolve_up(&self, levels: usize, rest: &str) -> MergeResult<Value> {
        // Walks are measured from the anchored frame, not the chain top.
        let depth = self.frame + 1;
        if levels >= depth {
            return Err(scope_chain_overreach(levels, depth));
        }
        let ancestor = self.at(self.frame - levels);
        if rest.is_empty() {
            return Ok(ancestor.current());
        }
        ancestor.resolve(rest)
    }

    fn resolve_variable(&self, reference: &str) -> MergeResult<Value> {
        let (name, path) = reference.split_once('.').unwrap_or((reference, ""));
        let value = self.scopes.access_from(self.frame, name)?;
        resolve_path(self.members, &value, path, self.mode)
    }
}

/// Count leading walk-up tokens. `None` when there are none.
fn split_walk(expr: &str) -> Option<(usize, &str)> {
    let mut rest = expr;
    let mut levels = 0;
    while let Some(next) = WALK_UP.iter().find_map(|token| rest.strip_prefix(token)) {
        rest = next;
        levels += 1;
    }
    (levels > 0).then_some((levels, rest))
}

#[cfg(test)]
mod tests;
