//! Scope chain and variable stores.
//!
//! The chain is an arena of [`ScopeLink`]s: one link per bound value, each
//! owning the variables declared while it is current. Links refer to their
//! parent by index, so walking outward never needs shared ownership.
//!
//! # Scope Markers
//!
//! Blocks that render in the current frame (`#if` bodies, partials) bracket
//! themselves with [`ScopeChain::mark_scope`] / [`ScopeChain::unwind_to_mark`].
//! A mark records the store length; unwinding truncates back to it, so a
//! block's declarations never outlive the block and shadowed outer bindings
//! become visible again.

use stencil_value::{
    scope_chain_overreach, undeclared_variable_access, undeclared_variable_update, MergeResult,
    Value,
};

/// A named binding.
#[derive(Clone, Debug, PartialEq)]
struct Binding {
    name: String,
    value: Value,
}

/// Variables declared in one frame, most recent last.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    bindings: Vec<Binding>,
    /// Store lengths recorded by `mark`, innermost last.
    marks: Vec<usize>,
}

impl VariableStore {
    /// Push a binding. Shadowing is allowed.
    pub fn declare(&mut self, name: &str, value: Value) {
        self.bindings.push(Binding {
            name: name.to_string(),
            value,
        });
    }

    /// The most recent binding for `name` in this store.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings
            .iter_mut()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &mut b.value)
    }

    /// Open a nested lifetime.
    pub fn mark(&mut self) {
        self.marks.push(self.bindings.len());
    }

    /// Drop every binding declared since the innermost mark, and the mark.
    ///
    /// Without a mark this is a no-op.
    pub fn unwind(&mut self) {
        if let Some(len) = self.marks.pop() {
            self.bindings.truncate(len);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One frame: a bound value and its variables.
#[derive(Clone, Debug)]
pub struct ScopeLink {
    value: Value,
    store: VariableStore,
    parent: Option<usize>,
}

impl ScopeLink {
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

/// Stack of frames for one top-level merge.
#[derive(Clone, Debug, Default)]
pub struct ScopeChain {
    links: Vec<ScopeLink>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Push a frame bound to `value`, parented on the current top.
    pub fn push(&mut self, value: Value) {
        let parent = self.links.len().checked_sub(1);
        self.links.push(ScopeLink {
            value,
            store: VariableStore::default(),
            parent,
        });
    }

    /// Pop the top frame, dropping its variables.
    pub fn pop(&mut self) -> Option<Value> {
        self.links.pop().map(|link| link.value)
    }

    /// Arena index of the frame `k` steps below the top.
    pub fn index_of(&self, k: usize) -> MergeResult<usize> {
        let depth = self.depth();
        if k >= depth {
            return Err(scope_chain_overreach(k, depth));
        }
        Ok(depth - 1 - k)
    }

    /// The value bound `k` frames below the top; `peek(0)` is the current value.
    pub fn peek(&self, k: usize) -> MergeResult<&Value> {
        let index = self.index_of(k)?;
        Ok(&self.links[index].value)
    }

    /// The frame at an arena index.
    #[inline]
    pub fn link(&self, index: usize) -> Option<&ScopeLink> {
        self.links.get(index)
    }

    /// Declare in the top frame.
    pub fn declare(&mut self, name: &str, value: Value) {
        if let Some(top) = self.links.last_mut() {
            top.store.declare(name, value);
        }
    }

    /// Read `name`, searching outward from the top frame.
    pub fn access(&self, name: &str) -> MergeResult<Value> {
        match self.links.len().checked_sub(1) {
            Some(top) => self.access_from(top, name),
            None => Err(undeclared_variable_access(name)),
        }
    }

    /// Read `name`, searching outward from the frame at `index`.
    pub fn access_from(&self, index: usize, name: &str) -> MergeResult<Value> {
        let mut cursor = Some(index);
        while let Some(link) = cursor.and_then(|i| self.links.get(i)) {
            if let Some(value) = link.store.get(name) {
                return Ok(value.clone());
            }
            cursor = link.parent;
        }
        Err(undeclared_variable_access(name))
    }

    /// Rewrite the nearest binding of `name`, searching outward from the top.
    pub fn update(&mut self, name: &str, value: Value) -> MergeResult<()> {
        let mut cursor = self.links.len().checked_sub(1);
        while let Some(index) = cursor {
            let Some(link) = self.links.get_mut(index) else {
                break;
            };
            if let Some(slot) = link.store.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            cursor = link.parent;
        }
        Err(undeclared_variable_update(name))
    }

    /// Open a nested variable lifetime in the top frame.
    pub fn mark_scope(&mut self) {
        if let Some(top) = self.links.last_mut() {
            top.store.mark();
        }
    }

    /// Close the innermost lifetime opened by [`mark_scope`](Self::mark_scope).
    pub fn unwind_to_mark(&mut self) {
        if let Some(top) = self.links.last_mut() {
            top.store.unwind();
        }
    }
}
