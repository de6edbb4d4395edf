//! Stack safety for recursive template rendering.
//!
//! Block tags (`#if`, `#each`, `#with`) render their bodies through child
//! renderers, so template nesting depth turns directly into host recursion
//! depth. Partial expansion is bounded by the engine's `max_depth`, but block
//! nesting is not, and a generated template can nest blocks thousands deep.
//!
//! Each child render is wrapped:
//!
//! ```text
//! let rendered = ensure_sufficient_stack(|| self.render_scoped(body, depth))?;
//! ```
//!
//! Native targets grow the stack with `stacker`; on wasm32 the closure is
//! called directly.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone, a new segment is allocated
/// before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// wasm32 manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
