//! Merge configuration.

use stencil_value::MemberMode;

/// Partial expansion ceiling used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 25;

/// Knobs that hold for a whole merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    /// Discard whitespace around directive tags that carry no explicit marker.
    pub trim_whitespace: bool,
    /// How many partials may nest before the merge fails.
    pub max_depth: usize,
    /// Treatment of absent members.
    pub members: MemberMode,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: false,
            max_depth: DEFAULT_MAX_DEPTH,
            members: MemberMode::Strict,
        }
    }
}

impl MergeOptions {
    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.members = MemberMode::Lenient;
        self
    }

    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trim_whitespace = true;
        self
    }
}

#[cfg(test)]
mod tests;
