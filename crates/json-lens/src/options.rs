//! Evaluation settings.

use std::sync::atomic::{AtomicBool, Ordering};

/// Default cap on recursive traversals.
pub const DEFAULT_MAX_DEPTH: usize = 256;

static TRANSFORMERS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Enable or disable `@transformer` segments process-wide.
///
/// While disabled, `@name` segments are looked up as plain object keys, which
/// keeps paths that come from untrusted sources from invoking transformers.
/// Only evaluators created afterwards (including those behind the free
/// functions) observe the change.
pub fn set_transformers_enabled(enabled: bool) {
    TRANSFORMERS_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn transformers_enabled() -> bool {
    TRANSFORMERS_ENABLED.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Evaluate `@name` segments through the registry.
    pub transformers: bool,
    /// Depth cap for recursive descent and the search helpers.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { transformers: transformers_enabled(), max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Options {
    pub fn with_transformers(mut self, enabled: bool) -> Self {
        self.transformers = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_setters() {
        let options = Options::default().with_transformers(false).with_max_depth(8);
        assert!(!options.transformers);
        assert_eq!(options.max_depth, 8);
    }
}
