//! Per-context indentation bookkeeping.
//!
//! Each execution context (normally: each thread) has its own nesting depth,
//! driven by begin/end block markers. Two concurrent contexts never see or
//! affect each other's depth.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// One indentation unit, two columns per nesting level
pub const INDENT_UNIT: &str = "  ";

/// Depth ceiling; runaway recursion stops indenting at 80 columns
pub const MAX_DEPTH: usize = 40;

/// Identifier of an execution context whose nesting depth is tracked.
///
/// Contexts are passed explicitly to the tracker rather than looked up
/// ambiently inside it; [`ContextId::current`] derives a stable id for the
/// calling thread for the common case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// A stable id for the calling thread
    pub fn current() -> Self {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        ContextId(hasher.finish())
    }

    /// Wrap an externally supplied id (task handle, test fixture, ...)
    pub fn from_raw(raw: u64) -> Self {
        ContextId(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    /// Fixed-width 12-hex-digit rendering, as it appears in log lines
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:012X}", self.0 & 0xFFFF_FFFF_FFFF)
    }
}

/// Tracks nesting depth per execution context.
///
/// Entries are created lazily on first use and are never evicted; the cost is
/// one counter per context that ever logged.
#[derive(Default)]
pub struct IndentTracker {
    depths: Mutex<HashMap<ContextId, usize>>,
}

impl IndentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a block: increments the context's depth and returns the depth
    /// *before* the increment.
    ///
    /// The returned value is the depth at which the line announcing the block
    /// is rendered; only the lines inside the block render one level deeper.
    pub fn enter(&self, context: ContextId) -> usize {
        let mut depths = self.lock();
        let depth = depths.entry(context).or_insert(0);
        let announcing = *depth;
        if *depth < MAX_DEPTH {
            *depth += 1;
        }
        announcing
    }

    /// Exit a block: decrements the context's depth, clamped at zero, and
    /// returns the new depth (the depth for the closing line).
    ///
    /// An exit without a matching enter is a usage error on the caller's
    /// side; it is clamped rather than raised because logging must never
    /// disturb the surrounding control flow.
    pub fn exit(&self, context: ContextId) -> usize {
        let mut depths = self.lock();
        let depth = depths.entry(context).or_insert(0);
        *depth = depth.saturating_sub(1);
        *depth
    }

    /// Current depth of a context, zero if it never logged
    pub fn current_depth(&self, context: ContextId) -> usize {
        self.lock().get(&context).copied().unwrap_or(0)
    }

    /// Drop all tracked contexts (teardown between setup scopes)
    pub(crate) fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ContextId, usize>> {
        // A poisoned map still holds valid counters; logging never panics.
        self.depths.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_is_net_increments() {
        let tracker = IndentTracker::new();
        let ctx = ContextId::from_raw(1);

        assert_eq!(tracker.enter(ctx), 0);
        assert_eq!(tracker.enter(ctx), 1);
        assert_eq!(tracker.current_depth(ctx), 2);
        assert_eq!(tracker.exit(ctx), 1);
        assert_eq!(tracker.current_depth(ctx), 1);
    }

    #[test]
    fn test_exit_clamps_at_zero() {
        let tracker = IndentTracker::new();
        let ctx = ContextId::from_raw(2);

        assert_eq!(tracker.exit(ctx), 0);
        assert_eq!(tracker.exit(ctx), 0);
        assert_eq!(tracker.current_depth(ctx), 0);

        tracker.enter(ctx);
        tracker.exit(ctx);
        tracker.exit(ctx);
        assert_eq!(tracker.current_depth(ctx), 0);
    }

    #[test]
    fn test_depth_is_capped() {
        let tracker = IndentTracker::new();
        let ctx = ContextId::from_raw(3);

        for _ in 0..MAX_DEPTH + 5 {
            tracker.enter(ctx);
        }
        assert_eq!(tracker.current_depth(ctx), MAX_DEPTH);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let tracker = IndentTracker::new();
        let a = ContextId::from_raw(10);
        let b = ContextId::from_raw(11);

        tracker.enter(a);
        tracker.enter(a);
        tracker.enter(b);
        assert_eq!(tracker.current_depth(a), 2);
        assert_eq!(tracker.current_depth(b), 1);

        tracker.exit(b);
        assert_eq!(tracker.current_depth(a), 2);
        assert_eq!(tracker.current_depth(b), 0);
    }

    #[test]
    fn test_concurrent_contexts_do_not_corrupt_each_other() {
        use std::sync::Arc;

        let tracker = Arc::new(IndentTracker::new());
        let mut handles = Vec::new();
        for raw in 0..8u64 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                let ctx = ContextId::from_raw(100 + raw);
                for _ in 0..50 {
                    tracker.enter(ctx);
                }
                for _ in 0..20 {
                    tracker.exit(ctx);
                }
                tracker.current_depth(ctx)
            }));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 30);
        }
    }

    #[test]
    fn test_thread_context_ids_differ() {
        let here = ContextId::current();
        let there = std::thread::spawn(ContextId::current).join().unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn test_display_is_twelve_hex_digits() {
        let rendered = ContextId::from_raw(0xAB).to_string();
        assert_eq!(rendered, "0000000000AB");
        assert_eq!(rendered.len(), 12);
    }
}
