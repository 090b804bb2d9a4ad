//! Logger handles and the process-wide dispatcher.
//!
//! A [`Logger`] is a cheap handle carrying a module name and a local
//! verbosity filter. All handles share one dispatcher holding the namespace,
//! the global filter, the formatter, the sinks, and the indentation tracker.
//!
//! Block structure is driven by message markers, the way the log reads:
//! prefix the first message of a block with `"> "` and the last one with
//! `"< "`. For example:
//!
//! ```no_run
//! fn gun(arg: i32) -> i32 {
//!     arg + 13
//! }
//!
//! fn fun(log: &blocklog::Logger) -> i32 {
//!     blocklog::debug!(log, "> fun()");
//!     let result = gun(3);
//!     blocklog::debug!(log, "< fun(): {}", result);
//!     result
//! }
//! ```
//!
//! Lines logged between the two markers render one indentation level deeper
//! than the markers themselves, nesting across calls. Place the markers at
//! the entry and exit points of the block; multiple exit paths need a `"< "`
//! on each to keep the log balanced.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::format::Formatter;
use crate::indent::{ContextId, IndentTracker};
use crate::level::{Level, LevelFilter};
use crate::record::Record;
use crate::sink::{ConsoleSink, FileSink, Sink};

/// Shared state wired up by [`Setup`](crate::Setup) and consulted on every
/// log call.
pub(crate) struct Dispatcher {
    pub(crate) namespace: Option<String>,
    pub(crate) global_level: LevelFilter,
    pub(crate) formatter: Formatter,
    pub(crate) console: ConsoleSink,
    /// File sinks stack with nested setup scopes; each scope detaches its own
    pub(crate) files: Vec<FileSink>,
    pub(crate) extra: Vec<Arc<dyn Sink>>,
    pub(crate) tracker: IndentTracker,
    /// Reference count for nested setup scopes
    pub(crate) refs: usize,
}

impl Dispatcher {
    fn new() -> Self {
        Self {
            namespace: None,
            global_level: LevelFilter::Info,
            formatter: Formatter::default(),
            console: ConsoleSink,
            files: Vec::new(),
            extra: Vec::new(),
            tracker: IndentTracker::new(),
            refs: 0,
        }
    }

    pub(crate) fn emit(&self, line: &str) {
        self.console.write_line(line);
        for file in &self.files {
            file.write_line(line);
        }
        for sink in &self.extra {
            sink.write_line(line);
        }
    }

    pub(crate) fn flush_all(&self) {
        self.console.flush();
        for file in &self.files {
            file.flush();
        }
        for sink in &self.extra {
            sink.flush();
        }
    }

    /// Return to the pristine pre-setup state (last scope torn down)
    pub(crate) fn reset(&mut self) {
        self.namespace = None;
        self.global_level = LevelFilter::Info;
        self.formatter = Formatter::default();
        self.files.clear();
        self.extra.clear();
        self.tracker.reset();
        crate::sink::reset_error_latch();
    }
}

static DISPATCHER: Lazy<RwLock<Dispatcher>> = Lazy::new(|| RwLock::new(Dispatcher::new()));

// Lock poisoning is absorbed rather than propagated: a log call must never
// panic the caller, and the dispatcher state stays usable either way.
pub(crate) fn dispatcher() -> RwLockReadGuard<'static, Dispatcher> {
    DISPATCHER.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn dispatcher_mut() -> RwLockWriteGuard<'static, Dispatcher> {
    DISPATCHER.write().unwrap_or_else(|e| e.into_inner())
}

/// A namespaced logger handle with an optional local verbosity filter.
///
/// The effective threshold of a call is the stricter of the handle's local
/// filter and the global one, so a local DEBUG cannot open the gate wider
/// than a global INFO (see [`LevelFilter::resolve`]).
#[derive(Clone, Debug)]
pub struct Logger {
    /// Module part of the qualified name, dots already rewritten
    module: Option<String>,
    local_level: LevelFilter,
}

/// Acquire a logger for a module, inheriting the global threshold
pub fn logger(module: &str) -> Logger {
    logger_with_level(module, LevelFilter::Unset)
}

/// Acquire a logger with a local threshold.
///
/// The local level only ever tightens: it is effective when stricter than
/// the global one.
pub fn logger_with_level(module: &str, local_level: LevelFilter) -> Logger {
    // Dots would make the logger a child of parent modules under the shared
    // namespace, inheriting their local levels; rewrite them away.
    let module = module.trim();
    let module = if module.is_empty() {
        None
    } else {
        Some(module.replace('.', "/"))
    };
    Logger {
        module,
        local_level,
    }
}

impl Logger {
    pub fn local_level(&self) -> LevelFilter {
        self.local_level
    }

    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    /// Emit one record at the given level for the calling context.
    ///
    /// Fire-and-forget: suppressed records cost one threshold check, and no
    /// failure on the logging path reaches the caller.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        let dispatcher = dispatcher();
        let effective = LevelFilter::resolve(self.local_level, dispatcher.global_level);
        if !level.passes(effective) {
            return;
        }

        let message = message.to_string();
        let context = ContextId::current();
        let depth = if message.starts_with("> ") {
            dispatcher.tracker.enter(context)
        } else if message.starts_with("< ") {
            dispatcher.tracker.exit(context)
        } else {
            dispatcher.tracker.current_depth(context)
        };

        let record = Record {
            level,
            message,
            timestamp: chrono::Local::now(),
            context,
            source: self.qualified_name(&dispatcher),
            depth,
        };
        let line = dispatcher.formatter.format(&record);
        dispatcher.emit(&line);
    }

    /// Explicitly begin a block for the calling context.
    ///
    /// Returns the depth of the announcing line; prefer the `"> "` message
    /// marker, which logs and enters in one call.
    pub fn enter(&self) -> usize {
        dispatcher().tracker.enter(ContextId::current())
    }

    /// Explicitly end a block for the calling context.
    ///
    /// Clamped at zero; an unmatched exit is a usage error, never a panic.
    pub fn exit(&self) -> usize {
        dispatcher().tracker.exit(ContextId::current())
    }

    /// Namespace-qualified source name, e.g. `app.train`
    fn qualified_name(&self, dispatcher: &Dispatcher) -> String {
        match (dispatcher.namespace.as_deref(), self.module.as_deref()) {
            (Some(namespace), Some(module)) => format!("{namespace}.{module}"),
            (Some(namespace), None) => namespace.to_string(),
            (None, Some(module)) => module.to_string(),
            (None, None) => env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_dots_are_rewritten() {
        let log = logger("data.loader");
        assert_eq!(log.module.as_deref(), Some("data/loader"));
    }

    #[test]
    fn test_blank_module_means_namespace_only() {
        let log = logger("  ");
        assert!(log.module.is_none());
    }

    #[test]
    fn test_local_level_defaults_to_unset() {
        assert_eq!(logger("m").local_level(), LevelFilter::Unset);
        assert_eq!(
            logger_with_level("m", LevelFilter::Error).local_level(),
            LevelFilter::Error
        );
    }

    #[test]
    fn test_qualified_name_variants() {
        let mut d = Dispatcher::new();
        d.namespace = Some("app".to_string());

        assert_eq!(logger("train").qualified_name(&d), "app.train");
        assert_eq!(logger("").qualified_name(&d), "app");

        d.namespace = None;
        assert_eq!(logger("train").qualified_name(&d), "train");
        assert_eq!(logger("").qualified_name(&d), "blocklog");
    }
}
