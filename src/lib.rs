#![forbid(unsafe_code)]

//! Block-structured logging for diagnosing nested or concurrent control flow.
//!
//! This crate provides:
//! - Per-context (per-thread) indentation driven by `"> "` / `"< "` block
//!   markers, so nested calls read like nested scopes
//! - A TRACE severity level between DEBUG and INFO
//! - Severity glyphs with optional ANSI coloring and a millisecond timestamp
//!   prefix, overridable via a small template
//! - Local per-logger verbosity on top of a global threshold (the stricter
//!   one wins)
//! - A scoped setup resolving configuration from explicit values and
//!   environment variables, logging to console and optionally to a file
//!
//! # Example
//!
//! ```no_run
//! use blocklog::{LevelFilter, Setup};
//!
//! fn main() -> blocklog::Result<()> {
//!     let _guard = Setup::new()
//!         .namespace("app")
//!         .global_level(LevelFilter::Debug)
//!         .colorize(true)
//!         .init()?;
//!
//!     let log = blocklog::logger("demo");
//!     blocklog::info!(log, "starting up");
//!     blocklog::debug!(log, "> compute()");
//!     blocklog::debug!(log, "intermediate = {}", 42);
//!     blocklog::debug!(log, "< compute(): {}", 42);
//!     Ok(())
//! }
//! ```
//!
//! produces something like:
//!
//! ```text
//! 💬 INFO    2025-03-08 12:17:35.235 00E1B2C3D4F5 app.demo: starting up
//! 🔎 DEBUG   2025-03-08 12:17:35.236 00E1B2C3D4F5 app.demo: > compute()
//! 🔎 DEBUG   2025-03-08 12:17:35.237 00E1B2C3D4F5   app.demo: intermediate = 42
//! 🔎 DEBUG   2025-03-08 12:17:35.238 00E1B2C3D4F5 app.demo: < compute(): 42
//! ```

pub mod describe;
pub mod error;
pub mod format;
pub mod indent;
pub mod level;
pub mod logger;
pub mod record;
pub mod setup;
pub mod sink;

mod macros;

// Re-export commonly used types
pub use describe::Describe;
pub use error::{Error, Result};
pub use format::{Formatter, DEFAULT_LINE_FORMAT};
pub use indent::{ContextId, IndentTracker, INDENT_UNIT, MAX_DEPTH};
pub use level::{Level, LevelFilter};
pub use logger::{logger, logger_with_level, Logger};
pub use record::Record;
pub use setup::{Setup, SetupGuard};
pub use sink::{ConsoleSink, FileSink, MemorySink, Sink};
