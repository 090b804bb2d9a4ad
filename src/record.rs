//! The per-call log record consumed by the formatter.

use chrono::{DateTime, Local};

use crate::indent::ContextId;
use crate::level::Level;

/// Everything known about a single log call at emission time.
///
/// Built by the logger, rendered by the formatter, then discarded.
#[derive(Clone, Debug)]
pub struct Record {
    pub level: Level,
    /// Message text with the caller's arguments already substituted
    pub message: String,
    /// Millisecond-precision local timestamp taken at call time
    pub timestamp: DateTime<Local>,
    pub context: ContextId,
    /// Namespace-qualified source name, e.g. `app.train`
    pub source: String,
    /// Indentation depth the line renders at
    pub depth: usize,
}
