//! Output sinks: console, file, and an in-memory capture for tests.
//!
//! Sinks receive complete lines. Each implementation serializes its own
//! writes so concurrent producers never interleave partial lines, and none
//! of them surfaces errors to the logging caller: the first failure is
//! reported to stderr, further ones are suppressed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

/// A destination for formatted log lines
pub trait Sink: Send + Sync {
    /// Write one complete line; must never panic or propagate errors
    fn write_line(&self, line: &str);

    /// Flush buffered output
    fn flush(&self);
}

static SINK_ERROR_REPORTED: AtomicBool = AtomicBool::new(false);

/// Report the first sink failure to stderr, swallow the rest.
///
/// A broken sink must not cascade: the logging path stays fire-and-forget.
fn report_sink_error(what: &str, err: &std::io::Error) {
    if !SINK_ERROR_REPORTED.swap(true, Ordering::Relaxed) {
        eprintln!("blocklog: {what}: {err} (further sink errors suppressed)");
    }
}

/// Re-arm the once-per-scope error report.
///
/// Called at teardown so a failure in one setup scope does not silence the
/// first failure of a later, unrelated one.
pub(crate) fn reset_error_latch() {
    SINK_ERROR_REPORTED.store(false, Ordering::Relaxed);
}

fn lock_absorbing_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Whole-line writes to stderr
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn write_line(&self, line: &str) {
        // single writeln per record keeps concurrent lines intact
        let stderr = std::io::stderr();
        let _ = writeln!(stderr.lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Buffered writes to a log file, created truncating
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Create the file (and its parent directories) for writing
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_line(&self, line: &str) {
        let mut writer = lock_absorbing_poison(&self.writer);
        if let Err(err) = writeln!(writer, "{line}") {
            report_sink_error("log file write failed", &err);
        }
    }

    fn flush(&self) {
        let mut writer = lock_absorbing_poison(&self.writer);
        if let Err(err) = writer.flush() {
            report_sink_error("log file flush failed", &err);
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Capture sink collecting lines in memory.
///
/// Cloning shares the buffer, so a clone handed to
/// [`Setup::sink`](crate::Setup::sink) can be inspected afterwards.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured lines
    pub fn lines(&self) -> Vec<String> {
        lock_absorbing_poison(&self.lines).clone()
    }

    pub fn clear(&self) {
        lock_absorbing_poison(&self.lines).clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) {
        lock_absorbing_poison(&self.lines).push(line.to_string());
    }

    fn flush(&self) {}
}
