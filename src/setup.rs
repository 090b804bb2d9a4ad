//! Setup façade: resolve configuration, wire the dispatcher, tear down.
//!
//! Configuration is resolved once, inside [`Setup::init`], from explicit
//! values, then environment variables, then defaults; after that the
//! environment is never consulted again. The returned [`SetupGuard`] is the
//! scope of the configuration: dropping it (on any exit path) flushes all
//! sinks and detaches the log file that this scope attached.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format::{Formatter, DEFAULT_LINE_FORMAT};
use crate::indent::ContextId;
use crate::level::{Level, LevelFilter};
use crate::logger::{dispatcher_mut, Dispatcher};
use crate::record::Record;
use crate::sink::{FileSink, Sink};

/// Environment variable overriding the global verbosity level
pub const ENV_LEVEL: &str = "BLOCKLOG_LEVEL";
/// Environment variable with the log file path or directory
pub const ENV_PATH: &str = "BLOCKLOG_PATH";
/// Environment variable with the namespace
pub const ENV_NAMESPACE: &str = "BLOCKLOG_NAMESPACE";
/// Environment variable enabling colorized output
pub const ENV_COLORIZE: &str = "BLOCKLOG_COLORIZE";
/// Environment variable overriding the line-format template
pub const ENV_FORMAT: &str = "BLOCKLOG_FORMAT";

const FILENAME_EXT: &str = "log";

/// Builder for the logging configuration.
///
/// Every field falls back from the explicit value to its environment
/// variable to a default:
///
/// | field        | env var              | default                  |
/// |--------------|----------------------|--------------------------|
/// | global level | `BLOCKLOG_LEVEL`     | keep current threshold   |
/// | log path     | `BLOCKLOG_PATH`      | console only             |
/// | namespace    | `BLOCKLOG_NAMESPACE` | none, setup fails        |
/// | colorize     | `BLOCKLOG_COLORIZE`  | off                      |
/// | line format  | `BLOCKLOG_FORMAT`    | `"%l %t %x"`             |
#[derive(Default)]
pub struct Setup {
    global_level: Option<LevelFilter>,
    log_path: Option<PathBuf>,
    module_file: Option<PathBuf>,
    namespace: Option<String>,
    colorize: Option<bool>,
    line_format: Option<String>,
    extra_sinks: Vec<Arc<dyn Sink>>,
}

impl Setup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global verbosity threshold. [`LevelFilter::Unset`] keeps the current
    /// one; [`LevelFilter::Off`] disables output entirely.
    pub fn global_level(mut self, level: LevelFilter) -> Self {
        self.global_level = Some(level);
        self
    }

    /// Where to write the log file: either a complete `.log` path, or a
    /// directory when combined with [`module_file`](Setup::module_file), or
    /// any other path whose extension is replaced by a timestamped `.log`
    /// suffix.
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Module file whose base name labels the log file, e.g. `train.rs`
    /// under log path `logs/` becomes `logs/train-<timestamp>.log`.
    pub fn module_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_file = Some(path.into());
        self
    }

    /// Namespace prefixing every logger name; required (here or via
    /// `BLOCKLOG_NAMESPACE`), since an ambiguous namespace would mix this
    /// subsystem's loggers with unrelated ones.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Enable ANSI-colored severity labels. All-or-nothing across sinks:
    /// when enabled, the escape sequences also end up in the log file.
    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = Some(colorize);
        self
    }

    /// Prefix template; see [`Formatter`](crate::Formatter) for the tokens
    pub fn line_format(mut self, template: impl Into<String>) -> Self {
        self.line_format = Some(template.into());
        self
    }

    /// Attach an additional sink for the lifetime of the setup scope
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.extra_sinks.push(Arc::new(sink));
        self
    }

    /// Resolve the configuration, validate it, and wire the dispatcher.
    ///
    /// Fails fast on an unrecognized level ([`Error::InvalidLevel`]), an
    /// unresolvable namespace ([`Error::MissingNamespace`]), an unscannable
    /// template ([`Error::InvalidFormat`]), or a log file that cannot be
    /// created. Nothing is changed when an error is returned.
    pub fn init(self) -> Result<SetupGuard> {
        let global_level = match self.global_level {
            Some(level) => level,
            None => match env_nonempty(ENV_LEVEL) {
                Some(value) => value.parse()?,
                None => LevelFilter::Unset,
            },
        };

        let namespace = self
            .namespace
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty())
            .or_else(|| env_nonempty(ENV_NAMESPACE))
            .ok_or(Error::MissingNamespace)?;

        let colorize = self
            .colorize
            .unwrap_or_else(|| env_nonempty(ENV_COLORIZE).is_some_and(|v| parse_bool(&v)));

        let line_format = self
            .line_format
            // untrimmed so intentional spacing survives, but blank falls back
            .or_else(|| std::env::var(ENV_FORMAT).ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_LINE_FORMAT.to_string());
        let formatter = Formatter::new(&line_format, colorize)?;

        let log_path = self.log_path.or_else(|| env_nonempty(ENV_PATH).map(PathBuf::from));
        let file = match log_path {
            // With output disabled the file is not even created
            Some(_) if global_level == LevelFilter::Off => None,
            Some(path) => {
                let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
                let resolved = resolve_log_path(&path, self.module_file.as_deref(), &timestamp);
                Some(FileSink::create(resolved)?)
            }
            None => None,
        };

        let extras_added = self.extra_sinks.len();
        let files_added = usize::from(file.is_some());
        let mut dispatcher = dispatcher_mut();
        dispatcher.refs += 1;
        dispatcher.namespace = Some(namespace);
        if global_level != LevelFilter::Unset {
            dispatcher.global_level = global_level;
        }
        dispatcher.formatter = formatter;
        dispatcher.files.extend(file);
        dispatcher.extra.extend(self.extra_sinks);

        Ok(SetupGuard {
            extras_added,
            files_added,
        })
    }
}

/// RAII scope of a logging configuration.
///
/// Setups nest: file sinks stack, so during an inner scope the outer log
/// file keeps receiving lines. Each guard flushes and detaches exactly the
/// sinks it attached; the outermost drop additionally returns the dispatcher
/// to its default state.
#[must_use = "the logging configuration is torn down when the guard drops"]
pub struct SetupGuard {
    /// How many entries this scope pushed onto the extra-sink stack
    extras_added: usize,
    /// Whether this scope pushed a file sink
    files_added: usize,
}

impl Drop for SetupGuard {
    fn drop(&mut self) {
        let mut dispatcher = dispatcher_mut();
        dispatcher.refs = dispatcher.refs.saturating_sub(1);
        dispatcher.flush_all();
        let keep = dispatcher.extra.len().saturating_sub(self.extras_added);
        dispatcher.extra.truncate(keep);
        let keep = dispatcher.files.len().saturating_sub(self.files_added);
        dispatcher.files.truncate(keep);
        if dispatcher.refs == 0 {
            if std::thread::panicking() {
                log_panic(&dispatcher);
            }
            dispatcher.reset();
        }
    }
}

/// Leave a last FATAL line when unwinding tears down the logging scope,
/// so the log shows the run did not end normally.
fn log_panic(dispatcher: &Dispatcher) {
    if !Level::Fatal.passes(dispatcher.global_level) {
        return;
    }
    let record = Record {
        level: Level::Fatal,
        message: "panic unwinding through the logging scope".to_string(),
        timestamp: chrono::Local::now(),
        context: ContextId::current(),
        source: dispatcher
            .namespace
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
        depth: 0,
    };
    let line = dispatcher.formatter.format(&record);
    dispatcher.emit(&line);
}

/// Combine the configured path, optional module file, and timestamp into
/// the actual log file path.
fn resolve_log_path(log_path: &Path, module_file: Option<&Path>, timestamp: &str) -> PathBuf {
    if let Some(module) = module_file {
        // log_path is a directory, label the file after the module
        let stem = module
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "module".to_string());
        return log_path.join(format!("{stem}-{timestamp}.{FILENAME_EXT}"));
    }
    if log_path.extension().is_some_and(|ext| ext == FILENAME_EXT) {
        // complete file path, taken verbatim
        return log_path.to_path_buf();
    }
    match log_path.file_stem() {
        // replace the extension, don't overwrite the file itself
        Some(stem) => {
            let name = format!("{}-{timestamp}.{FILENAME_EXT}", stem.to_string_lossy());
            log_path.parent().unwrap_or_else(|| Path::new("")).join(name)
        }
        None => log_path.join(format!("blocklog-{timestamp}.{FILENAME_EXT}")),
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
