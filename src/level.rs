//! Severity levels and threshold resolution.
//!
//! The level ladder extends the usual set with TRACE, wedged between DEBUG
//! and INFO so execution-flow tracing can be enabled without drowning in
//! debug output:
//!
//! ```text
//! FATAL(50) > ERROR(40) > WARNING(30) > INFO(20) > TRACE(15) > DEBUG(10)
//! ```
//!
//! Thresholds additionally know `Unset` (never raises the threshold) and
//! `Off` (above FATAL, silences everything).

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Severity of a single log record, ordered by numeric weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 10,
    Trace = 15,
    Info = 20,
    Warning = 30,
    Error = 40,
    Fatal = 50,
}

/// Verbosity threshold: a [`Level`] plus the `Unset` and `Off` extremes.
///
/// `Unset` carries weight 0 and therefore loses to any concrete level when
/// resolving; `Off` sits above FATAL and suppresses all records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LevelFilter {
    Unset = 0,
    Debug = 10,
    Trace = 15,
    Info = 20,
    Warning = 30,
    Error = 40,
    Fatal = 50,
    Off = 60,
}

impl Level {
    /// Numeric weight used for all comparisons
    pub fn weight(self) -> i32 {
        self as i32
    }

    /// Lowercase level name, the inverse of parsing
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Trace => "trace",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Whether a record at this level passes the given threshold
    pub fn passes(self, threshold: LevelFilter) -> bool {
        self.weight() >= threshold.weight()
    }
}

impl LevelFilter {
    /// Numeric weight used for all comparisons
    pub fn weight(self) -> i32 {
        self as i32
    }

    /// Resolve the effective threshold from a local and a global one.
    ///
    /// The stricter (higher-weight) side wins, and `Unset` loses to any
    /// concrete value:
    ///
    /// ```text
    /// local  global  effective
    /// -----  ------  ---------
    /// DEBUG  INFO    INFO
    /// ERROR  INFO    ERROR
    /// Unset  INFO    INFO
    /// ```
    pub fn resolve(local: LevelFilter, global: LevelFilter) -> LevelFilter {
        local.max(global)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
            Level::Info => LevelFilter::Info,
            Level::Warning => LevelFilter::Warning,
            Level::Error => LevelFilter::Error,
            Level::Fatal => LevelFilter::Fatal,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelFilter::Unset => "unset",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
            LevelFilter::Info => "info",
            LevelFilter::Warning => "warning",
            LevelFilter::Error => "error",
            LevelFilter::Fatal => "fatal",
            LevelFilter::Off => "off",
        };
        f.write_str(name)
    }
}

impl FromStr for LevelFilter {
    type Err = Error;

    /// Accepts the lowercase level names (`off`, `fatal`, `error`, `warning`,
    /// `info`, `trace`, `debug`) or their exact numeric weights. Anything
    /// else is an [`Error::InvalidLevel`], surfaced at configuration time.
    fn from_str(s: &str) -> Result<Self, Error> {
        let filter = match s.trim() {
            "off" | "60" => LevelFilter::Off,
            "fatal" | "50" => LevelFilter::Fatal,
            "error" | "40" => LevelFilter::Error,
            "warning" | "30" => LevelFilter::Warning,
            "info" | "20" => LevelFilter::Info,
            "trace" | "15" => LevelFilter::Trace,
            "debug" | "10" => LevelFilter::Debug,
            "0" => LevelFilter::Unset,
            other => return Err(Error::InvalidLevel(other.to_string())),
        };
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_sits_between_debug_and_info() {
        assert!(Level::Debug.weight() < Level::Trace.weight());
        assert!(Level::Trace.weight() < Level::Info.weight());
        assert!(LevelFilter::Off.weight() > LevelFilter::Fatal.weight());
    }

    #[test]
    fn test_resolve_picks_the_stricter_side() {
        use LevelFilter::*;
        assert_eq!(LevelFilter::resolve(Debug, Info), Info);
        assert_eq!(LevelFilter::resolve(Error, Info), Error);
        assert_eq!(LevelFilter::resolve(Trace, Trace), Trace);
        assert_eq!(LevelFilter::resolve(Off, Debug), Off);
    }

    #[test]
    fn test_unset_loses_to_any_concrete_value() {
        use LevelFilter::*;
        for concrete in [Debug, Trace, Info, Warning, Error, Fatal, Off] {
            assert_eq!(LevelFilter::resolve(Unset, concrete), concrete);
            assert_eq!(LevelFilter::resolve(concrete, Unset), concrete);
        }
        assert_eq!(LevelFilter::resolve(Unset, Unset), Unset);
    }

    #[test]
    fn test_passes_is_inclusive() {
        assert!(Level::Info.passes(LevelFilter::Info));
        assert!(!Level::Debug.passes(LevelFilter::Info));
        assert!(Level::Trace.passes(LevelFilter::Debug));
        assert!(!Level::Fatal.passes(LevelFilter::Off));
        assert!(Level::Debug.passes(LevelFilter::Unset));
    }

    #[test]
    fn test_parse_names_and_weights() {
        assert_eq!("trace".parse::<LevelFilter>().unwrap(), LevelFilter::Trace);
        assert_eq!("15".parse::<LevelFilter>().unwrap(), LevelFilter::Trace);
        assert_eq!("off".parse::<LevelFilter>().unwrap(), LevelFilter::Off);
        assert_eq!(" info ".parse::<LevelFilter>().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_parse_rejects_unknown_levels() {
        for bad in ["warn", "critical", "16", "", "INFO"] {
            assert!(matches!(
                bad.parse::<LevelFilter>(),
                Err(Error::InvalidLevel(_))
            ));
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for level in [
            Level::Debug,
            Level::Trace,
            Level::Info,
            Level::Warning,
            Level::Error,
            Level::Fatal,
        ] {
            let parsed: LevelFilter = level.name().parse().unwrap();
            assert_eq!(parsed, LevelFilter::from(level));
        }
    }
}
