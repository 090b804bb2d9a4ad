//! Per-level logging macros.
//!
//! Each macro takes a logger handle and a format template with arguments,
//! e.g. `blocklog::debug!(log, "> fun(arg={})", arg)`. Argument mismatches
//! are compile errors, so a malformed message can never reach the formatter
//! at run time.

/// Log at FATAL level
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::core::format_args!($($arg)+))
    };
}

/// Log at ERROR level
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::core::format_args!($($arg)+))
    };
}

/// Log at WARNING level
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning(::core::format_args!($($arg)+))
    };
}

/// Log at INFO level
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::core::format_args!($($arg)+))
    };
}

/// Log at TRACE level
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(::core::format_args!($($arg)+))
    };
}

/// Log at DEBUG level
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::core::format_args!($($arg)+))
    };
}
