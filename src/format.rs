//! Line formatting: severity indicator, timestamp, context id, indentation.
//!
//! The prefix (indicator, timestamp, context id) is driven by a small
//! template; the structural tail (indentation, qualified source name,
//! message) is always present.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::indent::INDENT_UNIT;
use crate::level::Level;
use crate::record::Record;

/// Default prefix template: indicator, timestamp, context id
pub const DEFAULT_LINE_FORMAT: &str = "%l %t %x";

/// Millisecond-precision timestamp, e.g. `2025-03-08 12:17:35.236`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Color reset; bright-white rather than `[0m` so the message text keeps a
/// uniform tone after the colored label
const RESET: &str = "\x1b[0;37m";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    /// Severity glyph and padded label
    Indicator,
    /// Timestamp with millisecond resolution
    Timestamp,
    /// Execution-context id, 12 hex digits
    Context,
    Literal(String),
}

/// Renders [`Record`]s into single output lines.
///
/// Template tokens: `%l` severity indicator, `%t` timestamp, `%x` context id,
/// `%%` a literal percent. An unknown token renders as its literal text; a
/// template never fails at log time.
#[derive(Clone, Debug)]
pub struct Formatter {
    tokens: Vec<Token>,
    colorize: bool,
}

impl Formatter {
    /// Scan a prefix template.
    ///
    /// Only a template that cannot be scanned at all (a trailing lone `%`)
    /// is rejected, and only here at configuration time.
    pub fn new(template: &str, colorize: bool) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        let mut push_literal = |tokens: &mut Vec<Token>, literal: &mut String| {
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(literal)));
            }
        };

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                None => {
                    return Err(Error::InvalidFormat(format!(
                        "trailing '%' in {template:?}"
                    )))
                }
                Some('%') => literal.push('%'),
                Some('l') => {
                    push_literal(&mut tokens, &mut literal);
                    tokens.push(Token::Indicator);
                }
                Some('t') => {
                    push_literal(&mut tokens, &mut literal);
                    tokens.push(Token::Timestamp);
                }
                Some('x') => {
                    push_literal(&mut tokens, &mut literal);
                    tokens.push(Token::Context);
                }
                // unknown token: degrade to its literal text
                Some(other) => {
                    literal.push('%');
                    literal.push(other);
                }
            }
        }
        push_literal(&mut tokens, &mut literal);

        Ok(Self { tokens, colorize })
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    /// Render one record as one line (without trailing newline)
    pub fn format(&self, record: &Record) -> String {
        let mut line = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => line.push_str(text),
                Token::Indicator => line.push_str(&indicator(record.level, self.colorize)),
                Token::Timestamp => {
                    let _ = write!(line, "{}", record.timestamp.format(TIMESTAMP_FORMAT));
                }
                Token::Context => {
                    let _ = write!(line, "{}", record.context);
                }
            }
        }
        if !line.is_empty() {
            line.push(' ');
        }
        for _ in 0..record.depth {
            line.push_str(INDENT_UNIT);
        }
        line.push_str(&record.source);
        line.push_str(": ");
        line.push_str(&record.message);
        line
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            tokens: vec![
                Token::Indicator,
                Token::Literal(" ".into()),
                Token::Timestamp,
                Token::Literal(" ".into()),
                Token::Context,
            ],
            colorize: false,
        }
    }
}

/// Severity glyph and padded label, optionally wrapped in its ANSI color
fn indicator(level: Level, colorize: bool) -> String {
    let (glyph, label, color) = match level {
        Level::Fatal => ("💀", "FATAL  ", "\x1b[0;35m"),
        Level::Error => ("💥", "ERROR  ", "\x1b[0;31m"),
        Level::Warning => ("⚠️", "WARNING", "\x1b[0;93m"),
        Level::Info => ("💬", "INFO   ", "\x1b[0;97m"),
        Level::Trace => ("🐾", "TRACE  ", "\x1b[0;32m"),
        Level::Debug => ("🔎", "DEBUG  ", "\x1b[0;96m"),
    };
    if colorize {
        format!("{glyph} {color}{label}{RESET}")
    } else {
        format!("{glyph} {label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::ContextId;

    fn record(level: Level, depth: usize, message: &str) -> Record {
        Record {
            level,
            message: message.to_string(),
            timestamp: chrono::Local::now(),
            context: ContextId::from_raw(0xAB),
            source: "app.demo".to_string(),
            depth,
        }
    }

    #[test]
    fn test_default_template_layout() {
        let formatter = Formatter::new(DEFAULT_LINE_FORMAT, false).unwrap();
        let line = formatter.format(&record(Level::Info, 0, "hello"));

        assert!(line.starts_with("💬 INFO   "));
        assert!(line.contains(" 0000000000AB "));
        assert!(line.ends_with("app.demo: hello"));
    }

    #[test]
    fn test_indentation_units_match_depth() {
        let formatter = Formatter::new("", false).unwrap();
        for depth in [0, 1, 2, 5] {
            let line = formatter.format(&record(Level::Debug, depth, "x"));
            let expected: String = INDENT_UNIT.repeat(depth);
            assert_eq!(line, format!("{expected}app.demo: x"));
        }
    }

    #[test]
    fn test_colorized_line_has_one_escape_pair() {
        let formatter = Formatter::new(DEFAULT_LINE_FORMAT, true).unwrap();
        for level in [
            Level::Debug,
            Level::Trace,
            Level::Info,
            Level::Warning,
            Level::Error,
            Level::Fatal,
        ] {
            let line = formatter.format(&record(level, 1, "x"));
            assert_eq!(line.matches("\x1b[").count(), 2, "{line:?}");
            assert!(line.contains(RESET));
        }
    }

    #[test]
    fn test_plain_line_has_no_escapes() {
        let formatter = Formatter::new(DEFAULT_LINE_FORMAT, false).unwrap();
        let line = formatter.format(&record(Level::Error, 2, "boom"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_percent_escape_and_unknown_token() {
        let formatter = Formatter::new("%l 100%% %q", false).unwrap();
        let line = formatter.format(&record(Level::Info, 0, "x"));
        assert!(line.starts_with("💬 INFO    100% %q "));
    }

    #[test]
    fn test_trailing_percent_is_rejected() {
        assert!(matches!(
            Formatter::new("%l %", false),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_template_renders_bare_tail() {
        let formatter = Formatter::new("", false).unwrap();
        let line = formatter.format(&record(Level::Info, 0, "tail only"));
        assert_eq!(line, "app.demo: tail only");
    }

    #[test]
    fn test_timestamp_has_millisecond_resolution() {
        let formatter = Formatter::new("%t", false).unwrap();
        let line = formatter.format(&record(Level::Info, 0, "x"));
        // "YYYY-mm-dd HH:MM:SS.mmm " prefix
        let timestamp = &line[..24];
        assert_eq!(&timestamp[19..20], ".");
        assert!(timestamp[20..23].chars().all(|c| c.is_ascii_digit()));
    }
}
