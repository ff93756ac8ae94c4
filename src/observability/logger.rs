//! Structured JSON logger
//!
//! One event per line, written synchronously. The line is assembled by
//! hand so field ordering stays deterministic: `event` first, then
//! `severity`, then the remaining fields sorted by key. Two lines built
//! from the same inputs are byte-identical.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail (per-attempt polling)
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues (rejected requests, slow provider)
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-oriented JSON logger
pub struct Logger;

impl Logger {
    /// Write an event line to stdout
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        let mut out = io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    /// Write an event line to stderr
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        let mut out = io::stderr().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    /// Assemble one newline-terminated JSON line
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted = fields.to_vec();
        sorted.sort_unstable_by_key(|&(key, _)| key);

        let mut line = String::with_capacity(128);
        line.push('{');
        Self::push_pair(&mut line, "event", event);
        line.push(',');
        Self::push_pair(&mut line, "severity", severity.as_str());
        for (key, value) in sorted {
            line.push(',');
            Self::push_pair(&mut line, key, value);
        }
        line.push_str("}\n");
        line
    }

    fn push_pair(line: &mut String, key: &str, value: &str) {
        line.push('"');
        Self::push_escaped(line, key);
        line.push_str("\":\"");
        Self::push_escaped(line, value);
        line.push('"');
    }

    /// JSON string escaping, including bare control characters
    fn push_escaped(line: &mut String, raw: &str) {
        for c in raw.chars() {
            match c {
                '"' => line.push_str("\\\""),
                '\\' => line.push_str("\\\\"),
                '\n' => line.push_str("\\n"),
                '\r' => line.push_str("\\r"),
                '\t' => line.push_str("\\t"),
                _ if c.is_control() => {
                    let _ = write!(line, "\\u{:04x}", c as u32);
                }
                _ => line.push(c),
            }
        }
    }
}
