use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Severity of a [`LogRecord`](crate::record::LogRecord), ordered from the
/// most to the least verbose: `silly < debug < verbose < info < warn < error`.
///
/// The bare `log` level known to some hosts exists only in the color table
/// ([`color_for`]); it takes no part in ordering comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Silly,
    Debug,
    Verbose,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Silly => "silly",
            Severity::Debug => "debug",
            Severity::Verbose => "verbose",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    fn from_u8(value: u8) -> Severity {
        match value {
            1 => Severity::Debug,
            2 => Severity::Verbose,
            3 => Severity::Info,
            4 => Severity::Warn,
            5 => Severity::Error,
            _ => Severity::Silly,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned when parsing a severity level from a string.
#[derive(thiserror::Error, Debug)]
#[error("unknown severity level: {0}")]
pub struct UnknownLevel(String);

impl FromStr for Severity {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silly" => Ok(Severity::Silly),
            "debug" => Ok(Severity::Debug),
            "verbose" => Ok(Severity::Verbose),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// Color used when a record's level string matches no known key.
pub const NEUTRAL_COLOR: u32 = 0x9E9E9E;

/// Look up the embed color for a level string.
///
/// The table is fixed and identical across adapter instances. Unknown level
/// strings fall back to [`NEUTRAL_COLOR`] rather than failing.
pub fn color_for(level: &str) -> u32 {
    match level {
        "error" => 0xF44336,
        "warn" => 0xFFC107,
        "info" => 0x2196F3,
        "verbose" => 0x00BCD4,
        "debug" => 0x4CAF50,
        "silly" => 0x9C27B0,
        "log" => NEUTRAL_COLOR,
        _ => NEUTRAL_COLOR,
    }
}

/// Shared mutable severity threshold.
///
/// The adapter and every handle it hands out clone the same cell, so a
/// `set` through one is observed by the next `get` through any other.
/// A delivery already in flight keeps the payload it was built with and is
/// not affected by later writes.
#[derive(Clone, Debug)]
pub struct LevelCell(Arc<AtomicU8>);

impl LevelCell {
    pub fn new(level: Severity) -> Self {
        LevelCell(Arc::new(AtomicU8::new(level as u8)))
    }

    pub fn get(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Severity) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}
