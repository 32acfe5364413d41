//! Severity level definitions (RFC 5424 numbering)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log message severity. Lower numeric value = more severe, so
/// `Emergency < Debug` under the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Level {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    #[default]
    Debug = 7,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Informational,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Emergency => "EMERGENCY",
            Level::Alert => "ALERT",
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Informational => "INFORMATIONAL",
            Level::Debug => "DEBUG",
        }
    }

    /// One-letter severity tag used in rendered log lines, e.g. `[W]`.
    pub fn mark(&self) -> &'static str {
        match self {
            Level::Emergency => "M",
            Level::Alert => "A",
            Level::Critical => "C",
            Level::Error => "E",
            Level::Warning => "W",
            Level::Notice => "N",
            Level::Informational => "I",
            Level::Debug => "D",
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Level::ALL.get(usize::from(value)).copied()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMERGENCY" => Ok(Level::Emergency),
            "ALERT" => Ok(Level::Alert),
            "CRITICAL" => Ok(Level::Critical),
            "ERROR" => Ok(Level::Error),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "NOTICE" => Ok(Level::Notice),
            "INFORMATIONAL" | "INFO" => Ok(Level::Informational),
            "DEBUG" | "TRACE" => Ok(Level::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
