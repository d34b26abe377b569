//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// Ordered by increasing verbosity: `Error < Warning < Info < Debug`.
/// A logger whose threshold is `Debug` emits everything, one at `Error`
/// emits only errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    Error = 1,
    Warning = 2,
    Info = 3,
    #[default]
    Debug = 4,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Error, Level::Warning, Level::Info, Level::Debug];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Level> {
        match ordinal {
            1 => Some(Level::Error),
            2 => Some(Level::Warning),
            3 => Some(Level::Info),
            4 => Some(Level::Debug),
            _ => None,
        }
    }

    /// Name for a raw level ordinal, or `""` if the ordinal is not a level.
    pub fn name_of(ordinal: u8) -> &'static str {
        Level::from_ordinal(ordinal).map(|l| l.to_str()).unwrap_or("")
    }

    /// Returns `true` if a record at `level` passes a threshold of `self`.
    #[inline]
    pub fn allows(self, level: Level) -> bool {
        level <= self
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERR" | "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
