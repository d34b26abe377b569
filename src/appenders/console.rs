//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes records to standard output (or standard error)
#[derive(Debug, Default)]
pub struct ConsoleAppender {
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(record)?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(record)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
