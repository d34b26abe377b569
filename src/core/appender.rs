//! Appender trait for the log output sink

use super::error::Result;

/// Byte sink receiving encoded log lines.
///
/// Each call to `append` carries exactly one newline-terminated record.
pub trait Appender: Send {
    fn append(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
