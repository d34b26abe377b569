//! Appenders over arbitrary writers and in-memory buffers

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Adapts any [`Write`] implementation into an appender
pub struct WriterAppender<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.writer.write_all(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}

/// Shared in-memory sink.
///
/// Clones share the same buffer, so one clone can be handed to a logger and
/// another kept to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
