//! # Rust MDC Logger
//!
//! Structured logging where every line is a single JSON object tagged with
//! the process identity, the severity and a Mapped Diagnostic Context (MDC).
//!
//! ```text
//! {"ts":1700000000123,"crit":"INFO","id":"billing","mdc":{"PID":"42"},"msg":"invoice sent"}
//! ```
//!
//! ## Features
//!
//! - **MDC**: key/value pairs attached to every record, safe to mutate from
//!   any thread
//! - **Level filtering**: filtered records are never formatted
//! - **Live reconfiguration**: the level follows a `log-level:` line in the
//!   file named by `CONFIG_MAP_NAME`
//! - **Best effort**: logging never panics and never returns an error to the
//!   call site

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, FileAppender, MemoryAppender, WriterAppender,
    };
    pub use crate::core::{
        Appender, EnvSource, ErrorCallback, FormatInit, Level, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, Mdc, ProcessEnv, Result,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
pub use core::{
    encode, parse_log_level, Appender, ConfigWatch, EnvSource, ErrorCallback, FormatInit, Level,
    LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Mdc, ProcessEnv, Result,
};
