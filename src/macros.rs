//! Logging macros with `format!` style arguments.
//!
//! Arguments are passed through `format_args!`, so nothing is formatted when
//! the record is filtered out by the logger's level.
//!
//! # Examples
//!
//! ```
//! use rust_mdc_logger::prelude::*;
//! use rust_mdc_logger::info;
//!
//! let logger = Logger::with_appender("server", MemoryAppender::new());
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_mdc_logger::prelude::*;
/// # let logger = Logger::with_appender("app", MemoryAppender::new());
/// use rust_mdc_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// ```
/// # use rust_mdc_logger::prelude::*;
/// # let logger = Logger::with_appender("app", MemoryAppender::new());
/// use rust_mdc_logger::error;
/// error!(logger, "Failed to connect to {}", "db-1");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}
