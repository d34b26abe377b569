//! Core logger types and traits

pub mod appender;
pub mod config_watcher;
pub mod environment;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod mdc;
pub mod metrics;

pub use appender::Appender;
pub use config_watcher::{parse_log_level, ConfigWatch, LOG_LEVEL_DIRECTIVE};
pub use environment::{EnvSource, ProcessEnv, CONFIG_MAP_ENV_KEY, IDENTITY_ENV_KEYS, PID_KEY};
pub use error::{LoggerError, Result};
pub use log_entry::{encode, LogRecord};
pub use log_level::Level;
pub use logger::{ErrorCallback, FormatInit, Logger, LoggerBuilder};
pub use mdc::Mdc;
pub use metrics::LoggerMetrics;
