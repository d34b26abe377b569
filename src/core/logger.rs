//! Main logger implementation

use super::{
    appender::Appender,
    config_watcher::{self, ConfigWatch},
    environment::{EnvSource, ProcessEnv, CONFIG_MAP_ENV_KEY, IDENTITY_ENV_KEYS, PID_KEY},
    error::{LoggerError, Result},
    log_entry,
    log_level::Level,
    mdc::Mdc,
    metrics::LoggerMetrics,
};
use crate::appenders::ConsoleAppender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Only a definite `NotFound` counts as missing; a path that cannot be
/// inspected (permissions, not a directory) is still watched.
fn config_missing(path: &Path) -> bool {
    matches!(fs::metadata(path), Err(e) if e.kind() == io::ErrorKind::NotFound)
}

/// Callback invoked with the error whenever a log record is dropped
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Result of [`Logger::initialize_format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatInit {
    /// Config watcher started by this call
    Started,
    /// A watcher was started earlier; nothing new was started
    AlreadyStarted,
    /// File monitoring was not requested
    MonitorDisabled,
    /// `CONFIG_MAP_NAME` is unset or names a path that does not exist
    ConfigNotFound,
}

/// Everything guarded by the logger lock
struct LoggerState {
    level: Level,
    mdc: Mdc,
    appender: Box<dyn Appender>,
}

#[derive(Default)]
struct WatchState {
    started: bool,
    watch: Option<ConfigWatch>,
}

struct Shared {
    process_id: String,
    state: Mutex<LoggerState>,
    watch: Mutex<WatchState>,
    env: Box<dyn EnvSource>,
    metrics: LoggerMetrics,
    on_error: Option<ErrorCallback>,
}

impl Shared {
    fn set_level(&self, level: Level) {
        self.state.lock().level = level;
    }

    fn apply_config_file(&self, path: &Path) {
        match config_watcher::read_log_level(path) {
            Ok(Some(level)) => {
                self.set_level(level);
                self.metrics.record_config_reload();
            }
            Ok(None) => {}
            Err(e) => eprintln!("[LOGGER ERROR] {}", e),
        }
    }
}

/// Structured JSON logger with a Mapped Diagnostic Context.
///
/// Every record is written as one JSON line carrying the timestamp, level
/// name, process identity, the current MDC and the message. A single lock
/// covers the level, the MDC and the sink, so records never interleave and
/// always see a consistent MDC.
///
/// # Example
///
/// ```
/// use rust_mdc_logger::prelude::*;
///
/// let buffer = MemoryAppender::new();
/// let logger = Logger::with_appender("billing", buffer.clone());
///
/// logger.mdc_add("tenant", "acme");
/// logger.info("invoice sent");
///
/// assert!(buffer.contents().contains(r#""mdc":{"tenant":"acme"},"msg":"invoice sent""#));
/// ```
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    /// Create a logger writing to standard output
    #[must_use]
    pub fn new(process_id: impl Into<String>) -> Self {
        Self::builder(process_id).build()
    }

    /// Create a logger writing to `appender`
    #[must_use]
    pub fn with_appender<A: Appender + 'static>(process_id: impl Into<String>, appender: A) -> Self {
        Self::builder(process_id).appender(appender).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_mdc_logger::prelude::*;
    ///
    /// let logger = Logger::builder("ingest")
    ///     .level(Level::Info)
    ///     .appender(MemoryAppender::new())
    ///     .build();
    /// assert_eq!(logger.level(), Level::Info);
    /// ```
    #[must_use]
    pub fn builder(process_id: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(process_id)
    }

    pub fn process_id(&self) -> &str {
        &self.shared.process_id
    }

    /// Log `message` at `level`, discarding any encode or write error.
    ///
    /// `message` is only formatted when the level passes the threshold, so
    /// passing `format_args!` costs nothing for filtered records.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        if let Err(e) = self.try_log(level, message) {
            if let Some(ref callback) = self.shared.on_error {
                callback(&e);
            }
        }
    }

    /// Log `message` at `level`, returning encode or write errors.
    ///
    /// A record filtered by the threshold is not an error.
    pub fn try_log(&self, level: Level, message: impl fmt::Display) -> Result<()> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        if !state.level.allows(level) {
            self.shared.metrics.record_filtered();
            return Ok(());
        }

        let msg = message.to_string();
        let written = log_entry::encode(
            log_entry::current_millis(),
            level.to_str(),
            &self.shared.process_id,
            &state.mdc,
            &msg,
        )
        .and_then(|line| state.appender.append(&line));

        match written {
            Ok(()) => {
                self.shared.metrics.record_logged();
                Ok(())
            }
            Err(e) => {
                self.shared.metrics.record_dropped();
                Err(e)
            }
        }
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    pub fn set_level(&self, level: Level) {
        self.shared.set_level(level);
    }

    pub fn level(&self) -> Level {
        self.shared.state.lock().level
    }

    /// Add an MDC entry, overwriting any previous value
    pub fn mdc_add(&self, key: impl Into<String>, value: impl Into<String>) {
        self.shared.state.lock().mdc.add(key, value);
    }

    /// Remove an MDC entry; missing keys are ignored
    pub fn mdc_remove(&self, key: &str) {
        self.shared.state.lock().mdc.remove(key);
    }

    /// Value of an MDC entry, `None` if the key is not present
    pub fn mdc_get(&self, key: &str) -> Option<String> {
        self.shared.state.lock().mdc.get(key).map(str::to_owned)
    }

    /// Remove all MDC entries
    pub fn mdc_clean(&self) {
        self.shared.state.lock().mdc.clear();
    }

    /// Replace an MDC entry atomically
    pub fn mdc_update(&self, key: impl Into<String>, value: impl Into<String>) {
        self.shared.state.lock().mdc.update(key, value);
    }

    /// Owned copy of the current MDC
    pub fn mdc_snapshot(&self) -> HashMap<String, String> {
        self.shared.state.lock().mdc.snapshot()
    }

    /// Populate the MDC with process identity and optionally start watching
    /// the log level config file.
    ///
    /// Always writes `SYSTEM_NAME`, `HOST_NAME`, `SERVICE_NAME`,
    /// `CONTAINER_NAME` and `POD_NAME` (empty when unset) and `PID`. With
    /// `enable_file_monitor`, the file named by `CONFIG_MAP_NAME` is parsed
    /// once and then re-parsed whenever its directory changes.
    ///
    /// Safe to call repeatedly: at most one watcher is ever started per
    /// logger.
    pub fn initialize_format(&self, enable_file_monitor: bool) -> Result<FormatInit> {
        for key in IDENTITY_ENV_KEYS {
            let value = self.shared.env.var_or_empty(key);
            self.mdc_update(key, value);
        }
        self.mdc_update(PID_KEY, std::process::id().to_string());

        if !enable_file_monitor {
            return Ok(FormatInit::MonitorDisabled);
        }

        let config_path = PathBuf::from(self.shared.env.var_or_empty(CONFIG_MAP_ENV_KEY));
        if config_path.as_os_str().is_empty() || config_missing(&config_path) {
            return Ok(FormatInit::ConfigNotFound);
        }

        let mut watch_state = self.shared.watch.lock();
        if watch_state.started {
            return Ok(FormatInit::AlreadyStarted);
        }

        let shared = Arc::clone(&self.shared);
        let watch = ConfigWatch::start(config_path, move |path| shared.apply_config_file(path))?;

        watch_state.started = true;
        watch_state.watch = Some(watch);
        self.shared.metrics.record_watcher_start();
        Ok(FormatInit::Started)
    }

    /// Read `path` and apply its `log-level:` directive, if any.
    ///
    /// Read failures are reported on stderr and leave the level unchanged.
    pub fn parse_config_file(&self, path: impl AsRef<Path>) {
        self.shared.apply_config_file(path.as_ref());
    }

    /// Whether a config watcher has ever been started for this logger
    pub fn is_config_watch_started(&self) -> bool {
        self.shared.watch.lock().started
    }

    /// Stop the config watcher thread.
    ///
    /// Returns `false` if no watcher was running. The logger still counts as
    /// started afterwards, so `initialize_format` will not start another.
    pub fn stop_config_watch(&self) -> bool {
        // Joining must happen outside the watch lock
        let watch = self.shared.watch.lock().watch.take();
        match watch {
            Some(watch) => {
                watch.stop();
                true
            }
            None => false,
        }
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.state.lock().appender.flush()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop_config_watch();

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("process_id", &self.shared.process_id)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_mdc_logger::prelude::*;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let env: HashMap<String, String> =
///     [("POD_NAME".to_string(), "api-7f9c".to_string())].into_iter().collect();
///
/// let logger = Logger::builder("api")
///     .level(Level::Warning)
///     .appender(MemoryAppender::new())
///     .env_source(env)
///     .on_error(Arc::new(|err: &LoggerError| eprintln!("log write failed: {}", err)))
///     .build();
///
/// logger.initialize_format(false).unwrap();
/// assert_eq!(logger.mdc_get("POD_NAME").as_deref(), Some("api-7f9c"));
/// ```
pub struct LoggerBuilder {
    process_id: String,
    level: Level,
    appender: Option<Box<dyn Appender>>,
    env: Box<dyn EnvSource>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            level: Level::default(),
            appender: None,
            env: Box::new(ProcessEnv),
            on_error: None,
        }
    }

    /// Set the initial level threshold (default `Debug`)
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output sink (default: standard output)
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Set where environment values are read from (default: the process
    /// environment)
    #[must_use = "builder methods return a new value"]
    pub fn env_source<E: EnvSource + 'static>(mut self, env: E) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Set a callback observing dropped records
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    pub fn build(self) -> Logger {
        let appender = self
            .appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));

        Logger {
            shared: Arc::new(Shared {
                process_id: self.process_id,
                state: Mutex::new(LoggerState {
                    level: self.level,
                    mdc: Mdc::new(),
                    appender,
                }),
                watch: Mutex::new(WatchState::default()),
                env: self.env,
                metrics: LoggerMetrics::new(),
                on_error: self.on_error,
            }),
        }
    }
}
