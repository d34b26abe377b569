//! Live log level reconfiguration from a watched config file
//!
//! The config file is plain text. Any line containing `log-level:` sets the
//! level from the text between its first and second colon; the last such
//! line wins.
//!
//! ```text
//! # mounted from a ConfigMap
//! log-level: info
//! ```
//!
//! [`ConfigWatch`] watches the file's parent directory rather than the file
//! itself, so atomic replacements (rename over, symlink swap) are seen too.

use super::error::{LoggerError, Result};
use super::log_level::Level;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Marker that identifies a level line in the config file
pub const LOG_LEVEL_DIRECTIVE: &str = "log-level:";

/// Extract the level set by the last `log-level:` line in `content`.
///
/// Returns `None` when there is no directive at all. A directive whose value
/// names no known level yields `Level::Error`.
pub fn parse_log_level(content: &str) -> Option<Level> {
    content
        .lines()
        .filter(|line| line.contains(LOG_LEVEL_DIRECTIVE))
        .map(|line| directive_level(line.split(':').nth(1).unwrap_or("")))
        .last()
}

fn directive_level(value: &str) -> Level {
    let value = value.to_uppercase();
    if value.contains("DEBUG") {
        Level::Debug
    } else if value.contains("INFO") {
        Level::Info
    } else if value.contains("ERR") {
        Level::Error
    } else if value.contains("WARN") {
        Level::Warning
    } else {
        Level::Error
    }
}

/// Read `path` and parse its level directive
pub fn read_log_level(path: &Path) -> Result<Option<Level>> {
    let data = fs::read(path).map_err(|e| {
        LoggerError::io_operation(
            "reading log level config",
            path.display().to_string(),
            e,
        )
    })?;
    Ok(parse_log_level(&String::from_utf8_lossy(&data)))
}

/// Directory to watch for `path`, canonicalized when possible so event
/// paths compare equal.
fn watch_dir(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf())
}

/// Whether `event` should trigger a re-read of the config file.
///
/// Plain reads and close-after-read are ignored; otherwise re-reading the
/// file would feed the watcher its own events.
fn is_relevant(event: &Event, dir: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Any
            | EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    );
    kind_matches && event.paths.iter().any(|p| p.parent() == Some(dir))
}

/// Handle to a running config watch thread.
///
/// Dropping the handle or calling [`ConfigWatch::stop`] ends the thread.
pub struct ConfigWatch {
    path: PathBuf,
    shutdown: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl ConfigWatch {
    /// Watch the directory of `path` and call `on_change` for every relevant
    /// change.
    ///
    /// `on_change` runs once synchronously before this returns, then on the
    /// watch thread. Fails if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn start<F>(path: impl Into<PathBuf>, on_change: F) -> Result<Self>
    where
        F: Fn(&Path) + Send + 'static,
    {
        let path = path.into();
        let dir = watch_dir(&path);

        let (event_tx, event_rx) = unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receiver gone means the watch thread has exited
            let _ = event_tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        on_change(&path);

        let (shutdown_tx, shutdown_rx) = bounded(1);
        let thread_path = path.clone();
        let handle = thread::Builder::new()
            .name("mdc-config-watch".to_string())
            .spawn(move || {
                let _watcher = watcher;
                Self::run(&thread_path, &dir, &event_rx, &shutdown_rx, on_change);
            })?;

        Ok(Self {
            path,
            shutdown: shutdown_tx,
            handle: Some(handle),
        })
    }

    fn run<F>(
        path: &Path,
        dir: &Path,
        events: &Receiver<notify::Result<Event>>,
        shutdown: &Receiver<()>,
        on_change: F,
    ) where
        F: Fn(&Path),
    {
        loop {
            select! {
                recv(events) -> msg => match msg {
                    Ok(Ok(event)) => {
                        if is_relevant(&event, dir) {
                            on_change(path);
                        }
                    }
                    Ok(Err(e)) => {
                        eprintln!("[LOGGER ERROR] Config watch error on '{}': {}", dir.display(), e);
                    }
                    Err(_) => break,
                },
                recv(shutdown) -> _ => break,
            }
        }
    }

    /// Path of the watched config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the watch thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        let _ = self.shutdown.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                eprintln!(
                    "[LOGGER ERROR] Config watch thread for '{}' panicked",
                    self.path.display()
                );
            }
        }
    }
}

impl Drop for ConfigWatch {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn test_parse_single_directive() {
        assert_eq!(parse_log_level("log-level:WARN\n\n"), Some(Level::Warning));
        assert_eq!(parse_log_level("log-level: debug"), Some(Level::Debug));
        assert_eq!(parse_log_level("log-level: Info\r\n"), Some(Level::Info));
        assert_eq!(parse_log_level("log-level:ERROR"), Some(Level::Error));
    }

    #[test]
    fn test_parse_without_directive() {
        assert_eq!(parse_log_level(""), None);
        assert_eq!(parse_log_level("level: DEBUG\nfoo: bar\n"), None);
    }

    #[test]
    fn test_parse_unknown_value_falls_back_to_error() {
        assert_eq!(parse_log_level("log-level:bogus"), Some(Level::Error));
        assert_eq!(parse_log_level("log-level:"), Some(Level::Error));
    }

    #[test]
    fn test_parse_last_directive_wins() {
        let content = "log-level: DEBUG\nother: x\nlog-level: WARN\n";
        assert_eq!(parse_log_level(content), Some(Level::Warning));
    }

    #[test]
    fn test_parse_keyword_priority() {
        // DEBUG is checked before INFO, INFO before ERR, ERR before WARN
        assert_eq!(parse_log_level("log-level: info-debug"), Some(Level::Debug));
        assert_eq!(parse_log_level("log-level: error-info"), Some(Level::Info));
        assert_eq!(parse_log_level("log-level: warn-err"), Some(Level::Error));
    }

    #[test]
    fn test_parse_ignores_text_after_second_colon() {
        assert_eq!(
            parse_log_level("log-level: debug # set 12:30\n"),
            Some(Level::Debug)
        );
        assert_eq!(parse_log_level("log-level:info:verbose\n"), Some(Level::Info));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_log_level(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log-config");
        fs::write(&path, "log-level: info\n").unwrap();
        assert_eq!(read_log_level(&path).unwrap(), Some(Level::Info));
    }

    #[test]
    fn test_watch_dir_of_bare_file_name() {
        let dir = watch_dir(Path::new("log-config"));
        assert_eq!(dir, fs::canonicalize(".").unwrap());
    }

    #[test]
    fn test_event_relevance() {
        let dir = Path::new("/etc/config");

        let modify = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/etc/config/log-level"));
        assert!(is_relevant(&modify, dir));

        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/etc/config/..data"));
        assert!(is_relevant(&create, dir));

        let closed = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
            .add_path(PathBuf::from("/etc/config/log-level"));
        assert!(is_relevant(&closed, dir));

        let read = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Read)))
            .add_path(PathBuf::from("/etc/config/log-level"));
        assert!(!is_relevant(&read, dir));

        let elsewhere = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/var/other/log-level"));
        assert!(!is_relevant(&elsewhere, dir));
    }

    #[test]
    fn test_run_survives_watch_error() {
        let dir = Path::new("/etc/config");
        let path = dir.join("log-level");
        let (event_tx, event_rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = bounded(1);

        event_tx
            .send(Err(notify::Error::generic("watch queue overflow")))
            .unwrap();
        event_tx
            .send(Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
                .add_path(path.clone())))
            .unwrap();
        drop(event_tx);

        let calls = AtomicUsize::new(0);
        ConfigWatch::run(&path, dir, &event_rx, &shutdown_rx, |changed| {
            assert_eq!(changed, path.as_path());
            calls.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let (_event_tx, event_rx) = unbounded::<notify::Result<Event>>();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        shutdown_tx.send(()).unwrap();

        ConfigWatch::run(
            Path::new("/etc/config/log-level"),
            Path::new("/etc/config"),
            &event_rx,
            &shutdown_rx,
            |_| panic!("no events were sent"),
        );
    }

    #[test]
    fn test_watch_calls_back_on_start_and_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log-config");
        fs::write(&path, "log-level: debug\n").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let watch = ConfigWatch::start(&path, move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(watch.is_running());
        assert_eq!(watch.path(), path.as_path());

        fs::write(&path, "log-level: info\n").unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while calls.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert!(calls.load(Ordering::SeqCst) >= 2);

        watch.stop();
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone").join("log-config");
        let result = ConfigWatch::start(&path, |_| {});
        assert!(matches!(result, Err(LoggerError::Watch(_))));
    }
}
