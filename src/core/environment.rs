//! Environment lookups used by format initialization

use std::collections::HashMap;

/// Identity variables copied into the MDC by `Logger::initialize_format`
pub const IDENTITY_ENV_KEYS: [&str; 5] = [
    "SYSTEM_NAME",
    "HOST_NAME",
    "SERVICE_NAME",
    "CONTAINER_NAME",
    "POD_NAME",
];

/// Variable holding the path of the log level config file
pub const CONFIG_MAP_ENV_KEY: &str = "CONFIG_MAP_NAME";

/// MDC key for the current process id
pub const PID_KEY: &str = "PID";

/// Source of environment values.
///
/// The logger reads its identity fields through this trait so callers and
/// tests can supply values without touching the process environment.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Value for `key`, or an empty string if it is not set
    fn var_or_empty(&self, key: &str) -> String {
        self.var(key).unwrap_or_default()
    }
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
