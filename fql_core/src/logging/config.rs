//! Runtime logging preferences
//!
//! Preferences default from the environment (`FQL_LOG_LEVEL`,
//! `FQL_STRUCTURED_LOGGING`, `FQL_CONSOLE_LOGGING`) and can be set once,
//! before first use, by embedding applications.

use super::events::LogLevel;
use std::env;
use std::sync::OnceLock;

/// User-tunable logging preferences
#[derive(Debug, Clone)]
pub struct LoggingPreferences {
    pub min_log_level: LogLevel,
    pub use_structured_logging: bool,
    pub enable_console_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::Info,
            use_structured_logging: false,
            enable_console_logging: true,
        }
    }
}

impl LoggingPreferences {
    /// Build preferences from environment variables, falling back to
    /// defaults for anything unset or unrecognized.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let min_log_level = env::var("FQL_LOG_LEVEL")
            .ok()
            .and_then(|v| parse_log_level(&v))
            .unwrap_or(defaults.min_log_level);

        let use_structured_logging = env::var("FQL_STRUCTURED_LOGGING")
            .map(|v| parse_bool(&v))
            .unwrap_or(defaults.use_structured_logging);

        let enable_console_logging = env::var("FQL_CONSOLE_LOGGING")
            .map(|v| parse_bool(&v))
            .unwrap_or(defaults.enable_console_logging);

        Self {
            min_log_level,
            use_structured_logging,
            enable_console_logging,
        }
    }
}

fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warning),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        _ => None,
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences (must happen before first access)
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::from_env)
}

/// Get minimum log level
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

/// Check if structured (JSON) logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Check if console logging is enabled
pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}
