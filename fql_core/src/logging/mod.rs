//! Global logging module for FQL
//!
//! Provides thread-safe global logging with a clean macro interface.
//! Uninitialized logging is a no-op, so library consumers that do not care
//! about log output pay nothing and never see a panic from this module.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    let event = events::LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    logging_service.log_event(event);

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::warning(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log debug with context (used by log_debug! macro)
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::debug(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_logging_is_noop() {
        // Context functions must not panic without an initialized logger
        log_error_with_context(codes::system::INTERNAL_ERROR, "test", None, vec![]);
        log_info_with_context("test", vec![("k", "v")]);
        log_debug_with_context("test", vec![]);
    }

    #[test]
    fn test_global_logging_initialization() {
        // Can't test if already initialized by another test
        if is_initialized() {
            return;
        }

        let result = init_global_logging();
        assert!(result.is_ok());
        assert!(is_initialized());
    }
}
