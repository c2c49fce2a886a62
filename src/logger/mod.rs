//! Logger module
//!
//! Logging helpers for the gateway:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error, warning and info lines
//!
//! Everything goes to stderr or the configured files; stdout only ever
//! carries the startup banner.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, ListenerConfig, LogLevel};

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_at(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(listener: &ListenerConfig, config: &Config) {
    log_info(&format!("Listening on: http://{}", listener.addr));
    log_info(&format!("Log level: {}", config.logging.level));
    log_info(&format!("Serving root: {}", listener.serving_root.display()));
    log_info(&format!(
        "Dependency root: {} (mounted at {})",
        listener.dependency_root.display(),
        listener.dependency_prefix
    ));
    match config.performance.workers {
        Some(workers) => log_info(&format!("Worker threads: {workers}")),
        None => log_info("Worker threads: default (CPU cores)"),
    }
    if config.logging.access_log {
        log_info(&format!(
            "Access log: {} ({})",
            config
                .logging
                .access_log_file
                .as_deref()
                .unwrap_or("stderr"),
            config.logging.access_log_format
        ));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    log_warning(&format!("Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_at(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_at(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_at(LogLevel::Info, &format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
