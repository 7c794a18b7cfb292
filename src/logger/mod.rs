//! Logger module
//!
//! Provides logging utilities for the server:
//! - Startup banner and lifecycle messages
//! - Access logging (`common` or `json`)
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Operator-facing banner, always printed on stdout
pub fn print_startup_banner(url: &str) {
    println!("Starting server at {url}");
    println!("Open your browser and navigate to {url}");
    println!("Press Ctrl+C to stop the server");
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    write_info(&format!("[Server] Listening on http://{addr}"));
    write_info(&format!("[Server] Serving files from {}", root.display()));
}

pub fn log_shutdown() {
    write_info("\n[Server] Shutdown signal received, stopping server");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
