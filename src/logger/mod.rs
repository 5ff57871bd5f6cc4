//! Logger module
//!
//! Lifecycle banner, per-request access lines, warnings and errors.
//! Output goes through [`writer`] once initialized and falls back to
//! stdout/stderr before that (and in tests).

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AppState, Config};
use std::net::SocketAddr;

/// Initialize the logger with configuration
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let cfg = &state.config;
    let base = format!("http://localhost:{}", addr.port());
    write_info("Starting frontend development server...");
    write_info(&format!("Serving directory: {}", state.root.display()));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Server URL: {base}"));
    write_info(&format!("Main app: {base}/index.html"));
    write_info(&format!("Profile: {}", cfg.profile));
    write_info(&format!(
        "CORS headers: {}",
        if cfg.http.enable_cors { "enabled" } else { "disabled" }
    ));
    if cfg.routes.rewrite_root {
        write_info("Root path: / -> /index.html");
    }
    if !cfg.server.sequential {
        write_info("Connections: concurrent (keep-alive)");
    }
    if let Some(ref path) = cfg.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = cfg.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("\nPress Ctrl+C to stop the server");
    write_info(&"-".repeat(60));
}

pub fn log_shutdown() {
    write_info("\n\nServer stopped.");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

/// Format an error that ends the process; reported once, via [`log_fatal`]
fn fatal_message(err: &(dyn std::error::Error + 'static)) -> String {
    format!("[ERROR] {err}")
}

pub fn log_fatal(err: &(dyn std::error::Error + 'static)) {
    write_error(&fatal_message(err));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
