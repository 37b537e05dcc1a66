//! Error types for the browser-facing side of the crawler.
//!
//! The feature engine never fails; everything here concerns launching the
//! browser, navigating, and capturing page state.

use thiserror::Error;

/// Errors raised while driving the browser or persisting artifacts.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("failed to capture page state: {0}")]
    Snapshot(String),

    #[error("failed to save screenshot to {path}: {reason}")]
    Screenshot { path: String, reason: String },

    #[error("invalid viewport {0:?}, expected WIDTHxHEIGHT")]
    InvalidViewport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
