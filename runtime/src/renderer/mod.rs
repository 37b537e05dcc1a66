//! Renderer abstraction for browser-based page loading.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (Chromium via chromiumoxide). The loader and the
//! pipeline only talk to these traits, so tests drive them with fakes.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Result of navigating to a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationResult {
    /// The URL the page ended up on after redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab) with stealth, user agent and
    /// viewport already applied.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A single browser context (tab) for loading one page.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, failing if it does not load within `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Get the full serialized document.
    async fn get_html(&self) -> Result<String>;
    /// Get the current URL.
    async fn get_url(&self) -> Result<String>;
    /// Move the pointer to viewport coordinates.
    async fn move_pointer(&self, x: f64, y: f64) -> Result<()>;
    /// Write a full-page PNG screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fake;
