//! Scripted in-memory context for loader and pipeline tests.

use super::{NavigationResult, RenderContext};
use crate::error::CrawlError;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeContext {
    /// Candidates whose navigation fails.
    pub failing: HashSet<String>,
    pub html: String,
    pub user_agent: String,
    pub fail_screenshot: bool,
    pub fail_pointer: bool,
    pub current_url: String,
    /// Every call, in order, e.g. `navigate https://a`, `pointer 100,100`.
    pub events: Mutex<Vec<String>>,
}

impl FakeContext {
    pub fn serving(html: &str) -> Self {
        Self {
            html: html.to_string(),
            user_agent: "FakeAgent/1.0".to_string(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<NavigationResult> {
        self.record(format!("navigate {url}"));
        if self.failing.contains(url) {
            return Err(CrawlError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }
            .into());
        }
        self.current_url = format!("{url}/");
        Ok(NavigationResult {
            final_url: self.current_url.clone(),
            load_time_ms: 7,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        self.record(format!("js {script}"));
        if script == "navigator.userAgent" {
            return Ok(serde_json::Value::String(self.user_agent.clone()));
        }
        Ok(serde_json::Value::Null)
    }

    async fn get_html(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.current_url.clone())
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()> {
        if self.fail_pointer {
            anyhow::bail!("input domain unavailable");
        }
        self.record(format!("pointer {x},{y}"));
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if self.fail_screenshot {
            anyhow::bail!("capture failed");
        }
        std::fs::write(path, b"\x89PNG")?;
        self.record(format!("screenshot {}", path.display()));
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
