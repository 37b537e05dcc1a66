//! Chromium renderer backed by chromiumoxide.
//!
//! One browser per run, one tab per context. Every new tab gets the stealth
//! script, the configured user agent and the viewport metrics before it
//! navigates anywhere.

use super::{NavigationResult, RenderContext, Renderer};
use crate::config::{CrawlConfig, Viewport};
use crate::error::CrawlError;
use crate::stealth::fingerprint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat,
};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Flags passed to every launched browser. Web security is off so
/// cross-origin frames do not block the document snapshot.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-web-security",
    "--disable-features=IsolateOrigins,site-per-process",
    "--ignore-certificate-errors",
    "--disable-infobars",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
];

/// chromiumoxide's own per-command timeout.
const CDP_DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Slack between our navigation timeout and the CDP command timeout.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// CDP command timeout for a given navigation timeout.
///
/// Pending commands are evicted by the handler once this elapses, so it must
/// outlast the navigation timeout or a slow `goto` fails early.
pub fn request_timeout(navigation_timeout: Duration) -> Duration {
    (navigation_timeout + REQUEST_TIMEOUT_MARGIN).max(CDP_DEFAULT_REQUEST_TIMEOUT)
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
    user_agent: String,
    viewport: Viewport,
}

impl ChromiumRenderer {
    /// Launch a browser configured from `config`.
    pub async fn launch(config: &CrawlConfig) -> Result<Self> {
        let viewport = config.viewport;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(viewport.width, viewport.height)
            .viewport(None)
            .request_timeout(request_timeout(config.navigation_timeout));

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        for arg in LAUNCH_ARGS {
            builder = builder.arg(*arg);
        }

        let browser_config = builder.build().map_err(CrawlError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CrawlError::Launch(e.to_string()))?;

        // The handler reports many benign protocol errors; keep draining it.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler: {e}");
                }
            }
        });

        info!(
            headless = config.headless,
            width = viewport.width,
            height = viewport.height,
            "browser launched"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task,
            user_agent: config.user_agent.clone(),
            viewport,
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .context("failed to open a browser tab")?
        };

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            fingerprint::stealth_script(),
        ))
        .await
        .context("failed to install stealth script")?;

        page.execute(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await
            .context("failed to set user agent")?;

        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(self.viewport.width))
                .height(i64::from(self.viewport.height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(anyhow::Error::msg)?,
        )
        .await
        .context("failed to set viewport")?;

        Ok(Box::new(ChromiumContext { page }))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("failed to close browser")?;
        browser.wait().await.context("browser did not exit")?;
        self.handler_task.abort();
        Ok(())
    }
}

/// A single Chromium tab.
pub struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResult> {
        let start = Instant::now();

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Err(_) => {
                return Err(CrawlError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into())
            }
            Ok(Err(e)) => {
                return Err(CrawlError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
            Ok(Ok(_)) => {}
        }

        let final_url = self
            .page
            .url()
            .await?
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self.page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn get_html(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| CrawlError::Snapshot(e.to_string()).into())
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()> {
        self.page
            .execute(DispatchMouseEventParams::new(
                DispatchMouseEventType::MouseMoved,
                x,
                y,
            ))
            .await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        let png = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| CrawlError::Screenshot {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tokio::fs::write(path, png).await.map_err(CrawlError::from)?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await?;
        Ok(())
    }
}
