//! One run: load a target, let it settle, capture it, extract, report.
//!
//! Once a candidate has loaded the run always produces a full record.
//! Interaction, screenshot and user-agent failures are logged and degrade
//! to empty values instead of aborting.

use crate::config::CrawlConfig;
use crate::features::{self, ExtractOptions, FeatureRecord, PageSnapshot};
use crate::ledger::LedgerEntry;
use crate::loader::{self, FailedAttempt, LoadOutcome};
use crate::renderer::{NavigationResult, RenderContext};
use crate::report::{self, Report, RunMetadata};
use crate::stealth::behavior;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything a run needs besides the browser.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub crawl: CrawlConfig,
    pub extract: ExtractOptions,
    /// Emit the zero-filled full schema instead of the minimal dead record.
    pub dense_failure: bool,
}

/// The emitted record and the matching ledger line.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub ledger_entry: LedgerEntry,
}

/// Parse `html` as a page loaded at `page_url` and compute its features.
pub fn extract_from_html(html: &str, page_url: &str, options: &ExtractOptions) -> FeatureRecord {
    let snapshot = PageSnapshot::from_html(html, page_url);
    features::extract(&snapshot, options)
}

/// Load `target` in `ctx` and produce its record.
pub async fn run_target(
    ctx: &mut dyn RenderContext,
    target: &str,
    settings: &RunSettings,
) -> RunOutcome {
    let started = Instant::now();
    let candidates = loader::candidate_urls(target);
    debug!(?candidates, "candidate URLs");

    let outcome = loader::load_first(ctx, &candidates, settings.crawl.navigation_timeout).await;

    let (report, attempts) = match outcome {
        LoadOutcome::Exhausted { failures } => {
            let timestamp = report::timestamp_now();
            let report = if settings.dense_failure {
                Report::dead_dense(target, timestamp)
            } else {
                Report::dead(timestamp)
            };
            (report, failures)
        }
        LoadOutcome::Loaded {
            candidate,
            navigation,
            failures,
        } => {
            let report = capture_loaded(&*ctx, &candidate, &navigation, settings).await;
            (report, failures)
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        input = %target,
        alive = report.is_alive(),
        duration_ms,
        "run finished"
    );

    let ledger_entry = ledger_entry(target, &report, attempts, duration_ms);
    RunOutcome {
        report,
        ledger_entry,
    }
}

async fn capture_loaded(
    ctx: &dyn RenderContext,
    candidate: &str,
    navigation: &NavigationResult,
    settings: &RunSettings,
) -> Report {
    let crawl = &settings.crawl;

    behavior::settle(crawl).await;
    if let Err(e) = behavior::simulate_interaction(ctx, crawl).await {
        warn!("page interaction failed: {e:#}");
    }

    let html = match ctx.get_html().await {
        Ok(html) => html,
        Err(e) => {
            warn!("failed to capture document: {e:#}");
            String::new()
        }
    };
    let page_url = match ctx.get_url().await {
        Ok(url) if !url.is_empty() => url,
        Ok(_) => navigation.final_url.clone(),
        Err(e) => {
            warn!("failed to read page URL: {e:#}");
            navigation.final_url.clone()
        }
    };

    let record = extract_from_html(&html, &page_url, &settings.extract);
    debug!(
        elements = record.total_elements,
        readability = record.readability_score,
        "features extracted"
    );

    let screenshot_path = match &crawl.screenshot_dir {
        Some(dir) => save_screenshot(ctx, dir, candidate).await,
        None => String::new(),
    };

    let user_agent = match ctx.execute_js("navigator.userAgent").await {
        Ok(serde_json::Value::String(ua)) => ua,
        Ok(other) => {
            warn!("unexpected user agent value: {other}");
            String::new()
        }
        Err(e) => {
            warn!("failed to read user agent: {e:#}");
            String::new()
        }
    };

    Report::alive(
        record,
        RunMetadata {
            extraction_timestamp: report::timestamp_now(),
            user_agent,
            viewport: Some(crawl.viewport),
            screenshot_path,
        },
    )
}

async fn save_screenshot(ctx: &dyn RenderContext, dir: &std::path::Path, candidate: &str) -> String {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), "failed to create screenshot directory: {e}");
        return String::new();
    }
    let path = report::screenshot_path(dir, candidate);
    match ctx.screenshot(&path).await {
        Ok(()) => {
            info!(path = %path.display(), "screenshot saved");
            path.display().to_string()
        }
        Err(e) => {
            warn!(path = %path.display(), "screenshot failed: {e:#}");
            String::new()
        }
    }
}

/// Extract from a saved document without a browser.
pub fn run_offline(html: &str, target: &str, settings: &RunSettings) -> RunOutcome {
    let started = Instant::now();
    let page_url = loader::candidate_urls(target)
        .into_iter()
        .next()
        .unwrap_or_default();

    let record = extract_from_html(html, &page_url, &settings.extract);
    let report = Report::alive(
        record,
        RunMetadata {
            extraction_timestamp: report::timestamp_now(),
            ..Default::default()
        },
    );

    let duration_ms = started.elapsed().as_millis() as u64;
    let ledger_entry = ledger_entry(target, &report, Vec::new(), duration_ms);
    RunOutcome {
        report,
        ledger_entry,
    }
}

fn ledger_entry(
    target: &str,
    report: &Report,
    attempts: Vec<FailedAttempt>,
    duration_ms: u64,
) -> LedgerEntry {
    LedgerEntry {
        timestamp: report::timestamp_now(),
        target: target.to_string(),
        url: if report.is_alive() {
            report.url().map(str::to_string)
        } else {
            None
        },
        is_alive: report.is_alive(),
        duration_ms,
        screenshot_path: report.screenshot_path().map(str::to_string),
        attempts,
    }
}
