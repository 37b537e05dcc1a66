//! Final JSON record written to stdout.
//!
//! A loaded page yields its feature record plus run metadata. A target that
//! never loaded yields the minimal three-key record, or the zero-filled
//! full schema when dense failure output is requested.

use crate::config::Viewport;
use crate::features::FeatureRecord;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// File name for a page screenshot, derived from the loaded candidate URL.
///
/// `https://www.Example.com/a?b` becomes `www_example_com_a_b.png`.
pub fn screenshot_file_name(url: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\w+:)?//").expect("scheme prefix regex is valid"));

    let stripped = re.replace(url, "");
    let name: String = stripped
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.png", name.to_lowercase())
}

/// Path of the screenshot for `url` under `dir`.
pub fn screenshot_path(dir: &Path, url: &str) -> std::path::PathBuf {
    dir.join(screenshot_file_name(url))
}

/// Features plus run metadata. Used for loaded pages and for dense failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    #[serde(flatten)]
    pub features: FeatureRecord,
    pub is_alive: u8,
    pub extraction_timestamp: String,
    pub user_agent: String,
    pub viewport: Option<Viewport>,
    pub screenshot_path: String,
}

/// Record for a target where no candidate loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadReport {
    pub url: Option<String>,
    pub is_alive: u8,
    pub extraction_timestamp: String,
}

/// The single record emitted per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Full(Box<FullReport>),
    Dead(DeadReport),
}

/// Run metadata attached to a loaded page's features.
#[derive(Debug, Clone, Default)]
pub struct RunMetadata {
    pub extraction_timestamp: String,
    pub user_agent: String,
    pub viewport: Option<Viewport>,
    /// Empty when no screenshot was written.
    pub screenshot_path: String,
}

impl Report {
    /// Record for a page that loaded.
    pub fn alive(features: FeatureRecord, meta: RunMetadata) -> Self {
        Report::Full(Box::new(FullReport {
            features,
            is_alive: 1,
            extraction_timestamp: meta.extraction_timestamp,
            user_agent: meta.user_agent,
            viewport: meta.viewport,
            screenshot_path: meta.screenshot_path,
        }))
    }

    /// Minimal record for a target that never loaded.
    pub fn dead(extraction_timestamp: String) -> Self {
        Report::Dead(DeadReport {
            url: None,
            is_alive: 0,
            extraction_timestamp,
        })
    }

    /// Zero-filled full schema for a target that never loaded.
    pub fn dead_dense(target: &str, extraction_timestamp: String) -> Self {
        Report::Full(Box::new(FullReport {
            features: FeatureRecord::zeroed(target),
            is_alive: 0,
            extraction_timestamp,
            user_agent: String::new(),
            viewport: None,
            screenshot_path: String::new(),
        }))
    }

    pub fn is_alive(&self) -> bool {
        match self {
            Report::Full(full) => full.is_alive == 1,
            Report::Dead(_) => false,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Report::Full(full) => Some(full.features.url.as_str()),
            Report::Dead(dead) => dead.url.as_deref(),
        }
    }

    pub fn screenshot_path(&self) -> Option<&str> {
        match self {
            Report::Full(full) if !full.screenshot_path.is_empty() => {
                Some(full.screenshot_path.as_str())
            }
            _ => None,
        }
    }

    /// Single-line JSON.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
