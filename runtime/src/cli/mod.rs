//! Command-line interface for the `nyarlathotep` binary.

pub mod extract_cmd;
pub mod output;

use crate::config::{
    CrawlConfig, Viewport, DEFAULT_INTERACTION_DELAY_MS, DEFAULT_NAVIGATION_TIMEOUT_MS,
    DEFAULT_SCREENSHOT_DIR, DEFAULT_SETTLE_DELAY_MS, DEFAULT_TARGET, DEFAULT_USER_AGENT,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Load a web page in Chromium and print its feature record as one JSON line.
#[derive(Debug, Parser)]
#[command(name = "nyarlathotep", version, about)]
pub struct Cli {
    /// Hostname or URL. Bare hostnames are tried over https, then http.
    #[arg(default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Navigation timeout per candidate URL, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Wait after a successful load, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY_MS)]
    pub settle_ms: u64,

    /// Wait after the pointer move and scroll, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_INTERACTION_DELAY_MS)]
    pub interaction_ms: u64,

    /// Random extra wait of up to this many milliseconds added to each delay.
    #[arg(long, default_value_t = 0)]
    pub jitter_ms: u64,

    /// Directory for the full-page screenshot.
    #[arg(long, default_value = DEFAULT_SCREENSHOT_DIR)]
    pub screenshot_dir: PathBuf,

    /// Skip the screenshot.
    #[arg(long)]
    pub no_screenshot: bool,

    /// User agent presented to the page.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "1920x1080")]
    pub viewport: Viewport,

    /// Show the browser window.
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable (defaults to $NYARLATHOTEP_CHROME, then auto-detect).
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Extract from a saved HTML file instead of launching a browser.
    #[arg(long)]
    pub html_file: Option<PathBuf>,

    /// On failure, print the full zero-filled schema instead of the short record.
    #[arg(long)]
    pub dense_failure: bool,

    /// Append a JSONL entry for this run to the given file.
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Log as JSON on stderr.
    #[arg(long)]
    pub log_json: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the summary line on stderr.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Crawl configuration with command-line overrides applied.
    pub fn crawl_config(&self) -> CrawlConfig {
        let defaults = CrawlConfig::default();
        CrawlConfig {
            user_agent: self.user_agent.clone(),
            viewport: self.viewport,
            headless: !self.headed,
            chrome_executable: self.chrome.clone().or(defaults.chrome_executable),
            navigation_timeout: Duration::from_millis(self.timeout_ms),
            settle_delay: Duration::from_millis(self.settle_ms),
            interaction_delay: Duration::from_millis(self.interaction_ms),
            jitter: Duration::from_millis(self.jitter_ms),
            screenshot_dir: (!self.no_screenshot).then(|| self.screenshot_dir.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["nyarlathotep"]).unwrap();
        assert_eq!(cli.target, "example.com");
        let config = cli.crawl_config();
        assert!(config.headless);
        assert_eq!(config.navigation_timeout, Duration::from_secs(60));
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert_eq!(config.interaction_delay, Duration::from_secs(1));
        assert_eq!(config.jitter, Duration::ZERO);
        assert_eq!(config.viewport, Viewport::default());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.screenshot_dir, Some(PathBuf::from("screenshots")));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "nyarlathotep",
            "https://site.test",
            "--timeout-ms",
            "1500",
            "--viewport",
            "800x600",
            "--headed",
            "--no-screenshot",
            "--chrome",
            "/opt/chrome",
            "--dense-failure",
        ])
        .unwrap();
        assert_eq!(cli.target, "https://site.test");
        assert!(cli.dense_failure);
        let config = cli.crawl_config();
        assert!(!config.headless);
        assert_eq!(config.navigation_timeout, Duration::from_millis(1500));
        assert_eq!(config.viewport, Viewport { width: 800, height: 600 });
        assert_eq!(config.screenshot_dir, None);
        assert_eq!(config.chrome_executable, Some(PathBuf::from("/opt/chrome")));
    }

    #[test]
    fn test_bad_viewport_rejected() {
        assert!(Cli::try_parse_from(["nyarlathotep", "--viewport", "wide"]).is_err());
    }
}
