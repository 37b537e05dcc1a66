//! Runtime configuration and the fixed heuristics used by the extractor.

use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Target used when no URL is given on the command line.
pub const DEFAULT_TARGET: &str = "example.com";

/// Desktop Chrome user agent presented to every page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;

/// Per-candidate navigation timeout.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Wait after a successful navigation so dynamic content can render.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 5_000;

/// Wait after the simulated pointer/scroll interaction.
pub const DEFAULT_INTERACTION_DELAY_MS: u64 = 1_000;

pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Pointer position and scroll distance of the simulated interaction.
pub const POINTER_POSITION: (f64, f64) = (100.0, 100.0);
pub const SCROLL_DISTANCE_PX: i64 = 200;

/// Environment variable naming the Chromium executable.
pub const CHROME_ENV_VAR: &str = "NYARLATHOTEP_CHROME";

/// Vowels used by the syllable estimator.
pub const DEFAULT_VOWELS: &str = "aeiouy";

/// Browser window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl FromStr for Viewport {
    type Err = CrawlError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CrawlError::InvalidViewport(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Settings for the browser, the loader and the emitted artifacts.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub user_agent: String,
    pub viewport: Viewport,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    pub interaction_delay: Duration,
    /// Upper bound of the random extra wait added to each delay.
    pub jitter: Duration,
    /// `None` disables the screenshot.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: Viewport::default(),
            headless: true,
            chrome_executable: std::env::var_os(CHROME_ENV_VAR).map(PathBuf::from),
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            interaction_delay: Duration::from_millis(DEFAULT_INTERACTION_DELAY_MS),
            jitter: Duration::ZERO,
            screenshot_dir: Some(PathBuf::from(DEFAULT_SCREENSHOT_DIR)),
        }
    }
}

/// What a suffix rule does to the running syllable count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixEffect {
    /// Checked but leaves the count untouched.
    None,
    /// +1 when the character before the suffix is a consonant ("table").
    AddAfterConsonant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixRule {
    pub suffix: String,
    pub effect: SuffixEffect,
}

impl SuffixRule {
    pub fn new(suffix: &str, effect: SuffixEffect) -> Self {
        Self {
            suffix: suffix.to_string(),
            effect,
        }
    }
}

/// Heuristic tables of the syllable estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHeuristics {
    pub vowels: String,
    /// Applied in order after the silent-e adjustment.
    pub suffix_rules: Vec<SuffixRule>,
}

impl Default for TextHeuristics {
    fn default() -> Self {
        // `ed`, `es` and `er` never change the count. They stay in the table
        // so feature values keep the historical distribution.
        Self {
            vowels: DEFAULT_VOWELS.to_string(),
            suffix_rules: vec![
                SuffixRule::new("ed", SuffixEffect::None),
                SuffixRule::new("es", SuffixEffect::None),
                SuffixRule::new("er", SuffixEffect::None),
                SuffixRule::new("le", SuffixEffect::AddAfterConsonant),
            ],
        }
    }
}

impl TextHeuristics {
    pub fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(c)
    }
}
