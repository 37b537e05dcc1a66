//! Candidate URL loading.
//!
//! A bare hostname is tried over `https://` first and `http://` second;
//! anything that already names one of those schemes is tried as given.
//! Attempts run strictly in order, each bounded by the navigation timeout,
//! and the first one that loads wins.

use crate::renderer::{NavigationResult, RenderContext};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Ordered list of URLs to try for a raw target.
pub fn candidate_urls(target: &str) -> Vec<String> {
    let target = target.trim();
    if target.starts_with("http://") || target.starts_with("https://") {
        vec![target.to_string()]
    } else {
        vec![format!("https://{target}"), format!("http://{target}")]
    }
}

/// Progress of the candidate loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// About to try the candidate at this index.
    Trying(usize),
    /// This candidate loaded.
    Succeeded(String),
    /// Every candidate failed.
    Exhausted,
}

/// A candidate that did not load, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub candidate: String,
    pub error: String,
}

/// Result of running the candidate loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        candidate: String,
        navigation: NavigationResult,
        failures: Vec<FailedAttempt>,
    },
    Exhausted {
        failures: Vec<FailedAttempt>,
    },
}

impl LoadOutcome {
    pub fn failures(&self) -> &[FailedAttempt] {
        match self {
            LoadOutcome::Loaded { failures, .. } | LoadOutcome::Exhausted { failures } => failures,
        }
    }
}

/// Try each candidate in order until one navigates successfully.
pub async fn load_first(
    ctx: &mut dyn RenderContext,
    candidates: &[String],
    timeout: Duration,
) -> LoadOutcome {
    let mut failures = Vec::new();
    let mut navigation = None;
    let mut state = LoadState::Trying(0);

    loop {
        state = match state {
            LoadState::Trying(index) => match candidates.get(index) {
                None => LoadState::Exhausted,
                Some(candidate) => match ctx.navigate(candidate, timeout).await {
                    Ok(nav) => {
                        info!(
                            url = %candidate,
                            final_url = %nav.final_url,
                            load_ms = nav.load_time_ms,
                            "page loaded"
                        );
                        navigation = Some(nav);
                        LoadState::Succeeded(candidate.clone())
                    }
                    Err(e) => {
                        warn!(url = %candidate, "failed to load: {e:#}");
                        failures.push(FailedAttempt {
                            candidate: candidate.clone(),
                            error: format!("{e:#}"),
                        });
                        LoadState::Trying(index + 1)
                    }
                },
            },
            LoadState::Succeeded(candidate) => {
                let navigation = navigation.take().unwrap_or_else(|| NavigationResult {
                    final_url: candidate.clone(),
                    load_time_ms: 0,
                });
                return LoadOutcome::Loaded {
                    candidate,
                    navigation,
                    failures,
                };
            }
            LoadState::Exhausted => {
                warn!(attempts = failures.len(), "no candidate URL could be loaded");
                return LoadOutcome::Exhausted { failures };
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fake::FakeContext;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_candidates_for_bare_host() {
        assert_eq!(
            candidate_urls("example.com"),
            vec!["https://example.com", "http://example.com"]
        );
    }

    #[test]
    fn test_candidates_keep_explicit_scheme() {
        assert_eq!(candidate_urls("http://x.test/a"), vec!["http://x.test/a"]);
        assert_eq!(candidate_urls("https://x.test"), vec!["https://x.test"]);
        // other schemes are treated as hosts
        assert_eq!(
            candidate_urls("ftp://x.test"),
            vec!["https://ftp://x.test", "http://ftp://x.test"]
        );
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let mut ctx = FakeContext::serving("<p>hi</p>");
        let outcome = load_first(&mut ctx, &candidate_urls("example.com"), TIMEOUT).await;
        match outcome {
            LoadOutcome::Loaded {
                candidate,
                navigation,
                failures,
            } => {
                assert_eq!(candidate, "https://example.com");
                assert_eq!(navigation.final_url, "https://example.com/");
                assert!(failures.is_empty());
            }
            other => panic!("expected load, got {other:?}"),
        }
        // http is never attempted once https succeeds
        assert_eq!(ctx.events(), vec!["navigate https://example.com"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_http() {
        let mut ctx = FakeContext::serving("<p>hi</p>").failing_on("https://example.com");
        let outcome = load_first(&mut ctx, &candidate_urls("example.com"), TIMEOUT).await;
        match &outcome {
            LoadOutcome::Loaded { candidate, .. } => assert_eq!(candidate, "http://example.com"),
            other => panic!("expected load, got {other:?}"),
        }
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(outcome.failures()[0].candidate, "https://example.com");
        assert!(outcome.failures()[0].error.contains("ERR_NAME_NOT_RESOLVED"));
    }

    #[tokio::test]
    async fn test_all_candidates_fail() {
        let mut ctx = FakeContext::serving("")
            .failing_on("https://nowhere.invalid")
            .failing_on("http://nowhere.invalid");
        let outcome = load_first(&mut ctx, &candidate_urls("nowhere.invalid"), TIMEOUT).await;
        assert!(matches!(outcome, LoadOutcome::Exhausted { .. }));
        assert_eq!(outcome.failures().len(), 2);
        assert_eq!(
            ctx.events(),
            vec!["navigate https://nowhere.invalid", "navigate http://nowhere.invalid"]
        );
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let mut ctx = FakeContext::serving("");
        let outcome = load_first(&mut ctx, &[], TIMEOUT).await;
        assert_eq!(outcome, LoadOutcome::Exhausted { failures: vec![] });
    }
}
