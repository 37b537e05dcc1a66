//! Human-like pacing and interaction before the page snapshot.
//!
//! After a successful load the page gets a settle delay, a pointer move,
//! a short scroll and an interaction delay. Lazy content keyed on user
//! activity is rendered by the time the document is captured.

use crate::config::{CrawlConfig, POINTER_POSITION, SCROLL_DISTANCE_PX};
use crate::renderer::RenderContext;
use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// `base` plus a uniform random extra of at most `jitter`.
pub fn jittered(base: Duration, jitter: Duration) -> Duration {
    let max_ms = jitter.as_millis() as u64;
    if max_ms == 0 {
        return base;
    }
    let extra = rand::thread_rng().gen_range(0..=max_ms);
    base + Duration::from_millis(extra)
}

/// Wait for dynamic content after navigation.
pub async fn settle(config: &CrawlConfig) {
    let delay = jittered(config.settle_delay, config.jitter);
    debug!(delay_ms = delay.as_millis() as u64, "settling");
    tokio::time::sleep(delay).await;
}

fn scroll_script() -> String {
    format!("window.scrollBy(0, {SCROLL_DISTANCE_PX})")
}

/// Move the pointer, scroll down, then wait the interaction delay.
pub async fn simulate_interaction(
    ctx: &dyn RenderContext,
    config: &CrawlConfig,
) -> Result<()> {
    let (x, y) = POINTER_POSITION;
    let interaction = async {
        ctx.move_pointer(x, y).await?;
        ctx.execute_js(&scroll_script()).await?;
        anyhow::Ok(())
    }
    .await;

    // The page still gets its render time when the interaction fails.
    let delay = jittered(config.interaction_delay, config.jitter);
    debug!(delay_ms = delay.as_millis() as u64, "interaction done, waiting");
    tokio::time::sleep(delay).await;
    interaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fake::FakeContext;
    use std::time::Instant;

    #[test]
    fn test_jitter_zero_is_exact() {
        let base = Duration::from_millis(250);
        assert_eq!(jittered(base, Duration::ZERO), base);
    }

    #[test]
    fn test_jitter_bounds() {
        let base = Duration::from_millis(100);
        let jitter = Duration::from_millis(50);
        for _ in 0..100 {
            let d = jittered(base, jitter);
            assert!(d >= base && d <= base + jitter);
        }
    }

    #[test]
    fn test_scroll_script() {
        assert_eq!(scroll_script(), "window.scrollBy(0, 200)");
    }

    #[tokio::test]
    async fn test_interaction_order() {
        let ctx = FakeContext::serving("");
        let config = CrawlConfig {
            interaction_delay: Duration::ZERO,
            ..CrawlConfig::default()
        };
        simulate_interaction(&ctx, &config).await.unwrap();
        assert_eq!(
            ctx.events(),
            vec!["pointer 100,100", "js window.scrollBy(0, 200)"]
        );
    }

    #[tokio::test]
    async fn test_failed_pointer_still_waits() {
        let ctx = FakeContext {
            fail_pointer: true,
            ..FakeContext::serving("")
        };
        let config = CrawlConfig {
            interaction_delay: Duration::from_millis(40),
            jitter: Duration::ZERO,
            ..CrawlConfig::default()
        };

        let started = Instant::now();
        let result = simulate_interaction(&ctx, &config).await;

        assert!(result.is_err());
        assert!(started.elapsed() >= Duration::from_millis(40));
        // the scroll is skipped once the pointer move fails
        assert!(ctx.events().is_empty());
    }
}
