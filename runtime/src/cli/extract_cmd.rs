//! `nyarlathotep [TARGET]`: extract one page and print its record.

use crate::cli::{output, Cli};
use crate::features::ExtractOptions;
use crate::ledger::RunLedger;
use crate::pipeline::{self, RunOutcome, RunSettings};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Run the extraction described by `cli`.
///
/// A dead target is a normal outcome; errors are reserved for operational
/// failures such as a browser that cannot start.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = RunSettings {
        crawl: cli.crawl_config(),
        extract: ExtractOptions::default(),
        dense_failure: cli.dense_failure,
    };

    // Opened first so an unwritable ledger fails before any browsing.
    let mut ledger = match &cli.ledger {
        Some(path) => Some(RunLedger::open(path)?),
        None => None,
    };

    let outcome = match &cli.html_file {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!(file = %path.display(), "extracting from saved document");
            pipeline::run_offline(&html, &cli.target, &settings)
        }
        None => run_live(cli, &settings).await?,
    };

    output::print_record(&outcome.report)?;
    if !cli.quiet {
        output::print_summary(
            &cli.target,
            &outcome.report,
            outcome.ledger_entry.duration_ms,
        );
    }

    if let Some(ledger) = ledger.as_mut() {
        ledger.append(&outcome.ledger_entry)?;
    }
    Ok(())
}

async fn run_live(cli: &Cli, settings: &RunSettings) -> Result<RunOutcome> {
    let renderer = ChromiumRenderer::launch(&settings.crawl)
        .await
        .context("browser launch failed")?;
    let mut ctx = renderer.new_context().await?;

    let outcome = pipeline::run_target(ctx.as_mut(), &cli.target, settings).await;

    if let Err(e) = ctx.close().await {
        warn!("failed to close tab: {e:#}");
    }
    if let Err(e) = renderer.shutdown().await {
        warn!("failed to shut down browser: {e:#}");
    }
    Ok(outcome)
}
