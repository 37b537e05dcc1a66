//! JSONL run ledger, an append-only log with one line per run.

use crate::loader::FailedAttempt;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// A single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: String,
    /// Target as given on the command line.
    pub target: String,
    /// URL the page ended up on, if it loaded.
    pub url: Option<String>,
    pub is_alive: bool,
    pub duration_ms: u64,
    pub screenshot_path: Option<String>,
    /// Candidates that failed before the outcome was reached.
    pub attempts: Vec<FailedAttempt>,
}

/// Append-only JSONL ledger.
pub struct RunLedger {
    file: File,
}

impl RunLedger {
    /// Open or create the ledger file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open run ledger: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Append one entry.
    pub fn append(&mut self, entry: &LedgerEntry) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{json}")?;
        self.file.flush()?;
        Ok(())
    }
}
