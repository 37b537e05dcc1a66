//! CLI output: the JSON record on stdout and a short human summary on stderr.

use crate::report::Report;
use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};

/// Check if color output is enabled for stderr.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Red X symbol.
    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Write the record as one line of JSON.
pub fn write_record(out: &mut impl Write, report: &Report) -> Result<()> {
    let line = report.to_json_line().context("failed to serialize record")?;
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// Print the record to stdout.
pub fn print_record(report: &Report) -> Result<()> {
    let stdout = std::io::stdout();
    write_record(&mut stdout.lock(), report)
}

/// One-line summary of a run.
pub fn summary_line(s: &Styled, target: &str, report: &Report, duration_ms: u64) -> String {
    let secs = format!("{:.1}s", duration_ms as f64 / 1000.0);
    if report.is_alive() {
        let url = report.url().unwrap_or(target);
        let mut line = format!("{} {} {url} {}", s.ok_sym(), s.green("alive"), s.dim(&secs));
        if let Some(path) = report.screenshot_path() {
            line.push_str(&format!(" {}", s.dim(path)));
        }
        line
    } else {
        format!("{} {} {target} {}", s.fail_sym(), s.red("dead"), s.dim(&secs))
    }
}

/// Print the run summary to stderr.
pub fn print_summary(target: &str, report: &Report, duration_ms: u64) {
    eprintln!("  {}", summary_line(&Styled::new(), target, report, duration_ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRecord;
    use crate::report::RunMetadata;

    #[test]
    fn test_write_record_single_line() {
        let mut buf = Vec::new();
        write_record(&mut buf, &Report::dead("t".to_string())).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"url\":null,\"is_alive\":0,\"extraction_timestamp\":\"t\"}\n");
    }

    #[test]
    fn test_summary_dead() {
        let line = summary_line(&Styled::plain(), "x.test", &Report::dead("t".into()), 1500);
        assert_eq!(line, "!! dead x.test 1.5s");
    }

    #[test]
    fn test_summary_alive() {
        let report = Report::alive(
            FeatureRecord::zeroed("https://x.test/"),
            RunMetadata {
                screenshot_path: "screenshots/x_test.png".to_string(),
                ..Default::default()
            },
        );
        let line = summary_line(&Styled::plain(), "x.test", &report, 300);
        assert_eq!(line, "OK alive https://x.test/ 0.3s screenshots/x_test.png");
    }

    #[test]
    fn test_plain_has_no_escapes() {
        let s = Styled::plain();
        assert_eq!(s.green("a"), "a");
        assert_eq!(s.ok_sym(), "OK");
    }
}
