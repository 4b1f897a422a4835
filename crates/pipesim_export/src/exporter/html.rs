//! Static human-readable report.

use super::{format_seconds, Exporter};
use crate::error::Result;
use pipesim_engine::{PipelineSummary, RunOutput, StageEvent};
use std::path::{Path, PathBuf};

/// File name written by [`HtmlExporter`].
pub const REPORT_HTML: &str = "report.html";

const STYLE: &str = r"
  body {
    font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI,
      Roboto, Arial;
    margin: 24px;
  }
  header { margin-bottom: 20px; }
  .summary { display: flex; gap: 16px; margin: 12px 0; }
  .chip { padding: 6px 10px; border-radius: 999px; background:#f2f2f2; }
  table { border-collapse: collapse; width: 100%; margin-top: 16px; }
  th, td { border: 1px solid #e5e7eb; padding: 8px; font-size: 14px; }
  th { background: #f8fafc; text-align: left; }
  .ok { color: #065f46; font-weight: 600; }
  .fail { color: #991b1b; font-weight: 600; }
  footer { color: #6b7280; font-size: 12px; }
";

/// Writes `report.html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    /// Renders the report as a standalone HTML document.
    #[must_use]
    pub fn render(summary: &PipelineSummary, events: &[StageEvent]) -> String {
        let mut html = String::new();

        html.push_str("<!doctype html>\n<html lang=\"en\">\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Pipeline Report</title>\n");
        html.push_str(&format!("<style>{}</style>\n", STYLE));

        // Header chips
        html.push_str("<header>\n  <h1>Build &amp; Test Pipeline Report</h1>\n");
        if summary.dry_run {
            html.push_str("  <p>Dry run: durations are zero and every status is forced OK.</p>\n");
        }
        html.push_str("  <div class=\"summary\">\n");
        html.push_str(&chip("Status", &summary.overall_status.to_string()));
        html.push_str(&chip("Artifacts", &summary.modules.len().to_string()));
        html.push_str(&chip("Passed", &summary.passed().to_string()));
        html.push_str(&chip("Failed", &summary.failures.to_string()));
        html.push_str(&chip(
            "Total (s)",
            &format_seconds(summary.total_duration_seconds),
        ));
        html.push_str("  </div>\n</header>\n\n");

        // Test results
        html.push_str("<section>\n  <h2>Test Results</h2>\n  <table>\n");
        html.push_str(
            "    <thead><tr><th>Name</th><th>Module</th><th>OK</th><th>Duration (s)</th></tr></thead>\n",
        );
        html.push_str("    <tbody>\n");
        for test in &summary.tests {
            let (class, label) = if test.passed { ("ok", "PASS") } else { ("fail", "FAIL") };
            html.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
                escape(&test.name),
                escape(&test.module),
                class,
                label,
                format_seconds(test.duration_seconds)
            ));
        }
        html.push_str("    </tbody>\n  </table>\n</section>\n\n");

        // Telemetry
        html.push_str("<section>\n  <h2>Telemetry</h2>\n  <table>\n");
        html.push_str(
            "    <thead><tr><th>#</th><th>Stage</th><th>Name</th><th>Status</th><th>Duration (s)</th><th>Detail</th></tr></thead>\n",
        );
        html.push_str("    <tbody>\n");
        for event in events {
            html.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td><pre style=\"margin:0\">{}</pre></td></tr>\n",
                event.sequence,
                event.stage,
                escape(&event.name),
                if event.status.is_ok() { "ok" } else { "fail" },
                event.status,
                format_seconds(event.duration_seconds),
                escape(event.detail.as_deref().unwrap_or_default())
            ));
        }
        html.push_str("    </tbody>\n  </table>\n</section>\n\n");

        html.push_str("<footer>\n  Generated by pipesim\n</footer>\n</html>\n");
        html
    }
}

impl Exporter for HtmlExporter {
    fn format_name(&self) -> &'static str {
        "html"
    }

    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(REPORT_HTML);
        std::fs::write(&path, Self::render(&run.summary, &run.events))?;
        Ok(vec![path])
    }
}

fn chip(label: &str, value: &str) -> String {
    format!(
        "    <div class=\"chip\">{}: <strong>{}</strong></div>\n",
        label,
        escape(value)
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
