// Report generation for finished searches

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;
use wikihop_scanner::{DiscoveryKind, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub site: String,
    pub source: String,
    pub destination: String,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    pub pages_discovered: usize,
    pub elapsed_ms: u64,
}

impl SearchReport {
    pub fn hops(&self) -> Option<usize> {
        self.outcome.path().map(|path| path.hops())
    }

    fn outcome_to_string(&self) -> String {
        match &self.outcome {
            SearchOutcome::Found(discovery) => match discovery.via {
                DiscoveryKind::Origin => "found (source is the destination)".to_string(),
                DiscoveryKind::Redirect => "found (last page redirects to destination)".to_string(),
                DiscoveryKind::Link => "found".to_string(),
            },
            SearchOutcome::Exhausted => "not found (search space exhausted)".to_string(),
            SearchOutcome::Stopped => "not found (stopped)".to_string(),
        }
    }

    fn page_url(&self, page: &str) -> String {
        Url::parse(&self.site)
            .and_then(|site| site.join(page))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| page.to_string())
    }
}

pub fn generate_text_report(report: &SearchReport) -> String {
    let mut text = String::new();
    text.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    text.push_str("# Summary:\n");
    text.push_str(&format!("  Outcome: {}\n", report.outcome_to_string()));
    text.push_str(&format!("  Source: {}\n", report.source));
    text.push_str(&format!("  Destination: {}\n", report.destination));
    if let Some(hops) = report.hops() {
        text.push_str(&format!("  Hops: {}\n", hops));
    }
    text.push_str(&format!("  Pages discovered: {}\n", report.pages_discovered));
    text.push_str(&format!(
        "  Elapsed: {:.2}s\n",
        report.elapsed_ms as f64 / 1000.0
    ));
    text.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if let Some(path) = report.outcome.path() {
        text.push_str("## Path\n");
        for (step, page) in path.iter().enumerate() {
            text.push_str(&format!(
                "  {:>2}. {} ({})\n",
                step,
                page,
                report.page_url(page)
            ));
        }
        text.push('\n');
    }

    text
}

pub fn generate_json_report(report: &SearchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn render_report(report: &SearchReport, format: ReportFormat) -> anyhow::Result<String> {
    Ok(match format {
        ReportFormat::Text => generate_text_report(report),
        ReportFormat::Json => generate_json_report(report)?,
    })
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
