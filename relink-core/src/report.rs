// Report rendering for resolution results

use crate::model::{ResolutionResult, ResolutionStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub working: usize,
    pub alternative_found: usize,
    pub not_found: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn tally(results: &[ResolutionResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.status {
                ResolutionStatus::Working => counts.working += 1,
                ResolutionStatus::AlternativeFound => counts.alternative_found += 1,
                ResolutionStatus::NotFound => counts.not_found += 1,
                ResolutionStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.working + self.alternative_found + self.not_found + self.error
    }
}

pub fn generate_text_report(results: &[ResolutionResult]) -> String {
    let mut report = String::new();
    let counts = StatusCounts::tally(results);

    report.push_str(RULE);
    report.push_str("                          RELINK RESOLUTION REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("URLs:               {}\n", counts.total()));
    report.push_str(&format!("Working:            {}\n", counts.working));
    report.push_str(&format!("Alternative found:  {}\n", counts.alternative_found));
    report.push_str(&format!("Not found:          {}\n", counts.not_found));
    report.push_str(&format!("Errors:             {}\n", counts.error));
    report.push('\n');

    for (idx, result) in results.iter().enumerate() {
        report.push_str(RULE);
        report.push_str(&format!("[{}] {}\n", idx + 1, display_original(result)));
        report.push_str(&format!("Status:       {}\n", result.status.as_str().to_uppercase()));

        if let Some(ref top) = result.top_alternative {
            report.push_str(&format!("Best match:   {}\n", top));
        }
        if let Some(ref error) = result.error {
            report.push_str(&format!("Error:        {}\n", error));
        }

        if !result.candidates.is_empty() {
            report.push_str("\nCandidates:\n");
            for candidate in &result.candidates {
                report.push_str(&format!(
                    "  {:>3}  {:<10} {}\n",
                    candidate.score,
                    candidate.source.as_str(),
                    candidate.url
                ));
                report.push_str(&format!("                  {}\n", candidate.reason));
            }
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str(&format!("\nGenerated by relink {}\n", env!("CARGO_PKG_VERSION")));

    report
}

pub fn generate_json_report(results: &[ResolutionResult]) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "relink",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": StatusCounts::tally(results),
            "results": results
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// One row per candidate; results without candidates still get one row.
pub fn generate_csv_report(results: &[ResolutionResult]) -> String {
    let mut report = String::from("original_url,status,top_alternative,rank,candidate_url,source,score,reason,error\n");

    for result in results {
        let top = result.top_alternative.as_deref().unwrap_or("");
        let error = result.error.as_deref().unwrap_or("");

        if result.candidates.is_empty() {
            let row = [
                csv_field(&result.original_url),
                result.status.as_str().to_string(),
                csv_field(top),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                csv_field(error),
            ];
            report.push_str(&row.join(","));
            report.push('\n');
            continue;
        }

        for (rank, candidate) in result.candidates.iter().enumerate() {
            let row = [
                csv_field(&result.original_url),
                result.status.as_str().to_string(),
                csv_field(top),
                (rank + 1).to_string(),
                csv_field(&candidate.url),
                candidate.source.as_str().to_string(),
                candidate.score.to_string(),
                csv_field(&candidate.reason),
                csv_field(error),
            ];
            report.push_str(&row.join(","));
            report.push('\n');
        }
    }

    report
}

pub fn generate_report(results: &[ResolutionResult], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(results)),
        ReportFormat::Json => generate_json_report(results),
        ReportFormat::Csv => Ok(generate_csv_report(results)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn display_original(result: &ResolutionResult) -> &str {
    if result.original_url.is_empty() {
        "(empty)"
    } else {
        &result.original_url
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_str("html"), None);
    }
}
