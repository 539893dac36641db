// Tests for report generation functionality

use relink_core::report::{
    ReportFormat, StatusCounts, generate_csv_report, generate_json_report, generate_report,
    generate_text_report, save_report,
};
use relink_core::{Candidate, CandidateSource, ResolutionResult, ResolutionStatus};

fn sample_results() -> Vec<ResolutionResult> {
    vec![
        ResolutionResult::working(
            "example.com/".to_string(),
            Candidate::new("http://example.com/", CandidateSource::Original, 100, "original works"),
        ),
        ResolutionResult::ranked(
            "http://example.com/blog/post-1".to_string(),
            vec![
                Candidate::new(
                    "https://example.com/blog/post-1-updated",
                    CandidateSource::Sitemap,
                    80,
                    "listed in https://example.com/sitemap.xml",
                ),
                Candidate::new("http://example.com/blog/", CandidateSource::Parent, 65, "parent path, one level up"),
            ],
        ),
        ResolutionResult::ranked("http://example.com/gone".to_string(), Vec::new()),
        ResolutionResult::with_error(String::new(), "empty URL".to_string()),
    ]
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("json"), Some(ReportFormat::Json)));
    assert!(matches!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(ReportFormat::from_str("CSV"), Some(ReportFormat::Csv)));
    assert!(matches!(ReportFormat::from_str("Json"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("xml").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_status_counts() {
    let counts = StatusCounts::tally(&sample_results());
    assert_eq!(counts.working, 1);
    assert_eq!(counts.alternative_found, 1);
    assert_eq!(counts.not_found, 1);
    assert_eq!(counts.error, 1);
    assert_eq!(counts.total(), 4);
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_lists_every_result() {
    let report = generate_text_report(&sample_results());

    assert!(report.contains("RELINK RESOLUTION REPORT"));
    assert!(report.contains("[1] example.com/"));
    assert!(report.contains("Status:       WORKING"));
    assert!(report.contains("Best match:   https://example.com/blog/post-1-updated"));
    assert!(report.contains("Status:       NOT_FOUND"));
    assert!(report.contains("[4] (empty)"));
    assert!(report.contains("Error:        empty URL"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&sample_results()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "relink");
    assert!(report["metadata"]["generated_at"].is_string());
    assert_eq!(report["summary"]["alternative_found"], 1);

    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[1]["status"], "alternative_found");
    assert_eq!(results[1]["candidates"][0]["source"], "sitemap");
    assert_eq!(results[1]["candidates"][0]["score"], 80);
    assert!(results[2]["top_alternative"].is_null());
}

// ============================================================================
// CSV Report Tests
// ============================================================================

#[test]
fn test_csv_report_one_row_per_candidate() {
    let csv = generate_csv_report(&sample_results());
    let lines: Vec<&str> = csv.lines().collect();

    // header + 1 working + 2 candidates + 1 not found + 1 error
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("original_url,status"));
    assert_eq!(
        lines[2],
        "http://example.com/blog/post-1,alternative_found,https://example.com/blog/post-1-updated,1,\
         https://example.com/blog/post-1-updated,sitemap,80,listed in https://example.com/sitemap.xml,"
    );
    assert!(lines[3].contains("\"parent path, one level up\""));
    assert_eq!(lines[4], "http://example.com/gone,not_found,,,,,,,");
    assert_eq!(lines[5], ",error,,,,,,,empty URL");
}

#[test]
fn test_generate_report_dispatch() {
    let results = sample_results();
    assert!(generate_report(&results, ReportFormat::Text).unwrap().contains("RELINK"));
    assert!(generate_report(&results, ReportFormat::Csv).unwrap().starts_with("original_url"));
    assert!(generate_report(&results, ReportFormat::Json).unwrap().starts_with('{'));
}

// ============================================================================
// Save Tests
// ============================================================================

#[test]
fn test_save_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    save_report("a,b\n", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
}

#[test]
fn test_status_serializes_snake_case() {
    let json = serde_json::to_string(&ResolutionStatus::AlternativeFound).unwrap();
    assert_eq!(json, "\"alternative_found\"");
}
