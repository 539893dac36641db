use relink::commands::command_argument_builder;
use relink::handlers::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("  example.com/docs  ");
    assert_eq!(result, Some("http://example.com/docs".to_string()));
}

#[test]
fn test_parse_url_line_comment() {
    assert_eq!(parse_url_line("# exported from the wiki"), None);
    assert_eq!(parse_url_line("   # indented comment"), None);
}

#[test]
fn test_parse_url_line_blank_keeps_slot() {
    assert_eq!(parse_url_line("   "), Some(String::new()));
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# dead links")?;
    writeln!(temp_file, "https://example.com/old")?;
    writeln!(temp_file)?; // Empty line keeps its position
    writeln!(temp_file, "example.org/blog/post-1")?;
    writeln!(temp_file)?;
    writeln!(temp_file)?;

    let urls = load_urls_from_file(temp_file.path())?;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://example.com/old");
    assert_eq!(urls[1], "");
    assert_eq!(urls[2], "http://example.org/blog/post-1");

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# only a comment").unwrap();

    let result = load_urls_from_file(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No URLs found"));
}

#[test]
fn test_load_urls_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_urls_from_file(&dir.path().join("missing.txt"));

    assert!(result.unwrap_err().contains("Failed to read hosts file"));
}

#[test]
fn test_resolver_config_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["relink", "resolve", "-u", "example.com"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();

    let config = resolver_config_from_args(sub);

    assert_eq!(config.max_candidates, 12);
    assert_eq!(config.max_crawl_pages, 10);
    assert_eq!(config.min_interval, Duration::from_millis(500));
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.bulk_concurrency, 5);
    assert!(!config.verify_candidates);
}

#[test]
fn test_resolver_config_from_flags() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "relink",
            "bulk",
            "-H",
            "urls.txt",
            "--max-candidates",
            "3",
            "--crawl-pages",
            "4",
            "--delay-ms",
            "0",
            "--timeout",
            "2",
            "-t",
            "8",
            "--verify",
            "-q",
        ])
        .unwrap();
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "bulk");

    let config = resolver_config_from_args(sub);

    assert_eq!(config.max_candidates, 3);
    assert_eq!(config.max_crawl_pages, 4);
    assert_eq!(config.min_interval, Duration::ZERO);
    assert_eq!(config.request_timeout, Duration::from_secs(2));
    assert_eq!(config.bulk_concurrency, 8);
    assert!(config.verify_candidates);
    assert!(sub.get_flag("quiet"));
}

#[test]
fn test_format_rejects_unknown_value() {
    let result = command_argument_builder().try_get_matches_from([
        "relink", "resolve", "-u", "example.com", "--format", "xml",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_url_and_hosts_file_are_required() {
    assert!(command_argument_builder().try_get_matches_from(["relink", "resolve"]).is_err());
    assert!(command_argument_builder().try_get_matches_from(["relink", "bulk"]).is_err());
}
