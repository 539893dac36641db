use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use relink_core::report::{ReportFormat, StatusCounts, generate_report, save_report};
use relink_core::resolve::BulkProgressCallback;
use relink_core::{ResolutionResult, ResolutionStatus, Resolver, ResolverConfig, normalize_url};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// Logs go to stderr so reports on stdout stay machine-readable.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "relink".bright_cyan().bold(),
        format!("v{} - dead link resolver", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

/// Load URLs from a newline-delimited file.
///
/// Blank lines keep their position (they resolve to an error entry); `#`
/// comment lines and trailing blank lines are dropped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let mut urls: Vec<String> = content.lines().filter_map(parse_url_line).collect();
    while urls.last().is_some_and(|url| url.is_empty()) {
        urls.pop();
    }

    if urls.is_empty() {
        return Err(format!("No URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// `None` for comment lines, otherwise the normalized URL (empty for blank lines).
pub fn parse_url_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return None;
    }
    Some(normalize_url(trimmed))
}

pub fn resolver_config_from_args(args: &ArgMatches) -> ResolverConfig {
    let mut config = ResolverConfig::default().with_verify_candidates(args.get_flag("verify"));

    if let Some(max) = args.get_one::<usize>("max-candidates") {
        config = config.with_max_candidates(*max);
    }
    if let Some(pages) = args.get_one::<usize>("crawl-pages") {
        config = config.with_max_crawl_pages(*pages);
    }
    if let Some(delay) = args.get_one::<u64>("delay-ms") {
        config = config.with_min_interval(Duration::from_millis(*delay));
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_request_timeout(Duration::from_secs(*timeout));
    }
    if let Some(workers) = args.get_one::<usize>("workers") {
        config = config.with_bulk_concurrency(*workers);
    }

    config
}

pub async fn handle_resolve(sub_matches: &ArgMatches) -> Result<()> {
    let url = sub_matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let quiet = sub_matches.get_flag("quiet");

    let resolver = Resolver::new(resolver_config_from_args(sub_matches))
        .context("Failed to create HTTP client")?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Resolving {}", url));

    let result = resolver.resolve_single(url).await;
    spinner.finish_and_clear();

    output_results(&[result], sub_matches, quiet)
}

pub async fn handle_bulk(sub_matches: &ArgMatches) -> Result<()> {
    let hosts_file = sub_matches
        .get_one::<PathBuf>("hosts-file")
        .ok_or_else(|| anyhow!("--hosts-file is required"))?;
    let quiet = sub_matches.get_flag("quiet");

    let urls = load_urls_from_file(hosts_file).map_err(|e| anyhow!(e))?;
    let config = resolver_config_from_args(sub_matches);

    if !quiet {
        eprintln!("\n🔗 Resolving {} URL(s)", urls.len());
        eprintln!("Workers: {}", config.bulk_concurrency);
        eprintln!("Delay per host: {} ms\n", config.min_interval.as_millis());
    }

    let resolver = Resolver::new(config).context("Failed to create HTTP client")?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(urls.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let progress_cb = progress.clone();
    let callback: BulkProgressCallback = Arc::new(move |_idx: usize, result: &ResolutionResult| {
        progress_cb.inc(1);
        progress_cb.set_message(result.original_url.clone());
    });

    let results = resolver
        .resolve_bulk_with_progress(&urls, Some(callback))
        .await;
    progress.finish_and_clear();

    output_results(&results, sub_matches, quiet)
}

fn output_results(results: &[ResolutionResult], args: &ArgMatches, quiet: bool) -> Result<()> {
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    if let Some(path) = args.get_one::<PathBuf>("output") {
        let content = generate_report(results, format).context("Failed to render report")?;
        save_report(&content, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if !quiet {
            eprintln!("{} Report saved to {}", "✓".green().bold(), path.display());
        }
        return Ok(());
    }

    match format {
        ReportFormat::Text => print_results(results),
        _ => print!("{}", generate_report(results, format).context("Failed to render report")?),
    }
    Ok(())
}

fn print_results(results: &[ResolutionResult]) {
    for result in results {
        let status = match result.status {
            ResolutionStatus::Working => "WORKING".green().bold(),
            ResolutionStatus::AlternativeFound => "ALTERNATIVE".cyan().bold(),
            ResolutionStatus::NotFound => "NOT FOUND".yellow().bold(),
            ResolutionStatus::Error => "ERROR".red().bold(),
        };
        let original = if result.original_url.is_empty() {
            "(empty)"
        } else {
            result.original_url.as_str()
        };
        println!("{} {}", status, original.bright_white());

        if let Some(ref top) = result.top_alternative {
            println!("  {} {}", "→".blue(), top.bright_white().bold());
        }
        if let Some(ref error) = result.error {
            println!("  {} {}", "!".red(), error);
        }
        if result.status == ResolutionStatus::AlternativeFound {
            for candidate in &result.candidates {
                println!(
                    "    {:>3}  {:<10} {}  {}",
                    candidate.score,
                    candidate.source.as_str(),
                    candidate.url,
                    candidate.reason.dimmed()
                );
            }
        }
        println!();
    }

    let counts = StatusCounts::tally(results);
    println!(
        "{} working, {} alternative found, {} not found, {} errors",
        counts.working.to_string().green(),
        counts.alternative_found.to_string().cyan(),
        counts.not_found.to_string().yellow(),
        counts.error.to_string().red()
    );
}
